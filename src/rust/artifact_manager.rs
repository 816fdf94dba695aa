use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::classifier::{ClassifierError, CommentClassifier, LinearSvm, LinearSvmConfig, TfidfConfig, TfidfVectorizer};
use crate::config;
use crate::manifest::{ArtifactFile, ArtifactManifest, MANIFEST_FILE};

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(String),
    #[error("Download error: {0}")]
    DownloadError(#[from] reqwest::Error),
    #[error("Download of {url} failed with status {status}")]
    DownloadStatus { url: String, status: u16 },
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Failed to parse {file_type} artifact: {source}")]
    Parse {
        file_type: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid {file_type} artifact: {reason}")]
    Invalid { file_type: String, reason: String },
    #[error("Hash mismatch: expected {expected}, got {actual} for {file_type} file")]
    HashMismatch {
        file_type: String,
        expected: String,
        actual: String,
    },
    #[error("Vectorizer produces {vectorizer} features but the classifier expects {classifier}")]
    DimensionMismatch { vectorizer: usize, classifier: usize },
    #[error("Artifact loading task failed: {0}")]
    TaskFailed(String),
}

/// Resolves, verifies, loads and fetches the vectorizer/classifier pair.
#[derive(Clone, Debug)]
pub struct ArtifactManager {
    artifacts_dir: PathBuf,
    download_lock: Arc<Mutex<()>>,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

impl ArtifactManager {
    /// Creates a new ArtifactManager rooted at the default artifact directory
    pub fn new_default() -> io::Result<Self> {
        Self::new(config::default_artifacts_dir())
    }

    pub fn new<P: AsRef<Path>>(artifacts_dir: P) -> io::Result<Self> {
        let artifacts_dir = artifacts_dir.as_ref().to_path_buf();
        fs::create_dir_all(&artifacts_dir)?;
        Ok(Self {
            artifacts_dir,
            download_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.artifacts_dir.join(MANIFEST_FILE)
    }

    pub fn artifact_path(&self, artifact: &ArtifactFile) -> PathBuf {
        self.artifacts_dir.join(&artifact.file)
    }

    /// Resolves `artifact` inside the artifact directory, refusing names that would escape it.
    fn checked_path(&self, file_type: &str, artifact: &ArtifactFile) -> Result<PathBuf, ArtifactError> {
        if !artifact.is_plain_file_name() {
            return Err(unsafe_file_name(file_type, artifact));
        }
        Ok(self.artifact_path(artifact))
    }

    /// Reads `manifest.json`, falling back to the default file layout when absent.
    pub fn load_manifest(&self) -> Result<ArtifactManifest, ArtifactError> {
        let path = self.manifest_path();
        if !path.exists() {
            log::info!("No manifest at {:?}, using default artifact layout", path);
            return Ok(ArtifactManifest::default());
        }
        let bytes = fs::read(&path)?;
        let manifest = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
            file_type: "manifest".to_string(),
            source,
        })?;
        validate_manifest(&manifest)?;
        Ok(manifest)
    }

    pub fn is_present(&self, manifest: &ArtifactManifest) -> bool {
        manifest.files().iter().all(|(file_type, artifact)| {
            let path = self.artifact_path(artifact);
            log::debug!("{} path: {:?} (exists: {})", file_type, path, path.exists());
            path.exists()
        })
    }

    fn verify_file(&self, path: &Path, expected_hash: &str) -> Result<bool, ArtifactError> {
        let bytes = fs::read(path)?;
        let hash = sha256_hex(&bytes);
        log::debug!("Verifying {:?}: calculated {}, expected {}", path, hash, expected_hash);
        Ok(hash.eq_ignore_ascii_case(expected_hash))
    }

    /// Checks every pinned checksum in the manifest. Unpinned files only need to exist.
    pub fn verify_artifacts(&self, manifest: &ArtifactManifest) -> Result<bool, ArtifactError> {
        if !self.is_present(manifest) {
            log::info!("One or more artifact files do not exist");
            return Ok(false);
        }
        for (file_type, artifact) in manifest.files() {
            if let Some(expected) = &artifact.sha256 {
                if !self.verify_file(&self.artifact_path(artifact), expected)? {
                    log::warn!("{} artifact {} failed verification", file_type, artifact.file);
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Reads an artifact, checks its pinned hash, and decodes it.
    fn read_artifact<T: DeserializeOwned>(&self, file_type: &str, artifact: &ArtifactFile) -> Result<T, ArtifactError> {
        let path = self.checked_path(file_type, artifact)?;
        if !path.exists() {
            return Err(ArtifactError::NotFound(path.display().to_string()));
        }

        let bytes = fs::read(&path)?;
        if let Some(expected) = &artifact.sha256 {
            let actual = sha256_hex(&bytes);
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(ArtifactError::HashMismatch {
                    file_type: file_type.to_string(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
            file_type: file_type.to_string(),
            source,
        })
    }

    pub fn load_vectorizer(&self, manifest: &ArtifactManifest) -> Result<TfidfVectorizer, ArtifactError> {
        let config: TfidfConfig = self.read_artifact("vectorizer", &manifest.vectorizer)?;
        TfidfVectorizer::from_config(config).map_err(|e| invalid("vectorizer", e))
    }

    pub fn load_predictor(&self, manifest: &ArtifactManifest) -> Result<LinearSvm, ArtifactError> {
        let config: LinearSvmConfig = self.read_artifact("classifier", &manifest.classifier)?;
        LinearSvm::from_config(config).map_err(|e| invalid("classifier", e))
    }

    /// Loads the manifest and both artifacts and pairs them into a classifier.
    ///
    /// The vectorizer's output width must equal the classifier's input width;
    /// a skewed pair is rejected here rather than at request time.
    pub fn load_classifier(&self) -> Result<CommentClassifier, ArtifactError> {
        use crate::classifier::{Predictor, Vectorizer};

        let manifest = self.load_manifest()?;
        log::info!(
            "Loading artifact set {} from {:?}",
            manifest.identity(),
            self.artifacts_dir
        );

        let vectorizer = self.load_vectorizer(&manifest)?;
        let predictor = self.load_predictor(&manifest)?;
        if vectorizer.dimension() != predictor.n_features() {
            return Err(ArtifactError::DimensionMismatch {
                vectorizer: vectorizer.dimension(),
                classifier: predictor.n_features(),
            });
        }
        log::info!(
            "Vectorizer loaded ({} terms), classifier loaded ({} classes)",
            vectorizer.vocabulary_size(),
            predictor.classes().len()
        );

        CommentClassifier::builder()
            .with_identity(manifest.identity())
            .with_vectorizer(vectorizer)
            .with_predictor(predictor)
            .with_label_policy(manifest.labels)
            .build()
            .map_err(|e| invalid("classifier", e))
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ArtifactError> {
        log::info!("Downloading {}", url);
        let response = reqwest::get(url).await?;
        log::info!("Download response status: {}", response.status());
        if !response.status().is_success() {
            return Err(ArtifactError::DownloadStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        let bytes = response.bytes().await?;
        log::info!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    async fn download_and_verify_file(
        &self,
        base_url: &str,
        artifact: &ArtifactFile,
        file_type: &str,
    ) -> Result<(), ArtifactError> {
        let url = format!("{}/{}", base_url.trim_end_matches('/'), artifact.file);
        let bytes = self.fetch(&url).await?;

        if let Some(expected) = &artifact.sha256 {
            let actual = sha256_hex(&bytes);
            if !actual.eq_ignore_ascii_case(expected) {
                log::error!("{} hash mismatch: expected {}, got {}", file_type, expected, actual);
                return Err(ArtifactError::HashMismatch {
                    file_type: file_type.to_string(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        let path = self.checked_path(file_type, artifact)?;
        log::info!("Writing {} bytes to {:?}", bytes.len(), path);
        fs::write(&path, bytes)?;
        Ok(())
    }

    /// Downloads `manifest.json` from `base_url`, then every file it names.
    ///
    /// Pinned checksums are verified before anything is written. On failure
    /// the partially downloaded set is removed.
    pub async fn download_artifacts(&self, base_url: &str) -> Result<ArtifactManifest, ArtifactError> {
        let _lock = self.download_lock.lock().await;

        let manifest_url = format!("{}/{}", base_url.trim_end_matches('/'), MANIFEST_FILE);
        let manifest_bytes = self.fetch(&manifest_url).await?;
        let manifest: ArtifactManifest =
            serde_json::from_slice(&manifest_bytes).map_err(|source| ArtifactError::Parse {
                file_type: "manifest".to_string(),
                source,
            })?;
        validate_manifest(&manifest)?;

        for (file_type, artifact) in manifest.files() {
            if let Err(e) = self.download_and_verify_file(base_url, artifact, file_type).await {
                log::error!("Failed to fetch {} artifact: {}", file_type, e);
                let _ = self.remove_artifacts(&manifest);
                return Err(e);
            }
        }

        fs::write(self.manifest_path(), &manifest_bytes)?;
        log::info!("Artifact set {} downloaded and verified", manifest.identity());
        Ok(manifest)
    }

    /// Deletes the files named by `manifest` along with the manifest itself
    pub fn remove_artifacts(&self, manifest: &ArtifactManifest) -> Result<(), ArtifactError> {
        validate_manifest(manifest)?;
        for (_, artifact) in manifest.files() {
            let path = self.artifact_path(artifact);
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        let manifest_path = self.manifest_path();
        if manifest_path.exists() {
            fs::remove_file(&manifest_path)?;
        }
        Ok(())
    }
}

fn unsafe_file_name(file_type: &str, artifact: &ArtifactFile) -> ArtifactError {
    ArtifactError::Invalid {
        file_type: "manifest".to_string(),
        reason: format!("{} file {:?} is not a plain file name", file_type, artifact.file),
    }
}

/// Every file a manifest names must stay inside the artifact directory.
fn validate_manifest(manifest: &ArtifactManifest) -> Result<(), ArtifactError> {
    match manifest.files().into_iter().find(|(_, artifact)| !artifact.is_plain_file_name()) {
        Some((file_type, artifact)) => Err(unsafe_file_name(file_type, artifact)),
        None => Ok(()),
    }
}

fn invalid(file_type: &str, err: ClassifierError) -> ArtifactError {
    ArtifactError::Invalid {
        file_type: file_type.to_string(),
        reason: err.to_string(),
    }
}
