//! Identity and metadata of an artifact set.
//!
//! A manifest sits next to the vectorizer and classifier files and records
//! which files belong together, their checksums, and the label convention
//! the classifier was trained with.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::classifier::LabelPolicy;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const DEFAULT_VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
pub const DEFAULT_CLASSIFIER_FILE: &str = "svm_classifier.json";

/// One file within an artifact set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFile {
    /// File name relative to the artifact directory
    pub file: String,
    /// Lowercase hex sha256 of the file contents, if pinned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl ArtifactFile {
    pub fn unpinned(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            sha256: None,
        }
    }

    /// True when `file` is a bare file name: no directories, no `..`, not absolute.
    pub fn is_plain_file_name(&self) -> bool {
        let mut components = Path::new(&self.file).components();
        matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        )
    }
}

fn default_name() -> String {
    "comment-svm".to_string()
}

fn default_version() -> String {
    "unversioned".to_string()
}

fn default_vectorizer() -> ArtifactFile {
    ArtifactFile::unpinned(DEFAULT_VECTORIZER_FILE)
}

fn default_classifier() -> ArtifactFile {
    ArtifactFile::unpinned(DEFAULT_CLASSIFIER_FILE)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_vectorizer")]
    pub vectorizer: ArtifactFile,
    #[serde(default = "default_classifier")]
    pub classifier: ArtifactFile,
    #[serde(default)]
    pub labels: LabelPolicy,
}

impl Default for ArtifactManifest {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            vectorizer: default_vectorizer(),
            classifier: default_classifier(),
            labels: LabelPolicy::default(),
        }
    }
}

impl ArtifactManifest {
    /// `name@version`, the string used to identify the set in logs
    pub fn identity(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    /// Both files, tagged with the role they play
    pub fn files(&self) -> [(&'static str, &ArtifactFile); 2] {
        [("vectorizer", &self.vectorizer), ("classifier", &self.classifier)]
    }
}
