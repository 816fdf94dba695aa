use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::artifact_manager::{ArtifactError, ArtifactManager};
use crate::classifier::CommentClassifier;

/// When the artifact pair is read from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Load during start-up; a broken deployment refuses to start
    #[default]
    Eager,
    /// Load on the first classification request
    Lazy,
}

/// Process-wide holder of the loaded classifier.
///
/// The classifier is loaded at most once per successful attempt and then
/// shared read-only. Concurrent first callers wait on the same load instead
/// of each reading the files. The load runs on its own task, so a caller
/// that goes away mid-load does not abandon it. A failed load leaves the
/// holder empty so a later call can retry once the deployment is fixed.
#[derive(Debug)]
pub struct ClassifierRuntime {
    manager: Option<ArtifactManager>,
    cell: Arc<OnceCell<Arc<CommentClassifier>>>,
    loads: Arc<AtomicUsize>,
}

impl ClassifierRuntime {
    /// Creates the runtime and, for `LoadPolicy::Eager`, loads the artifacts immediately.
    pub async fn start(manager: ArtifactManager, policy: LoadPolicy) -> Result<Self, ArtifactError> {
        let runtime = Self::lazy(manager);
        if policy == LoadPolicy::Eager {
            runtime.classifier().await?;
        }
        Ok(runtime)
    }

    /// Creates a runtime that loads on first use
    pub fn lazy(manager: ArtifactManager) -> Self {
        Self {
            manager: Some(manager),
            cell: Arc::new(OnceCell::new()),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Wraps an already built classifier, e.g. one assembled from a custom backend
    pub fn from_classifier(classifier: Arc<CommentClassifier>) -> Self {
        Self {
            manager: None,
            cell: Arc::new(OnceCell::new_with(Some(classifier))),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Number of times the artifacts have been read from disk
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Returns the shared classifier, loading it first if necessary.
    pub async fn classifier(&self) -> Result<Arc<CommentClassifier>, ArtifactError> {
        if let Some(classifier) = self.cell.get() {
            return Ok(Arc::clone(classifier));
        }

        let cell = Arc::clone(&self.cell);
        let manager = self.manager.clone();
        let loads = Arc::clone(&self.loads);
        tokio::spawn(async move {
            let classifier = cell.get_or_try_init(|| load(manager, loads)).await?;
            Ok::<_, ArtifactError>(Arc::clone(classifier))
        })
        .await
        .map_err(|e| ArtifactError::TaskFailed(e.to_string()))?
    }
}

async fn load(manager: Option<ArtifactManager>, loads: Arc<AtomicUsize>) -> Result<Arc<CommentClassifier>, ArtifactError> {
    let manager = manager.ok_or_else(|| ArtifactError::NotFound("no artifact directory configured".into()))?;
    loads.fetch_add(1, Ordering::SeqCst);

    let classifier = tokio::task::spawn_blocking(move || manager.load_classifier())
        .await
        .map_err(|e| ArtifactError::TaskFailed(e.to_string()))??;
    Ok(Arc::new(classifier))
}
