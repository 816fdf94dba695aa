//! Country-name suggestions and comment classification behind a small HTTP API.
//!
//! Comments are classified by a pre-trained TF-IDF vectorizer feeding a linear
//! SVM. Both are read from JSON artifacts once and then shared read-only by
//! every request.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use comment_guard::{ArtifactManager, ClassifierRuntime, LoadPolicy};
//!
//! let manager = ArtifactManager::new("artifacts")?;
//! let runtime = ClassifierRuntime::start(manager, LoadPolicy::Eager).await?;
//!
//! let result = runtime.classifier().await?.classify("some comment")?;
//! println!("{} -> {} ({})", result.comment, result.label, result.category);
//! # Ok(())
//! # }
//! ```
//!
//! # Suggestions
//!
//! ```rust
//! use comment_guard::suggest::filter_by_prefix;
//!
//! let names = ["Italy", "Iceland", "India", "Indonesia", "Ireland", "Israel"];
//! assert_eq!(filter_by_prefix(names, "Ita", 5), vec!["Italy"]);
//! ```

pub mod api;
pub mod artifact_manager;
pub mod classifier;
pub mod config;
pub mod manifest;
mod runtime;
pub mod suggest;

#[cfg(test)]
mod testing;

pub use artifact_manager::{ArtifactError, ArtifactManager};
pub use classifier::{
    ClassificationResult, ClassifierBuilder, ClassifierError, ClassifierInfo, CommentClassifier, Label,
    LabelPolicy, LinearSvm, LinearSvmConfig, Predictor, TfidfConfig, TfidfVectorizer, Vectorizer,
};
pub use config::ServiceConfig;
pub use manifest::{ArtifactFile, ArtifactManifest};
pub use runtime::{ClassifierRuntime, LoadPolicy};
pub use suggest::{CountrySource, RestCountriesSource, SuggestionService, Suggestions};

pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
