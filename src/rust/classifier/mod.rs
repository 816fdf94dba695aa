use serde::{Deserialize, Serialize};

mod error;
mod utils;
pub mod builder;
pub mod classifier;
pub mod svm;
pub mod vectorizer;

pub use builder::ClassifierBuilder;
pub use classifier::CommentClassifier;
pub use error::ClassifierError;
pub use svm::{LinearSvm, LinearSvmConfig, Predictor};
pub use vectorizer::{Norm, TfidfConfig, TfidfVectorizer, Vectorizer};

/// Raw output of the predictor. Meaning is assigned by [`LabelPolicy`].
pub type Label = i64;

fn default_positive_label() -> Label {
    1
}

fn default_positive_category() -> String {
    "racist".to_string()
}

fn default_negative_category() -> String {
    "not racist".to_string()
}

/// How raw labels translate into the categories reported to callers.
///
/// The artifact does not describe its own labels; the convention is that
/// `positive` marks the flagged class and every other label is negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPolicy {
    #[serde(default = "default_positive_label")]
    pub positive: Label,
    #[serde(default = "default_positive_category")]
    pub positive_category: String,
    #[serde(default = "default_negative_category")]
    pub negative_category: String,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            positive: default_positive_label(),
            positive_category: default_positive_category(),
            negative_category: default_negative_category(),
        }
    }
}

impl LabelPolicy {
    /// Returns the category name for a predicted label
    pub fn category_for(&self, label: Label) -> &str {
        if label == self.positive {
            &self.positive_category
        } else {
            &self.negative_category
        }
    }
}

/// Outcome of classifying one comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub comment: String,
    pub label: Label,
    pub category: String,
}

/// Information about a loaded classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// `name@version` of the artifact set the classifier came from
    pub identity: String,
    /// Width of the feature vectors flowing between vectorizer and predictor
    pub n_features: usize,
    /// Label convention in effect
    pub labels: LabelPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_label_policy() {
        let policy = LabelPolicy::default();
        assert_eq!(policy.category_for(1), "racist");
        assert_eq!(policy.category_for(0), "not racist");
        assert_eq!(policy.category_for(-1), "not racist");
        assert_eq!(policy.category_for(7), "not racist");
    }

    #[test]
    fn test_label_policy_partial_json() {
        let policy: LabelPolicy = serde_json::from_str(r#"{"positive": 0}"#).unwrap();
        assert_eq!(policy.category_for(0), "racist");
        assert_eq!(policy.category_for(1), "not racist");
    }
}
