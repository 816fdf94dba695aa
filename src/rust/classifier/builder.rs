use std::sync::Arc;

use log::info;

use super::classifier::CommentClassifier;
use super::error::ClassifierError;
use super::svm::Predictor;
use super::vectorizer::Vectorizer;
use super::LabelPolicy;

/// A builder for constructing a CommentClassifier with a fluent interface.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    identity: Option<String>,
    vectorizer: Option<Arc<dyn Vectorizer>>,
    predictor: Option<Arc<dyn Predictor>>,
    labels: LabelPolicy,
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder instance with the default label policy
    ///
    /// # Example
    /// ```
    /// use comment_guard::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the artifact set, used in logs when something goes wrong
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn with_vectorizer(self, vectorizer: impl Vectorizer + 'static) -> Self {
        self.with_shared_vectorizer(Arc::new(vectorizer))
    }

    /// Uses an already shared vectorizer, e.g. one swapped in by a different backend
    pub fn with_shared_vectorizer(mut self, vectorizer: Arc<dyn Vectorizer>) -> Self {
        self.vectorizer = Some(vectorizer);
        self
    }

    pub fn with_predictor(self, predictor: impl Predictor + 'static) -> Self {
        self.with_shared_predictor(Arc::new(predictor))
    }

    pub fn with_shared_predictor(mut self, predictor: Arc<dyn Predictor>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    /// Overrides how labels are mapped to categories
    pub fn with_label_policy(mut self, labels: LabelPolicy) -> Self {
        self.labels = labels;
        self
    }

    /// Builds and returns the final CommentClassifier instance
    ///
    /// # Returns
    /// * `Result<CommentClassifier, ClassifierError>` - The constructed classifier if successful, or an error if:
    ///   - No vectorizer or predictor has been set
    ///   - The vectorizer output width differs from the predictor input width
    ///   - The positive and negative categories are empty or identical
    pub fn build(self) -> Result<CommentClassifier, ClassifierError> {
        let vectorizer = self
            .vectorizer
            .ok_or_else(|| ClassifierError::BuildError("Vectorizer must be set".into()))?;
        let predictor = self
            .predictor
            .ok_or_else(|| ClassifierError::BuildError("Predictor must be set".into()))?;

        if vectorizer.dimension() != predictor.n_features() {
            return Err(ClassifierError::BuildError(format!(
                "Vectorizer produces {} features but the predictor expects {}",
                vectorizer.dimension(),
                predictor.n_features()
            )));
        }

        Self::validate_label_policy(&self.labels)?;

        let identity = self.identity.unwrap_or_else(|| "unnamed".to_string());
        info!(
            "Classifier '{}' ready ({} features, positive label {})",
            identity,
            predictor.n_features(),
            self.labels.positive
        );

        Ok(CommentClassifier {
            identity,
            vectorizer,
            predictor,
            labels: self.labels,
        })
    }

    fn validate_label_policy(labels: &LabelPolicy) -> Result<(), ClassifierError> {
        if labels.positive_category.trim().is_empty() || labels.negative_category.trim().is_empty() {
            return Err(ClassifierError::BuildError("Category names cannot be empty".into()));
        }
        if labels.positive_category == labels.negative_category {
            return Err(ClassifierError::BuildError(format!(
                "Positive and negative categories are both '{}'",
                labels.positive_category
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{LinearSvm, LinearSvmConfig, TfidfConfig, TfidfVectorizer};

    fn vectorizer(width: usize) -> TfidfVectorizer {
        TfidfVectorizer::from_config(TfidfConfig {
            vocabulary: (0..width).map(|i| (format!("term{}", i), i)).collect(),
            idf: vec![1.0; width],
            lowercase: true,
            sublinear_tf: false,
            norm: None,
            ngram_range: (1, 1),
            min_token_len: 2,
        })
        .unwrap()
    }

    fn predictor(width: usize) -> LinearSvm {
        LinearSvm::from_config(LinearSvmConfig {
            classes: vec![0, 1],
            coef: vec![vec![1.0; width]],
            intercept: vec![0.0],
        })
        .unwrap()
    }

    #[test]
    fn test_missing_parts() {
        assert!(ClassifierBuilder::new().build().is_err());
        assert!(ClassifierBuilder::new()
            .with_vectorizer(vectorizer(2))
            .build()
            .is_err());
        assert!(ClassifierBuilder::new()
            .with_predictor(predictor(2))
            .build()
            .is_err());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let result = ClassifierBuilder::new()
            .with_vectorizer(vectorizer(3))
            .with_predictor(predictor(2))
            .build();
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }

    #[test]
    fn test_label_policy_validation() {
        let result = ClassifierBuilder::new()
            .with_vectorizer(vectorizer(2))
            .with_predictor(predictor(2))
            .with_label_policy(LabelPolicy {
                positive: 1,
                positive_category: "same".into(),
                negative_category: "same".into(),
            })
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_label_policy() {
        let classifier = ClassifierBuilder::new()
            .with_vectorizer(vectorizer(2))
            .with_predictor(predictor(2))
            .with_label_policy(LabelPolicy {
                positive: 1,
                positive_category: "razzista".into(),
                negative_category: "non razzista".into(),
            })
            .build()
            .unwrap();
        assert_eq!(classifier.classify("term0 term1").unwrap().category, "razzista");
        assert_eq!(classifier.classify("nothing").unwrap().category, "non razzista");
    }
}
