use std::sync::Arc;

use log::debug;

use super::error::ClassifierError;
use super::svm::Predictor;
use super::vectorizer::Vectorizer;
use super::{ClassificationResult, ClassifierInfo, Label, LabelPolicy};

/// A thread-safe comment classifier: a fitted vectorizer feeding a fitted predictor.
///
/// # Thread Safety
///
/// Both halves are held behind `Arc` and only ever read, so a single
/// instance can serve any number of concurrent requests.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use comment_guard::{CommentClassifier, LinearSvm, LinearSvmConfig, TfidfConfig, TfidfVectorizer};
///
/// let vectorizer = TfidfVectorizer::from_config(serde_json::from_str::<TfidfConfig>(
///     r#"{"vocabulary": {"awful": 0, "lovely": 1}, "idf": [1.0, 1.0]}"#,
/// )?)?;
/// let predictor = LinearSvm::from_config(LinearSvmConfig {
///     classes: vec![0, 1],
///     coef: vec![vec![1.0, -1.0]],
///     intercept: vec![0.0],
/// })?;
///
/// let classifier = CommentClassifier::builder()
///     .with_vectorizer(vectorizer)
///     .with_predictor(predictor)
///     .build()?;
///
/// let result = classifier.classify("what an awful day")?;
/// assert_eq!(result.label, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CommentClassifier {
    pub(crate) identity: String,
    pub(crate) vectorizer: Arc<dyn Vectorizer>,
    pub(crate) predictor: Arc<dyn Predictor>,
    pub(crate) labels: LabelPolicy,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<CommentClassifier>();
    }
};

impl CommentClassifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            identity: self.identity.clone(),
            n_features: self.predictor.n_features(),
            labels: self.labels.clone(),
        }
    }

    /// `name@version` of the artifacts backing this classifier
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn label_policy(&self) -> &LabelPolicy {
        &self.labels
    }

    /// Runs the vectorizer and the predictor on a single text.
    ///
    /// # Errors
    /// - `ValidationError` if the text is empty or whitespace only
    /// - `FeatureExtraction` if the vectorizer cannot transform the text
    /// - `Prediction` if the predictor rejects the feature vector
    pub fn predict(&self, text: &str) -> Result<Label, ClassifierError> {
        if text.trim().is_empty() {
            return Err(ClassifierError::ValidationError("Input text cannot be empty".into()));
        }

        let features = self.vectorizer.transform(text)?;
        let label = self.predictor.predict(features.view())?;
        debug!(
            "Predicted label {} for {} chars ({} non-zero features)",
            label,
            text.chars().count(),
            features.iter().filter(|&&x| x != 0.0).count()
        );
        Ok(label)
    }

    /// Classifies a comment and maps the label to its category.
    pub fn classify(&self, comment: &str) -> Result<ClassificationResult, ClassifierError> {
        let label = self.predict(comment)?;
        Ok(ClassificationResult {
            comment: comment.to_string(),
            label,
            category: self.labels.category_for(label).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{LinearSvm, LinearSvmConfig, TfidfConfig, TfidfVectorizer};
    use std::collections::HashMap;

    fn setup_test_classifier() -> CommentClassifier {
        let vectorizer = TfidfVectorizer::from_config(TfidfConfig {
            vocabulary: HashMap::from([("hate".to_string(), 0), ("x".to_string(), 1)]),
            idf: vec![1.0, 1.0],
            lowercase: true,
            sublinear_tf: false,
            norm: Some(crate::classifier::Norm::L2),
            ngram_range: (1, 1),
            min_token_len: 1,
        })
        .unwrap();
        let predictor = LinearSvm::from_config(LinearSvmConfig {
            classes: vec![0, 1],
            coef: vec![vec![0.0, 1.0]],
            intercept: vec![-0.1],
        })
        .unwrap();

        CommentClassifier::builder()
            .with_identity("test@1")
            .with_vectorizer(vectorizer)
            .with_predictor(predictor)
            .build()
            .expect("Failed to create classifier")
    }

    #[test]
    fn test_marked_word_is_positive() {
        let classifier = setup_test_classifier();
        let result = classifier.classify("I hate X").unwrap();
        assert_eq!(result.comment, "I hate X");
        assert_eq!(result.label, 1);
        assert_eq!(result.category, "racist");
    }

    #[test]
    fn test_other_text_is_negative() {
        let classifier = setup_test_classifier();
        let result = classifier.classify("I love you").unwrap();
        assert_eq!(result.label, 0);
        assert_eq!(result.category, "not racist");
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let classifier = setup_test_classifier();
        let first = classifier.predict("hate hate x").unwrap();
        for _ in 0..50 {
            assert_eq!(classifier.predict("hate hate x").unwrap(), first);
        }
    }

    #[test]
    fn test_blank_text_rejected() {
        let classifier = setup_test_classifier();
        assert!(matches!(
            classifier.predict("   \t\n"),
            Err(ClassifierError::ValidationError(_))
        ));
    }

    #[test]
    fn test_info() {
        let info = setup_test_classifier().info();
        assert_eq!(info.identity, "test@1");
        assert_eq!(info.n_features, 2);
        assert_eq!(info.labels, LabelPolicy::default());
    }
}
