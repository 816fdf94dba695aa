use std::fmt;

/// Represents the different types of errors that can occur while classifying a comment.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// The vectorizer could not turn the text into a feature vector
    FeatureExtraction(String),
    /// The predictor rejected the feature vector or produced no usable label
    Prediction(String),
    /// Error occurred while assembling a classifier from its parts
    BuildError(String),
    /// Error occurred due to invalid input text
    ValidationError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FeatureExtraction(msg) => write!(f, "Feature extraction error: {}", msg),
            Self::Prediction(msg) => write!(f, "Prediction error: {}", msg),
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}
