//! API error types mapped to HTTP status codes.
//!
//! Each [`ApiError`] variant maps to a specific HTTP status code and produces
//! a JSON response body `{"error": "message", "kind": "..."}`. Messages are
//! written for callers; internal detail stays in the logs.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::artifact_manager::ArtifactError;
use crate::classifier::ClassifierError;

/// Application-level error type that implements `IntoResponse`.
///
/// Each variant maps to an HTTP status code:
/// - `MalformedRequest` → 400
/// - `ArtifactUnavailable` → 503
/// - `FeatureExtraction` → 500
/// - `Prediction` → 500
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Missing, mistyped or out-of-bounds request field (400).
    MalformedRequest(String),
    /// Classifier artifacts could not be loaded; the deployment is broken (503).
    ArtifactUnavailable,
    /// Vectorizer failed on the input (500).
    FeatureExtraction,
    /// Classifier failed on the feature vector (500).
    Prediction,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ArtifactUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::FeatureExtraction | ApiError::Prediction => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MalformedRequest(_) => "malformed_request",
            ApiError::ArtifactUnavailable => "artifact_load_failure",
            ApiError::FeatureExtraction => "feature_extraction_error",
            ApiError::Prediction => "prediction_error",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::MalformedRequest(msg) => msg.clone(),
            ApiError::ArtifactUnavailable => "Classifier is unavailable".to_string(),
            ApiError::FeatureExtraction => "Comment could not be vectorized".to_string(),
            ApiError::Prediction => "Comment could not be classified".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = axum::Json(json!({ "error": self.message(), "kind": self.kind() }));
        (self.status(), body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        log::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::MalformedRequest("Request body must be a JSON object with the expected fields".to_string())
    }
}

impl From<ArtifactError> for ApiError {
    fn from(_: ArtifactError) -> Self {
        ApiError::ArtifactUnavailable
    }
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::ValidationError(msg) => ApiError::MalformedRequest(msg),
            ClassifierError::FeatureExtraction(_) => ApiError::FeatureExtraction,
            ClassifierError::Prediction(_) | ClassifierError::BuildError(_) => ApiError::Prediction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MalformedRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::ArtifactUnavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ApiError::FeatureExtraction.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::Prediction.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_classifier_errors_mapped() {
        assert_eq!(
            ApiError::from(ClassifierError::ValidationError("empty".into())),
            ApiError::MalformedRequest("empty".into())
        );
        assert_eq!(
            ApiError::from(ClassifierError::FeatureExtraction("bad column".into())),
            ApiError::FeatureExtraction
        );
        assert_eq!(
            ApiError::from(ClassifierError::Prediction("width".into())),
            ApiError::Prediction
        );
    }

    #[test]
    fn test_artifact_detail_not_exposed() {
        let err = ApiError::from(ArtifactError::NotFound("/srv/secret/path.json".into()));
        assert_eq!(err, ApiError::ArtifactUnavailable);
        assert!(!err.message().contains("secret"));
    }
}
