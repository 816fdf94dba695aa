//! Request and response bodies.

use serde::{Deserialize, Serialize};

use crate::classifier::Label;

/// Body of `POST /predict`.
///
/// Fields are optional so a missing field surfaces as a malformed request
/// rather than an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub search_text: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<String>,
    /// Present only when the country lookup failed
    #[serde(default, skip_serializing_if = "is_false")]
    pub degraded: bool,
}

/// Body of `POST /classify`.
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub comment: String,
    pub prediction: Label,
    pub category: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub artifacts_loaded: bool,
}
