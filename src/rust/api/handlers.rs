//! HTTP request handlers and shared application state.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::api::errors::ApiError;
use crate::api::models::*;
use crate::classifier::ClassifierError;
use crate::runtime::ClassifierRuntime;
use crate::suggest::SuggestionService;

/// Shared application state passed to every handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub suggestions: Arc<SuggestionService>,
    pub classifier: Arc<ClassifierRuntime>,
    pub max_query_chars: usize,
    pub max_comment_chars: usize,
}

/// Answers CORS pre-flight requests. Touches no service.
pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
        ],
    )
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        artifacts_loaded: state.classifier.is_loaded(),
    })
}

/// `POST /predict`: up to `limit` country names starting with `search_text`.
pub async fn suggest(
    State(state): State<AppState>,
    payload: Result<Json<SuggestRequest>, JsonRejection>,
) -> Result<Json<SuggestResponse>, ApiError> {
    let Json(req) = payload?;
    let query = req
        .search_text
        .ok_or_else(|| ApiError::MalformedRequest("Missing field `search_text`".to_string()))?;
    if query.chars().count() > state.max_query_chars {
        return Err(ApiError::MalformedRequest(format!(
            "`search_text` exceeds {} characters",
            state.max_query_chars
        )));
    }

    let result = state.suggestions.suggest(&query).await;
    log::debug!(
        "{} suggestions for a {}-char query (degraded: {})",
        result.names.len(),
        query.chars().count(),
        result.degraded
    );

    Ok(Json(SuggestResponse {
        suggestions: result.names,
        degraded: result.degraded,
    }))
}

fn validate_comment(comment: &str, max_chars: usize) -> Result<(), ApiError> {
    if comment.trim().is_empty() {
        return Err(ApiError::MalformedRequest("`comment` cannot be empty".to_string()));
    }
    if comment.chars().count() > max_chars {
        return Err(ApiError::MalformedRequest(format!(
            "`comment` exceeds {} characters",
            max_chars
        )));
    }
    Ok(())
}

/// `POST /classify`: validates, then runs the shared classifier.
///
/// Validation happens before the artifacts are touched, so bad input never
/// triggers a load.
pub async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let Json(req) = payload?;
    let comment = req
        .comment
        .ok_or_else(|| ApiError::MalformedRequest("Missing field `comment`".to_string()))?;
    validate_comment(&comment, state.max_comment_chars)?;

    let classifier = state.classifier.classifier().await.map_err(|e| {
        log::error!("Classifier artifacts failed to load: {}", e);
        ApiError::from(e)
    })?;

    let result = classifier.classify(&comment).map_err(|e| {
        if !matches!(e, ClassifierError::ValidationError(_)) {
            log::error!(
                "Classification failed with artifact set {}: {}",
                classifier.identity(),
                e
            );
        }
        ApiError::from(e)
    })?;

    log::info!("Comment classified as '{}' (label {})", result.category, result.label);
    Ok(Json(ClassifyResponse {
        comment: result.comment,
        prediction: result.label,
        category: result.category,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_comment() {
        assert!(validate_comment("hello", 10).is_ok());
        assert!(validate_comment("", 10).is_err());
        assert!(validate_comment(" \n\t ", 10).is_err());
        assert!(validate_comment("this is too long", 10).is_err());
        // Limit counts characters, not bytes
        assert!(validate_comment("ééééé", 5).is_ok());
    }
}
