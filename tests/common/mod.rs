#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use comment_guard::api::create_router;
use comment_guard::api::handlers::AppState;
use comment_guard::suggest::{CountrySource, LookupError, StaticCountrySource};
use comment_guard::{ClassifierRuntime, SuggestionService};
use serde_json::{json, Value};

pub const COUNTRIES: [&str; 6] = ["Italy", "Iceland", "India", "Indonesia", "Ireland", "Israel"];

/// Vectorizer that knows "hate", "x" and "love"; single-letter tokens are kept.
pub fn vectorizer_json() -> Value {
    json!({
        "vocabulary": {"hate": 0, "x": 1, "love": 2},
        "idf": [1.0, 1.0, 1.0],
        "min_token_len": 1
    })
}

/// Classifier that returns 1 whenever "x" carries weight.
pub fn classifier_json() -> Value {
    json!({
        "classes": [0, 1],
        "coef": [[0.0, 1.0, 0.0]],
        "intercept": [-0.1]
    })
}

pub fn write_json(dir: &Path, file: &str, value: &Value) {
    fs::write(dir.join(file), value.to_string()).expect("Failed to write artifact");
}

pub fn write_artifacts(dir: &Path) {
    write_json(dir, "tfidf_vectorizer.json", &vectorizer_json());
    write_json(dir, "svm_classifier.json", &classifier_json());
}

/// Source that records how often it was asked.
#[derive(Default)]
pub struct CountingSource {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl CountingSource {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CountrySource for CountingSource {
    async fn country_names(&self) -> Result<Vec<String>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LookupError::Unavailable("upstream down".into()));
        }
        Ok(COUNTRIES.iter().map(|s| s.to_string()).collect())
    }
}

pub fn static_source() -> Arc<dyn CountrySource> {
    Arc::new(StaticCountrySource::new(COUNTRIES.to_vec()))
}

pub async fn spawn_app(source: Arc<dyn CountrySource>, runtime: Arc<ClassifierRuntime>) -> String {
    let state = AppState {
        suggestions: Arc::new(SuggestionService::new(source, 5)),
        classifier: runtime,
        max_query_chars: 100,
        max_comment_chars: 5_000,
    };

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}
