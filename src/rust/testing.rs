//! Fixtures shared by unit tests.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::manifest::{DEFAULT_CLASSIFIER_FILE, DEFAULT_VECTORIZER_FILE};

/// Writes a vectorizer/classifier pair that flags any text containing "x".
pub(crate) fn write_test_artifacts(dir: &Path) {
    let vectorizer = json!({
        "vocabulary": {"hate": 0, "x": 1, "love": 2},
        "idf": [1.0, 1.0, 1.0],
        "min_token_len": 1
    });
    let classifier = json!({
        "classes": [0, 1],
        "coef": [[0.0, 1.0, 0.0]],
        "intercept": [-0.1]
    });
    fs::write(dir.join(DEFAULT_VECTORIZER_FILE), vectorizer.to_string()).unwrap();
    fs::write(dir.join(DEFAULT_CLASSIFIER_FILE), classifier.to_string()).unwrap();
}
