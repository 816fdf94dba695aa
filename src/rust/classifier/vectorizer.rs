use std::collections::HashMap;
use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::{l1_normalize_vector, normalize_vector};

/// Turns raw text into a fixed-width feature vector.
///
/// Implementations are immutable after construction and shared between
/// concurrent requests, so `transform` takes `&self` and must not mutate.
pub trait Vectorizer: Send + Sync + fmt::Debug {
    /// Width of every vector produced by `transform`
    fn dimension(&self) -> usize;

    /// Converts a single text into its feature vector.
    ///
    /// # Errors
    /// - `FeatureExtraction` if the fitted state cannot represent the text
    fn transform(&self, text: &str) -> Result<Array1<f32>, ClassifierError>;
}

/// Normalization applied to the weighted term vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_min_token_len() -> usize {
    2
}

/// On-disk form of a fitted TF-IDF vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfConfig {
    /// Term (or space-joined n-gram) to column index
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column
    pub idf: Vec<f32>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
}

/// A fitted TF-IDF vectorizer with a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    lowercase: bool,
    sublinear_tf: bool,
    norm: Option<Norm>,
    ngram_range: (usize, usize),
    min_token_len: usize,
}

impl TfidfVectorizer {
    /// Validates a fitted configuration and wraps it for inference.
    ///
    /// # Errors
    /// - `BuildError` if the idf table is empty or contains non-finite weights
    /// - `BuildError` if any vocabulary index falls outside the idf table
    /// - `BuildError` if the n-gram range or token length is nonsensical
    pub fn from_config(config: TfidfConfig) -> Result<Self, ClassifierError> {
        if config.idf.is_empty() {
            return Err(ClassifierError::BuildError("Vectorizer idf table is empty".into()));
        }
        if let Some(pos) = config.idf.iter().position(|w| !w.is_finite()) {
            return Err(ClassifierError::BuildError(format!(
                "Vectorizer idf weight {} is not finite",
                pos
            )));
        }
        if let Some((term, &idx)) = config.vocabulary.iter().find(|&(_, &idx)| idx >= config.idf.len()) {
            return Err(ClassifierError::BuildError(format!(
                "Vocabulary term '{}' maps to column {} but the idf table has {} columns",
                term,
                idx,
                config.idf.len()
            )));
        }
        let (min_n, max_n) = config.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::BuildError(format!(
                "Invalid n-gram range ({}, {})",
                min_n, max_n
            )));
        }
        if config.min_token_len == 0 {
            return Err(ClassifierError::BuildError("Minimum token length must be at least 1".into()));
        }

        Ok(Self {
            vocabulary: config.vocabulary,
            idf: config.idf,
            lowercase: config.lowercase,
            sublinear_tf: config.sublinear_tf,
            norm: config.norm,
            ngram_range: config.ngram_range,
            min_token_len: config.min_token_len,
        })
    }

    /// Number of terms the vectorizer was fitted with
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Splits text into word tokens the way the vocabulary was built.
    ///
    /// Word characters are alphanumerics and `_`; everything else separates
    /// tokens. Tokens shorter than `min_token_len` characters are dropped.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().count() >= self.min_token_len)
            .map(str::to_string)
            .collect()
    }

    /// Produces every n-gram in the configured range, in text order.
    fn analyze(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        let (min_n, max_n) = self.ngram_range;
        if (min_n, max_n) == (1, 1) {
            return tokens;
        }

        let mut grams = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            grams.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
        grams
    }
}

impl Vectorizer for TfidfVectorizer {
    fn dimension(&self) -> usize {
        self.idf.len()
    }

    fn transform(&self, text: &str) -> Result<Array1<f32>, ClassifierError> {
        let mut counts: HashMap<usize, f32> = HashMap::new();
        for gram in self.analyze(text) {
            if let Some(&idx) = self.vocabulary.get(&gram) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: Array1<f32> = Array1::zeros(self.dimension());
        for (idx, count) in counts {
            let idf = self.idf.get(idx).ok_or_else(|| {
                ClassifierError::FeatureExtraction(format!(
                    "Vocabulary column {} outside idf table of {}",
                    idx,
                    self.idf.len()
                ))
            })?;
            let tf = if self.sublinear_tf { 1.0 + count.ln() } else { count };
            vector[idx] = tf * idf;
        }

        let vector = match self.norm {
            Some(Norm::L2) => normalize_vector(&vector),
            Some(Norm::L1) => l1_normalize_vector(&vector),
            None => vector,
        };

        if vector.iter().any(|x| !x.is_finite()) {
            return Err(ClassifierError::FeatureExtraction(
                "Vectorizer produced non-finite feature weights".into(),
            ));
        }
        Ok(vector)
    }
}
