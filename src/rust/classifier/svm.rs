use std::fmt;

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::Label;

/// Maps a feature vector to exactly one label.
pub trait Predictor: Send + Sync + fmt::Debug {
    /// Width of the feature vectors this predictor accepts
    fn n_features(&self) -> usize;

    /// Predicts the label for a single feature vector.
    ///
    /// # Errors
    /// - `Prediction` if the vector width does not match `n_features`
    /// - `Prediction` if the decision function is not finite
    fn predict(&self, features: ArrayView1<'_, f32>) -> Result<Label, ClassifierError>;
}

/// On-disk form of a fitted linear SVM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvmConfig {
    /// Labels in the order the decision functions refer to them
    pub classes: Vec<Label>,
    /// One weight row per decision function
    pub coef: Vec<Vec<f32>>,
    /// One bias per decision function
    pub intercept: Vec<f32>,
}

/// A fitted linear SVM. Binary models carry a single decision function;
/// multi-class models carry one row per class (one-vs-rest).
#[derive(Debug, Clone)]
pub struct LinearSvm {
    classes: Vec<Label>,
    coef: Array2<f32>,
    intercept: Array1<f32>,
}

impl LinearSvm {
    /// Validates a fitted configuration and packs the weights into a matrix.
    ///
    /// # Errors
    /// - `BuildError` if fewer than two classes are declared
    /// - `BuildError` if the weight rows are empty or ragged
    /// - `BuildError` if rows, classes and intercepts do not line up
    pub fn from_config(config: LinearSvmConfig) -> Result<Self, ClassifierError> {
        if config.classes.len() < 2 {
            return Err(ClassifierError::BuildError(format!(
                "A classifier needs at least 2 classes, found {}",
                config.classes.len()
            )));
        }

        let rows = config.coef.len();
        let expected_rows = if config.classes.len() == 2 { 1 } else { config.classes.len() };
        if rows != expected_rows {
            return Err(ClassifierError::BuildError(format!(
                "Expected {} weight rows for {} classes, found {}",
                expected_rows,
                config.classes.len(),
                rows
            )));
        }
        if config.intercept.len() != rows {
            return Err(ClassifierError::BuildError(format!(
                "Expected {} intercepts, found {}",
                rows,
                config.intercept.len()
            )));
        }

        let n_features = config.coef[0].len();
        if n_features == 0 {
            return Err(ClassifierError::BuildError("Weight rows cannot be empty".into()));
        }
        if let Some(pos) = config.coef.iter().position(|row| row.len() != n_features) {
            return Err(ClassifierError::BuildError(format!(
                "Weight row {} has {} columns, expected {}",
                pos,
                config.coef[pos].len(),
                n_features
            )));
        }

        let flat: Vec<f32> = config.coef.into_iter().flatten().collect();
        let coef = Array2::from_shape_vec((rows, n_features), flat)
            .map_err(|e| ClassifierError::BuildError(format!("Failed to create weight matrix: {}", e)))?;

        Ok(Self {
            classes: config.classes,
            coef,
            intercept: Array1::from(config.intercept),
        })
    }

    /// Labels this model can emit
    pub fn classes(&self) -> &[Label] {
        &self.classes
    }

    /// Raw decision values, one per weight row.
    pub fn decision_function(&self, features: ArrayView1<'_, f32>) -> Result<Array1<f32>, ClassifierError> {
        if features.len() != self.n_features() {
            return Err(ClassifierError::Prediction(format!(
                "Feature vector has {} columns, classifier expects {}",
                features.len(),
                self.n_features()
            )));
        }

        let scores = self.coef.dot(&features) + &self.intercept;
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(ClassifierError::Prediction("Decision function is not finite".into()));
        }
        Ok(scores)
    }
}

impl Predictor for LinearSvm {
    fn n_features(&self) -> usize {
        self.coef.ncols()
    }

    fn predict(&self, features: ArrayView1<'_, f32>) -> Result<Label, ClassifierError> {
        let scores = self.decision_function(features)?;

        let index = if scores.len() == 1 {
            usize::from(scores[0] > 0.0)
        } else {
            // First of equal maxima wins
            scores
                .iter()
                .enumerate()
                .fold(None, |best: Option<(usize, f32)>, (i, &score)| match best {
                    Some((_, top)) if top >= score => best,
                    _ => Some((i, score)),
                })
                .map(|(i, _)| i)
                .ok_or_else(|| ClassifierError::Prediction("Classifier produced no scores".into()))?
        };

        self.classes
            .get(index)
            .copied()
            .ok_or_else(|| ClassifierError::Prediction(format!("No class at index {}", index)))
    }
}
