use serde::{Deserialize, Serialize};

use super::{BundleError, PredictionError};

/// Feature scaler fitted at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scaler {
    /// Standardisation: `(x - mean) / scale`.
    Standard { mean: Vec<f64>, scale: Vec<f64> },
}

impl Scaler {
    pub fn n_features(&self) -> usize {
        match self {
            Self::Standard { mean, .. } => mean.len(),
        }
    }

    /// Check that every parameter vector is `n_features` long.
    pub fn validate(&self, n_features: usize) -> Result<(), BundleError> {
        match self {
            Self::Standard { mean, scale } => {
                if mean.len() != n_features {
                    return Err(BundleError::DimensionMismatch {
                        component: "scaler",
                        expected: n_features,
                        found: mean.len(),
                    });
                }
                if scale.len() != n_features {
                    return Err(BundleError::DimensionMismatch {
                        component: "scaler scale",
                        expected: n_features,
                        found: scale.len(),
                    });
                }
                Ok(())
            }
        }
    }

    pub fn transform(&self, input: &[f64]) -> Result<Vec<f64>, PredictionError> {
        if input.len() != self.n_features() {
            return Err(PredictionError::InputLength {
                expected: self.n_features(),
                found: input.len(),
            });
        }

        match self {
            Self::Standard { mean, scale } => Ok(input
                .iter()
                .zip(mean)
                .zip(scale)
                .map(|((x, m), s)| {
                    // Constant training columns carry a zero scale; treat as 1.
                    let s = if *s == 0.0 { 1.0 } else { *s };
                    (x - m) / s
                })
                .collect()),
        }
    }
}
