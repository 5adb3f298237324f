use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::pipeline::features::Field;

/// Which classifier a prediction belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseModel {
    Diabetes,
    BreastCancer,
}

impl DiseaseModel {
    pub const ALL: &'static [DiseaseModel] = &[Self::Diabetes, Self::BreastCancer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Diabetes => "diabetes",
            Self::BreastCancer => "breast_cancer",
        }
    }
}

impl std::fmt::Display for DiseaseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary classifier output, already mapped to the at-risk direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    Positive,
    Negative,
}

/// A label produced from (possibly partially defaulted) input.
///
/// No probability is carried: the classifiers only expose their decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: RiskLabel,
    /// Human-readable wording of `label` for this disease.
    pub message: &'static str,
    /// Vector handed to the scaler, in schema order.
    pub input: Vec<f64>,
    /// Required fields missing from the record and substituted with zero.
    pub defaulted: BTreeSet<Field>,
    /// Model inputs that extraction never produces; always zero-filled.
    pub unmapped_dimensions: usize,
}

impl Prediction {
    pub fn is_partial(&self) -> bool {
        !self.defaulted.is_empty()
    }
}

/// Per-model result surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionOutcome {
    Predicted(Prediction),
    /// The driver field was absent; no label was produced.
    Unavailable { reason: String },
    /// The model could not be loaded or run. Other models are unaffected.
    Failed { error: String },
}

impl PredictionOutcome {
    pub fn label(&self) -> Option<RiskLabel> {
        match self {
            Self::Predicted(p) => Some(p.label),
            _ => None,
        }
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            Self::Predicted(p) => Some(p),
            _ => None,
        }
    }
}
