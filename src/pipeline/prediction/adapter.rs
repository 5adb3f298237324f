//! Bridges a `FeatureRecord` to one classifier's input contract.
//!
//! Each adapter hard-codes the training-time column order and checks it
//! against the bundle's `FeatureSchema` before predicting. Required fields
//! missing from the record are zero-filled and reported; a missing driver
//! field makes the prediction unavailable instead.

use std::collections::BTreeSet;

use tracing::{info, warn};

use super::bundle::ModelBundle;
use super::types::{DiseaseModel, Prediction, PredictionOutcome, RiskLabel};
use super::PredictionError;
use crate::pipeline::features::{FeatureRecord, Field};

/// Version of the column layouts below.
pub const SCHEMA_VERSION: u32 = 1;

/// Pima diabetes training order.
const DIABETES_COLUMNS: &[&str] = &[
    "pregnancies",
    "glucose",
    "blood_pressure",
    "skin_thickness",
    "insulin",
    "bmi",
    "diabetes_pedigree_function",
    "age",
];

/// Wisconsin diagnostic training order (30 columns).
const BREAST_CANCER_COLUMNS: &[&str] = &[
    "radius_mean",
    "texture_mean",
    "perimeter_mean",
    "area_mean",
    "smoothness_mean",
    "compactness_mean",
    "concavity_mean",
    "concave_points_mean",
    "symmetry_mean",
    "fractal_dimension_mean",
    "radius_se",
    "texture_se",
    "perimeter_se",
    "area_se",
    "smoothness_se",
    "compactness_se",
    "concavity_se",
    "concave_points_se",
    "symmetry_se",
    "fractal_dimension_se",
    "radius_worst",
    "texture_worst",
    "perimeter_worst",
    "area_worst",
    "smoothness_worst",
    "compactness_worst",
    "concavity_worst",
    "concave_points_worst",
    "symmetry_worst",
    "fractal_dimension_worst",
];

/// Input contract of one disease model.
#[derive(Debug)]
pub struct PredictionAdapter {
    pub disease: DiseaseModel,
    /// Training-time column order.
    pub columns: &'static [&'static str],
    /// Columns that extraction can fill, in column order.
    pub required: &'static [Field],
    /// Without this field no prediction is made.
    pub driver: Field,
    pub positive_message: &'static str,
    pub negative_message: &'static str,
}

pub static DIABETES: PredictionAdapter = PredictionAdapter {
    disease: DiseaseModel::Diabetes,
    columns: DIABETES_COLUMNS,
    required: &[
        Field::Pregnancies,
        Field::Glucose,
        Field::BloodPressure,
        Field::SkinThickness,
        Field::Insulin,
        Field::Bmi,
        Field::DiabetesPedigreeFunction,
        Field::Age,
    ],
    driver: Field::Glucose,
    positive_message: "Diabetic condition detected",
    negative_message: "No signs of diabetes",
};

/// Only the five `*_mean` measurements come out of report text; the other
/// 25 inputs are always zero. This lowers accuracy and is left as-is until
/// the model is retrained on the derivable subset.
pub static BREAST_CANCER: PredictionAdapter = PredictionAdapter {
    disease: DiseaseModel::BreastCancer,
    columns: BREAST_CANCER_COLUMNS,
    required: &[
        Field::RadiusMean,
        Field::TextureMean,
        Field::PerimeterMean,
        Field::AreaMean,
        Field::SmoothnessMean,
    ],
    driver: Field::RadiusMean,
    positive_message: "Malignant tumor likely",
    negative_message: "Tumor likely benign",
};

impl DiseaseModel {
    pub fn adapter(&self) -> &'static PredictionAdapter {
        match self {
            Self::Diabetes => &DIABETES,
            Self::BreastCancer => &BREAST_CANCER,
        }
    }
}

impl PredictionAdapter {
    /// `Some(reason)` when the driver field is missing from the record.
    pub fn unavailable_reason(&self, record: &FeatureRecord) -> Option<String> {
        if record.is_present(self.driver) {
            None
        } else {
            Some(format!(
                "{} value not found; {} prediction unavailable",
                self.driver, self.disease
            ))
        }
    }

    fn check_schema(&self, bundle: &ModelBundle) -> Result<(), PredictionError> {
        let schema = bundle.schema();
        let mismatch = |detail: String| PredictionError::SchemaMismatch {
            model: self.disease.as_str(),
            version: schema.version,
            detail,
        };

        if schema.version != SCHEMA_VERSION {
            return Err(mismatch(format!(
                "schema version {} is not supported",
                schema.version
            )));
        }
        if schema.len() != self.columns.len() {
            return Err(mismatch(format!(
                "expected {} columns, found {}",
                self.columns.len(),
                schema.len()
            )));
        }
        if let Some((i, (want, got))) = self
            .columns
            .iter()
            .zip(&schema.features)
            .enumerate()
            .find(|(_, (want, got))| **want != got.as_str())
        {
            return Err(mismatch(format!("column {i} is '{got}', expected '{want}'")));
        }
        Ok(())
    }

    /// Vector in column order plus the required fields that were zero-filled.
    pub fn build_input(&self, record: &FeatureRecord) -> (Vec<f64>, BTreeSet<Field>) {
        let mut defaulted = BTreeSet::new();
        let input = self
            .columns
            .iter()
            .map(|column| {
                let Some(field) = self
                    .required
                    .iter()
                    .copied()
                    .find(|f| f.as_str() == *column)
                else {
                    return 0.0;
                };
                match record.get(field) {
                    Some(value) => value.as_f64(),
                    None => {
                        defaulted.insert(field);
                        0.0
                    }
                }
            })
            .collect();
        (input, defaulted)
    }

    /// Run the bundle against the record.
    ///
    /// Returns `Unavailable` without touching the bundle when the driver field
    /// is absent. Missing zero-defaults may be clinically implausible (zero
    /// glucose); that matches how the models have always been fed.
    pub fn predict(
        &self,
        record: &FeatureRecord,
        bundle: &ModelBundle,
    ) -> Result<PredictionOutcome, PredictionError> {
        if let Some(reason) = self.unavailable_reason(record) {
            info!(model = %self.disease, "{reason}");
            return Ok(PredictionOutcome::Unavailable { reason });
        }

        self.check_schema(bundle)?;

        let (input, defaulted) = self.build_input(record);
        if !defaulted.is_empty() {
            let names: Vec<&str> = defaulted.iter().map(|f| f.as_str()).collect();
            warn!(
                model = %self.disease,
                missing = %names.join(", "),
                "Using 0 for missing inputs; prediction confidence is reduced"
            );
        }

        let label = bundle.classify(&input)?;
        let message = match label {
            RiskLabel::Positive => self.positive_message,
            RiskLabel::Negative => self.negative_message,
        };

        Ok(PredictionOutcome::Predicted(Prediction {
            label,
            message,
            input,
            defaulted,
            unmapped_dimensions: self.columns.len() - self.required.len(),
        }))
    }
}
