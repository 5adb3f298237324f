use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::estimator::Estimator;
use super::scaler::Scaler;
use super::types::RiskLabel;
use super::{BundleError, PredictionError};

/// Ordered input columns the scaler and estimator were trained on.
///
/// Order is load-bearing: the adapter refuses a bundle whose schema differs
/// from the order it builds vectors in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u32,
    pub features: Vec<String>,
}

impl FeatureSchema {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// On-disk layout of `<name>_model.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub schema: FeatureSchema,
    /// Class value meaning "at risk". Training sets disagree on this.
    #[serde(default = "default_positive_class")]
    pub positive_class: u8,
    pub estimator: Estimator,
}

fn default_positive_class() -> u8 {
    1
}

/// Estimator + scaler pair, immutable once loaded.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    schema: FeatureSchema,
    positive_class: u8,
    estimator: Estimator,
    scaler: Scaler,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, BundleError> {
    let bytes = std::fs::read(path).map_err(|source| BundleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| BundleError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl ModelBundle {
    /// Assemble and validate a bundle from its parts.
    pub fn new(model: ModelFile, scaler: Scaler) -> Result<Self, BundleError> {
        let width = model.schema.len();

        scaler.validate(width)?;
        model.estimator.validate(width)?;
        if model.positive_class > 1 {
            return Err(BundleError::InvalidPositiveClass(model.positive_class));
        }

        Ok(Self {
            schema: model.schema,
            positive_class: model.positive_class,
            estimator: model.estimator,
            scaler,
        })
    }

    /// Load the estimator file and the scaler file.
    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self, BundleError> {
        let model: ModelFile = read_json(model_path)?;
        let scaler: Scaler = read_json(scaler_path)?;
        let bundle = Self::new(model, scaler)?;

        info!(
            model = %model_path.display(),
            schema_version = bundle.schema.version,
            features = bundle.schema.len(),
            "Model bundle loaded"
        );
        Ok(bundle)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn transform(&self, input: &[f64]) -> Result<Vec<f64>, PredictionError> {
        self.scaler.transform(input)
    }

    /// Scale then classify a raw vector in schema order.
    pub fn classify(&self, input: &[f64]) -> Result<RiskLabel, PredictionError> {
        let scaled = self.transform(input)?;
        let class = self.estimator.predict(&scaled, self.schema.len())?;
        Ok(if class == self.positive_class {
            RiskLabel::Positive
        } else {
            RiskLabel::Negative
        })
    }
}

/// Paths of the two files backing a bundle named `stem`.
pub fn bundle_paths(models_dir: &Path, stem: &str) -> (PathBuf, PathBuf) {
    (
        models_dir.join(format!("{stem}_model.json")),
        models_dir.join(format!("{stem}_scaler.json")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(names: &[&str]) -> FeatureSchema {
        FeatureSchema {
            version: 1,
            features: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn linear_model(positive_class: u8) -> ModelFile {
        ModelFile {
            schema: schema(&["a", "b"]),
            positive_class,
            estimator: Estimator::Linear {
                coef: vec![1.0, 1.0],
                intercept: 0.0,
            },
        }
    }

    fn identity_scaler(n: usize) -> Scaler {
        Scaler::Standard {
            mean: vec![0.0; n],
            scale: vec![1.0; n],
        }
    }

    #[test]
    fn positive_class_maps_label() {
        let bundle = ModelBundle::new(linear_model(1), identity_scaler(2)).unwrap();
        assert_eq!(bundle.classify(&[1.0, 1.0]).unwrap(), RiskLabel::Positive);
        assert_eq!(bundle.classify(&[-1.0, -1.0]).unwrap(), RiskLabel::Negative);

        let inverted = ModelBundle::new(linear_model(0), identity_scaler(2)).unwrap();
        assert_eq!(inverted.classify(&[1.0, 1.0]).unwrap(), RiskLabel::Negative);
    }

    #[test]
    fn scaler_width_must_match_schema() {
        let err = ModelBundle::new(linear_model(1), identity_scaler(3)).unwrap_err();
        assert!(matches!(
            err,
            BundleError::DimensionMismatch { component: "scaler", expected: 2, found: 3 }
        ));
    }

    #[test]
    fn scaler_scale_width_must_match_schema() {
        let scaler = Scaler::Standard {
            mean: vec![0.0; 2],
            scale: vec![1.0],
        };
        let err = ModelBundle::new(linear_model(1), scaler).unwrap_err();
        assert!(matches!(
            err,
            BundleError::DimensionMismatch { component: "scaler scale", expected: 2, found: 1 }
        ));
    }

    #[test]
    fn positive_class_out_of_range_is_rejected() {
        let err = ModelBundle::new(linear_model(2), identity_scaler(2)).unwrap_err();
        assert!(matches!(err, BundleError::InvalidPositiveClass(2)));
    }

    #[test]
    fn load_reads_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let (model_path, scaler_path) = bundle_paths(dir.path(), "demo");
        std::fs::write(&model_path, serde_json::to_vec(&linear_model(1)).unwrap()).unwrap();
        std::fs::write(&scaler_path, serde_json::to_vec(&identity_scaler(2)).unwrap()).unwrap();

        let bundle = ModelBundle::load(&model_path, &scaler_path).unwrap();
        assert_eq!(bundle.schema().features, vec!["a", "b"]);
    }

    #[test]
    fn positive_class_defaults_to_one() {
        let json = r#"{"schema":{"version":1,"features":["a"]},
                       "estimator":{"type":"linear","coef":[1.0],"intercept":0.0}}"#;
        let model: ModelFile = serde_json::from_str(json).unwrap();
        assert_eq!(model.positive_class, 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let (model_path, scaler_path) = bundle_paths(dir.path(), "absent");
        let err = ModelBundle::load(&model_path, &scaler_path).unwrap_err();
        assert!(matches!(err, BundleError::Io { .. }));
    }

    #[test]
    fn garbage_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let (model_path, scaler_path) = bundle_paths(dir.path(), "bad");
        std::fs::write(&model_path, b"\x80\x04pickle").unwrap();
        std::fs::write(&scaler_path, b"{}").unwrap();
        let err = ModelBundle::load(&model_path, &scaler_path).unwrap_err();
        assert!(matches!(err, BundleError::Parse { .. }));
    }
}
