pub mod types;
pub mod scaler;
pub mod estimator;
pub mod bundle;
pub mod adapter;
pub mod cache;

pub use types::*;
pub use scaler::*;
pub use estimator::*;
pub use bundle::*;
pub use adapter::*;
pub use cache::*;

use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or validating a persisted model bundle.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Cannot read model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed model file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{component} expects {found} features, schema declares {expected}")]
    DimensionMismatch {
        component: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid decision tree: {0}")]
    InvalidTree(String),

    #[error("Positive class must be 0 or 1, got {0}")]
    InvalidPositiveClass(u8),

    #[error("Model cache lock poisoned")]
    LockPoisoned,
}

/// Failures while running a loaded bundle against a feature record.
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Model schema does not match {model} input order (v{version}): {detail}")]
    SchemaMismatch {
        model: &'static str,
        version: u32,
        detail: String,
    },

    #[error("Input has {found} values, model expects {expected}")]
    InputLength { expected: usize, found: usize },
}
