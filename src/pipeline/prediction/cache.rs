use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::error;

use super::bundle::{bundle_paths, ModelBundle};
use super::types::DiseaseModel;
use super::BundleError;

/// Loads each disease model from `models_dir` at most once per process.
///
/// Bundles are read-only after load and handed out as `Arc`s. A failed load
/// is not remembered, so a later request retries once the files are fixed.
pub struct BundleCache {
    models_dir: PathBuf,
    bundles: RwLock<HashMap<DiseaseModel, Arc<ModelBundle>>>,
}

impl BundleCache {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            bundles: RwLock::new(HashMap::new()),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Register an already-built bundle (tests, embedded models).
    pub fn insert(&self, disease: DiseaseModel, bundle: ModelBundle) -> Result<(), BundleError> {
        let mut guard = self.bundles.write().map_err(|_| BundleError::LockPoisoned)?;
        guard.insert(disease, Arc::new(bundle));
        Ok(())
    }

    pub fn is_loaded(&self, disease: DiseaseModel) -> bool {
        self.bundles
            .read()
            .map(|g| g.contains_key(&disease))
            .unwrap_or(false)
    }

    pub fn get(&self, disease: DiseaseModel) -> Result<Arc<ModelBundle>, BundleError> {
        {
            let guard = self.bundles.read().map_err(|_| BundleError::LockPoisoned)?;
            if let Some(bundle) = guard.get(&disease) {
                return Ok(Arc::clone(bundle));
            }
        }

        let (model_path, scaler_path) = bundle_paths(&self.models_dir, disease.as_str());
        let bundle = ModelBundle::load(&model_path, &scaler_path).map_err(|e| {
            error!(model = %disease, error = %e, "Model bundle failed to load");
            e
        })?;

        let mut guard = self.bundles.write().map_err(|_| BundleError::LockPoisoned)?;
        // Another caller may have loaded it meanwhile; keep the first copy.
        let bundle = guard.entry(disease).or_insert_with(|| Arc::new(bundle));
        Ok(Arc::clone(bundle))
    }
}
