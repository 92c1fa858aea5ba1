//! Process-lifetime artifact cache
//!
//! Loading an artifact costs orders of magnitude more than a prediction,
//! so artifacts load once on first use and are shared read-only for the
//! rest of the process. Swapping artifact files requires a restart.

use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::sync::Arc;

use crate::model::artifact::{ModelArtifact, ScalerArtifact};
use crate::{ArtifactConfig, Result};

/// A loaded model with its optional paired scaler
#[derive(Debug, Clone)]
pub struct LoadedArtifacts {
    pub model: ModelArtifact,
    pub scaler: Option<ScalerArtifact>,
}

/// Lazily populated artifact cache.
///
/// Concurrent first calls to `get` load at most once; every caller shares
/// the same `Arc`. A failed load leaves the cell empty, so a later call
/// retries after the file is fixed.
#[derive(Debug)]
pub struct ArtifactStore {
    model_path: PathBuf,
    scaler_path: Option<PathBuf>,
    cell: OnceCell<Arc<LoadedArtifacts>>,
}

impl ArtifactStore {
    pub fn new(model_path: impl Into<PathBuf>, scaler_path: Option<PathBuf>) -> Self {
        ArtifactStore {
            model_path: model_path.into(),
            scaler_path,
            cell: OnceCell::new(),
        }
    }

    pub fn from_config(config: &ArtifactConfig) -> Self {
        ArtifactStore::new(
            config.model_path.clone(),
            config.scaler_path.as_ref().map(PathBuf::from),
        )
    }

    /// Get the cached artifacts, loading them on first call
    pub fn get(&self) -> Result<Arc<LoadedArtifacts>> {
        self.cell
            .get_or_try_init(|| {
                let model = ModelArtifact::load(&self.model_path)?;
                log::info!(
                    "Loaded model {} ({} trees, trained {})",
                    model.model_id,
                    model.model.tree_count(),
                    model.trained_at
                );
                let scaler = match &self.scaler_path {
                    Some(path) => {
                        let scaler = ScalerArtifact::load(path)?;
                        log::info!("Loaded scaler paired with model {}", scaler.model_id);
                        Some(scaler)
                    }
                    None => None,
                };
                Ok(Arc::new(LoadedArtifacts { model, scaler }))
            })
            .cloned()
    }

    pub fn model_path(&self) -> &PathBuf {
        &self.model_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mix::MixDesign;
    use crate::model::artifact::SCHEMA_VERSION;
    use crate::model::ensemble::GradientBoostedRegressor;
    use crate::model::tree::RegressionTree;
    use crate::ConcreteError;
    use chrono::NaiveDate;

    fn write_artifact(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("concrete_store_{}_{}", std::process::id(), name));
        let artifact = ModelArtifact {
            schema_version: SCHEMA_VERSION,
            model_id: "store-test".to_string(),
            trained_at: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            feature_names: MixDesign::FIELD_NAMES.iter().map(|s| s.to_string()).collect(),
            scaled_inputs: false,
            model: GradientBoostedRegressor {
                base_prediction: 30.0,
                learning_rate: 0.1,
                n_features: MixDesign::FEATURE_COUNT,
                trees: vec![RegressionTree::leaf(2.0)],
            },
            verification: None,
        };
        artifact.save(&path).unwrap();
        path
    }

    #[test]
    fn test_get_returns_shared_instance() {
        let path = write_artifact("shared.json");
        let store = ArtifactStore::new(path.clone(), None);

        let first = store.get().unwrap();
        let second = store.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_concurrent_first_access_loads_once() {
        let path = write_artifact("concurrent.json");
        let store = Arc::new(ArtifactStore::new(path.clone(), None));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.get().unwrap())
            })
            .collect();

        let loaded: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for artifacts in &loaded[1..] {
            assert!(Arc::ptr_eq(&loaded[0], artifacts));
        }

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_artifact_surfaces_not_found() {
        let store = ArtifactStore::new("/nonexistent/strength.json", None);
        let err = store.get().unwrap_err();
        assert!(matches!(err, ConcreteError::ArtifactNotFound { .. }));
    }

    #[test]
    fn test_failed_load_retries_after_fix() {
        let path = std::env::temp_dir()
            .join(format!("concrete_store_{}_retry.json", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let store = ArtifactStore::new(path.clone(), None);
        assert!(store.get().is_err());

        let good = write_artifact("retry_good.json");
        std::fs::rename(&good, &path).unwrap();
        assert!(store.get().is_ok());

        std::fs::remove_file(&path).unwrap();
    }
}
