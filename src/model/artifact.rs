//! Artifact serialization
//!
//! Versioned JSON envelopes for the trained model and its optional
//! paired scaler. The training pipeline owns these files; this side
//! loads them, checks the schema and never writes them back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::mix::MixDesign;
use crate::model::ensemble::GradientBoostedRegressor;
use crate::model::scaler::FeatureScaler;
use crate::{ConcreteError, Result};

/// Artifact schema version this build reads and writes
pub const SCHEMA_VERSION: u32 = 1;

fn corrupt(path: &Path, reason: impl Into<String>) -> ConcreteError {
    ConcreteError::ArtifactCorrupt {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn read_artifact(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(raw),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ConcreteError::ArtifactNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

fn write_artifact(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)?;
    Ok(())
}

// ==================== Model artifact ====================

/// Input/output pair recorded at export time. `model verify` replays it
/// to catch corrupted or mispaired artifacts in a deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationSample {
    /// Canonical-unit feature vector in training order
    pub input: Vec<f64>,
    /// Expected prediction, rounded to 4 decimal places
    pub output: f64,
}

/// Serialized regression model with its training metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema_version: u32,
    /// Pairing tag shared with the scaler fit alongside this model
    pub model_id: String,
    /// Date the model was fitted
    pub trained_at: NaiveDate,
    /// Feature names in training order
    pub feature_names: Vec<String>,
    /// True when the model was fit on scaled features and needs its scaler
    #[serde(default)]
    pub scaled_inputs: bool,
    pub model: GradientBoostedRegressor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationSample>,
}

impl ModelArtifact {
    /// Load and schema-check a model artifact
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = read_artifact(path)?;
        let artifact: ModelArtifact = serde_json::from_str(&raw)
            .map_err(|e| corrupt(path, format!("not a valid model artifact: {}", e)))?;
        artifact.check_schema(path)?;
        log::debug!(
            "Read model artifact {} from {}",
            artifact.model_id,
            path.display()
        );
        Ok(artifact)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConcreteError::Config(format!("Failed to serialize model: {}", e)))?;
        write_artifact(path.as_ref(), &content)
    }

    fn check_schema(&self, path: &Path) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(corrupt(
                path,
                format!(
                    "schema version {} is not supported (this build reads {})",
                    self.schema_version, SCHEMA_VERSION
                ),
            ));
        }
        let names_match = self.feature_names.len() == MixDesign::FIELD_NAMES.len()
            && self
                .feature_names
                .iter()
                .zip(MixDesign::FIELD_NAMES.iter())
                .all(|(found, expected)| found == expected);
        if !names_match {
            return Err(corrupt(
                path,
                format!(
                    "feature names {:?} do not match the expected order {:?}",
                    self.feature_names,
                    MixDesign::FIELD_NAMES
                ),
            ));
        }
        if self.model.n_features != MixDesign::FEATURE_COUNT {
            return Err(corrupt(
                path,
                format!(
                    "model was fit on {} features, expected {}",
                    self.model.n_features,
                    MixDesign::FEATURE_COUNT
                ),
            ));
        }
        self.model.validate().map_err(|reason| corrupt(path, reason))?;
        if let Some(sample) = &self.verification {
            if sample.input.len() != MixDesign::FEATURE_COUNT {
                return Err(corrupt(
                    path,
                    format!(
                        "verification sample has {} features, expected {}",
                        sample.input.len(),
                        MixDesign::FEATURE_COUNT
                    ),
                ));
            }
        }
        Ok(())
    }
}

// ==================== Scaler artifact ====================

/// Serialized feature scaler paired with a model by `model_id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub schema_version: u32,
    /// Pairing tag of the model this scaler was fit alongside
    pub model_id: String,
    pub scaler: FeatureScaler,
}

impl ScalerArtifact {
    /// Load and schema-check a scaler artifact
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = read_artifact(path)?;
        let artifact: ScalerArtifact = serde_json::from_str(&raw)
            .map_err(|e| corrupt(path, format!("not a valid scaler artifact: {}", e)))?;
        if artifact.schema_version != SCHEMA_VERSION {
            return Err(corrupt(
                path,
                format!(
                    "schema version {} is not supported (this build reads {})",
                    artifact.schema_version, SCHEMA_VERSION
                ),
            ));
        }
        artifact
            .scaler
            .validate()
            .map_err(|reason| corrupt(path, reason))?;
        Ok(artifact)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConcreteError::Config(format!("Failed to serialize scaler: {}", e)))?;
        write_artifact(path.as_ref(), &content)
    }
}
