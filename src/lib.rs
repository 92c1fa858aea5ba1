//! Concrete compressive strength prediction
//!
//! Predicts the compressive strength of a concrete mix design using a
//! pre-trained gradient-boosted regression model.

pub mod mix;
pub mod model;
pub mod predict;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use mix::ZeroPolicy;

/// Round a value to `decimals` decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// EN 206 strength class band for a predicted strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrengthClass {
    C8,
    C12,
    C16,
    C20,
    C25,
    C30,
    C35,
    C40,
    C50,
    C60Plus,
}

impl StrengthClass {
    /// Classify a predicted strength in N/mm² into its class band
    pub fn from_strength(n_per_mm2: f64) -> Self {
        match n_per_mm2 {
            s if s < 12.0 => StrengthClass::C8,
            s if s < 16.0 => StrengthClass::C12,
            s if s < 20.0 => StrengthClass::C16,
            s if s < 25.0 => StrengthClass::C20,
            s if s < 30.0 => StrengthClass::C25,
            s if s < 37.0 => StrengthClass::C30,
            s if s < 45.0 => StrengthClass::C35,
            s if s < 50.0 => StrengthClass::C40,
            s if s < 60.0 => StrengthClass::C50,
            _ => StrengthClass::C60Plus,
        }
    }

    /// Cylinder/cube designation, e.g. "C30/37"
    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthClass::C8 => "C8/10",
            StrengthClass::C12 => "C12/15",
            StrengthClass::C16 => "C16/20",
            StrengthClass::C20 => "C20/25",
            StrengthClass::C25 => "C25/30",
            StrengthClass::C30 => "C30/37",
            StrengthClass::C35 => "C35/45",
            StrengthClass::C40 => "C40/50",
            StrengthClass::C50 => "C50/60",
            StrengthClass::C60Plus => "C60+",
        }
    }
}

impl fmt::Display for StrengthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Confidence level based on how much of the input lies inside the
/// ranges the model was trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    High,   // All inputs inside the training ranges
    Medium, // One input outside the training ranges
    Low,    // Two or more inputs outside the training ranges
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceLevel::High => write!(f, "High"),
            ConfidenceLevel::Medium => write!(f, "Medium"),
            ConfidenceLevel::Low => write!(f, "Low"),
        }
    }
}

/// Model prediction output
#[derive(Debug, Clone, Serialize)]
pub struct StrengthPrediction {
    /// Compressive strength in N/mm², rounded to 4 decimal places
    pub strength: f64,
    pub class: StrengthClass,
    pub confidence: ConfidenceLevel,
    pub extrapolated: Vec<&'static str>,
}

impl fmt::Display for StrengthPrediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} N/mm²", self.strength)
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum ConcreteError {
    #[error("Model artifact not found at {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    #[error("Artifact {} is corrupt: {reason}", path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Scaler expects {expected} features but got {actual}")]
    ScalingMismatch { expected: usize, actual: usize },

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConcreteError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub artifact: ArtifactConfig,
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    pub model_path: String,
    #[serde(default)]
    pub scaler_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub zero_policy: ZeroPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            artifact: ArtifactConfig {
                model_path: "model/strength_gb.json".to_string(),
                scaler_path: None,
            },
            validation: ValidationConfig {
                zero_policy: ZeroPolicy::Reject,
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConcreteError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| ConcreteError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConcreteError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(69.123456, 4), 69.1235);
        assert_eq!(round_to(69.123449, 4), 69.1234);
        assert_eq!(round_to(41.0, 4), 41.0);
        assert_eq!(round_to(16.3251, 2), 16.33);
    }

    #[test]
    fn test_strength_class_bands() {
        assert_eq!(StrengthClass::from_strength(9.5), StrengthClass::C8);
        assert_eq!(StrengthClass::from_strength(22.0), StrengthClass::C20);
        assert_eq!(StrengthClass::from_strength(36.99), StrengthClass::C30);
        assert_eq!(StrengthClass::from_strength(37.0), StrengthClass::C35);
        assert_eq!(StrengthClass::from_strength(69.12), StrengthClass::C60Plus);
        assert_eq!(StrengthClass::from_strength(37.0).as_str(), "C35/45");
    }

    #[test]
    fn test_prediction_display_two_decimals() {
        let pred = StrengthPrediction {
            strength: 69.1234,
            class: StrengthClass::C60Plus,
            confidence: ConfidenceLevel::High,
            extrapolated: Vec::new(),
        };
        assert_eq!(pred.to_string(), "69.12 N/mm²");
    }

    #[test]
    fn test_config_roundtrip() {
        let path = std::env::temp_dir().join(format!("concrete_config_{}.toml", std::process::id()));
        let path = path.to_str().unwrap().to_string();

        let mut config = Config::default();
        config.artifact.scaler_path = Some("model/scaler.json".to_string());
        config.validation.zero_policy = ZeroPolicy::Allow;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.artifact.scaler_path.as_deref(), Some("model/scaler.json"));
        assert_eq!(loaded.validation.zero_policy, ZeroPolicy::Allow);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_config_load_missing() {
        let err = Config::load("/nonexistent/concrete.toml").unwrap_err();
        assert!(matches!(err, ConcreteError::Config(_)));
    }
}
