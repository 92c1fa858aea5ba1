//! Feature scaling
//!
//! Standard scaling with the per-feature mean and standard deviation
//! recorded at fit time. A model trained on scaled inputs only produces
//! sensible output when paired with the scaler it was fit alongside.

use serde::{Deserialize, Serialize};

use crate::{ConcreteError, Result};

/// Per-feature affine transform `(x - mean) / scale`, in training order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl FeatureScaler {
    /// Identity scaler over `n` features
    pub fn identity(n: usize) -> Self {
        FeatureScaler {
            mean: vec![0.0; n],
            scale: vec![1.0; n],
        }
    }

    /// Number of features this scaler expects
    pub fn feature_count(&self) -> usize {
        self.mean.len()
    }

    /// Apply the transform to a feature vector in training order
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>> {
        if features.len() != self.feature_count() {
            return Err(ConcreteError::ScalingMismatch {
                expected: self.feature_count(),
                actual: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }

    /// Structural check run at artifact load time
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "{} means but {} scales",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if self.mean.is_empty() {
            return Err("scaler covers no features".to_string());
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err("non-finite mean".to_string());
        }
        if self.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err("scale values must be finite and non-zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let scaler = FeatureScaler {
            mean: vec![10.0, 0.0],
            scale: vec![2.0, 4.0],
        };
        let out = scaler.transform(&[14.0, -8.0]).unwrap();
        assert_eq!(out, vec![2.0, -2.0]);
    }

    #[test]
    fn test_identity_passthrough() {
        let scaler = FeatureScaler::identity(3);
        let out = scaler.transform(&[1.5, -2.0, 0.0]).unwrap();
        assert_eq!(out, vec![1.5, -2.0, 0.0]);
    }

    #[test]
    fn test_arity_mismatch() {
        let scaler = FeatureScaler::identity(8);
        let err = scaler.transform(&[1.0, 2.0]).unwrap_err();
        match err {
            ConcreteError::ScalingMismatch { expected, actual } => {
                assert_eq!(expected, 8);
                assert_eq!(actual, 2);
            }
            other => panic!("expected ScalingMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let scaler = FeatureScaler {
            mean: vec![0.0, 0.0],
            scale: vec![1.0, 0.0],
        };
        assert!(scaler.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let scaler = FeatureScaler {
            mean: vec![0.0, 0.0],
            scale: vec![1.0],
        };
        assert!(scaler.validate().is_err());
    }
}
