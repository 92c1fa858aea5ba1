//! Gradient-boosted tree ensemble
//!
//! Inference follows the standard boosting contract:
//! `prediction = base_prediction + learning_rate * sum(tree_m(x))`
//! over every fitted tree, applied in order.

use serde::{Deserialize, Serialize};

use crate::model::tree::RegressionTree;
use crate::{ConcreteError, Result};

/// A fitted gradient-boosted regressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedRegressor {
    /// Prior prediction before any tree contributions (training-set mean)
    pub base_prediction: f64,
    /// Shrinkage applied to every tree's contribution
    pub learning_rate: f64,
    /// Number of input features the ensemble was fit on
    pub n_features: usize,
    /// Fitted trees, applied in order
    pub trees: Vec<RegressionTree>,
}

impl GradientBoostedRegressor {
    /// Run inference on a feature vector in training order
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features {
            return Err(ConcreteError::Inference(format!(
                "model expects {} features but got {}",
                self.n_features,
                features.len()
            )));
        }
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        Ok(self.base_prediction + self.learning_rate * sum)
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Structural check run at artifact load time
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.base_prediction.is_finite() {
            return Err("base prediction is not finite".to_string());
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(format!("learning rate {} is not positive", self.learning_rate));
        }
        if self.n_features == 0 {
            return Err("feature count is zero".to_string());
        }
        for (m, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|reason| format!("tree {}: {}", m, reason))?;
        }
        Ok(())
    }
}
