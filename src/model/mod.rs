//! Trained model artifacts
//!
//! Everything the prediction side knows about the model:
//! - Ensemble: gradient-boosted regression trees and their inference
//! - Artifact: versioned JSON envelopes produced by the training pipeline
//! - Store: process-lifetime cache that loads artifacts exactly once

pub mod artifact;
pub mod ensemble;
pub mod scaler;
pub mod store;
pub mod tree;

pub use artifact::{ModelArtifact, ScalerArtifact, VerificationSample};
pub use ensemble::GradientBoostedRegressor;
pub use scaler::FeatureScaler;
pub use store::{ArtifactStore, LoadedArtifacts};
