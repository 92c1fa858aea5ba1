//! Prediction and inference
//!
//! Turn loaded artifacts into strength predictions.

pub mod service;

pub use service::{format_prediction, Predictor};
