//! Mix design validation
//!
//! Inputs must be finite and non-negative. Required fields reject zero
//! under the default policy. Values outside the ranges observed in the
//! training data are reported as extrapolation, not rejected.

use serde::{Deserialize, Serialize};

use crate::mix::MixDesign;
use crate::{ConcreteError, ConfidenceLevel, Result};

/// Whether zero values in required fields are rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroPolicy {
    /// Reject zero cement, water, aggregates and age (the default)
    Reject,
    /// Accept zeros anywhere and let range reporting flag them
    Allow,
}

/// Observed [min, max] per field in the training data, in training order
pub const OBSERVED_RANGES: [(f64, f64); MixDesign::FEATURE_COUNT] = [
    (102.0, 540.0),  // cement
    (0.0, 359.4),    // blast_furnace_slag
    (0.0, 200.1),    // fly_ash
    (121.8, 247.0),  // water
    (0.0, 32.2),     // superplasticizer
    (801.0, 1145.0), // coarse_aggregate
    (594.0, 992.6),  // fine_aggregate
    (1.0, 365.0),    // age
];

// cement, water, coarse_aggregate, fine_aggregate, age
const REQUIRED_NONZERO: [usize; 5] = [0, 3, 5, 6, 7];

/// Outcome of validating a mix that passed the hard checks
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Names of fields outside the observed training ranges
    pub extrapolated: Vec<&'static str>,
}

impl ValidationReport {
    pub fn is_in_range(&self) -> bool {
        self.extrapolated.is_empty()
    }

    /// Confidence grade: every field out of range costs trust
    pub fn confidence(&self) -> ConfidenceLevel {
        match self.extrapolated.len() {
            0 => ConfidenceLevel::High,
            1 => ConfidenceLevel::Medium,
            _ => ConfidenceLevel::Low,
        }
    }
}

/// Validate a canonical-unit mix against the zero policy and the
/// observed training ranges.
pub fn validate_mix(mix: &MixDesign, policy: ZeroPolicy) -> Result<ValidationReport> {
    let vector = mix.to_vector();

    for i in 0..MixDesign::FEATURE_COUNT {
        let name = MixDesign::FIELD_NAMES[i];
        let value = vector[i];

        if !value.is_finite() {
            return Err(ConcreteError::InvalidInput {
                field: name,
                reason: format!("must be a finite number, got {}", value),
            });
        }
        if value < 0.0 {
            return Err(ConcreteError::InvalidInput {
                field: name,
                reason: format!("must be non-negative, got {}", value),
            });
        }
        if policy == ZeroPolicy::Reject && value == 0.0 && REQUIRED_NONZERO.contains(&i) {
            return Err(ConcreteError::InvalidInput {
                field: name,
                reason: "must be greater than zero".to_string(),
            });
        }
    }

    let mut report = ValidationReport::default();
    for i in 0..MixDesign::FEATURE_COUNT {
        let (min, max) = OBSERVED_RANGES[i];
        if vector[i] < min || vector[i] > max {
            report.extrapolated.push(MixDesign::FIELD_NAMES[i]);
        }
    }
    Ok(report)
}
