//! Mix design representation
//!
//! The eight mix parameters the model was trained on, in a fixed order.
//! All mass-per-volume quantities are canonical kg/m³; age is days.

pub mod units;
pub mod validate;

pub use units::Unit;
pub use validate::{validate_mix, ValidationReport, ZeroPolicy};

use serde::{Deserialize, Serialize};

/// A concrete mix design in canonical units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixDesign {
    /// Cement content (kg/m³)
    pub cement: f64,
    /// Ground granulated blast-furnace slag (kg/m³)
    pub blast_furnace_slag: f64,
    /// Fly ash (kg/m³)
    pub fly_ash: f64,
    /// Mixing water (kg/m³)
    pub water: f64,
    /// Superplasticizer (kg/m³)
    pub superplasticizer: f64,
    /// Coarse aggregate (kg/m³)
    pub coarse_aggregate: f64,
    /// Fine aggregate (kg/m³)
    pub fine_aggregate: f64,
    /// Age of the concrete at test time (days, fractional allowed)
    #[serde(rename = "age")]
    pub age_days: f64,
}

impl MixDesign {
    /// Field names in training order. `to_vector` emits features in exactly
    /// this order and artifacts are checked against it at load time.
    pub const FIELD_NAMES: [&'static str; 8] = [
        "cement",
        "blast_furnace_slag",
        "fly_ash",
        "water",
        "superplasticizer",
        "coarse_aggregate",
        "fine_aggregate",
        "age",
    ];

    /// Number of model features
    pub const FEATURE_COUNT: usize = Self::FIELD_NAMES.len();

    /// Assemble the feature vector in training order
    pub fn to_vector(&self) -> [f64; Self::FEATURE_COUNT] {
        [
            self.cement,
            self.blast_furnace_slag,
            self.fly_ash,
            self.water,
            self.superplasticizer,
            self.coarse_aggregate,
            self.fine_aggregate,
            self.age_days,
        ]
    }

    /// Rebuild a mix from a feature vector in training order
    pub fn from_vector(v: &[f64]) -> Option<Self> {
        if v.len() != Self::FEATURE_COUNT {
            return None;
        }
        Some(MixDesign {
            cement: v[0],
            blast_furnace_slag: v[1],
            fly_ash: v[2],
            water: v[3],
            superplasticizer: v[4],
            coarse_aggregate: v[5],
            fine_aggregate: v[6],
            age_days: v[7],
        })
    }

    /// Convert a mix entered in `unit` into canonical kg/m³.
    ///
    /// Only the seven mass-per-volume fields convert; age is already
    /// unit-independent and passes through untouched.
    pub fn to_canonical(&self, unit: Unit) -> MixDesign {
        MixDesign {
            cement: unit.to_canonical(self.cement),
            blast_furnace_slag: unit.to_canonical(self.blast_furnace_slag),
            fly_ash: unit.to_canonical(self.fly_ash),
            water: unit.to_canonical(self.water),
            superplasticizer: unit.to_canonical(self.superplasticizer),
            coarse_aggregate: unit.to_canonical(self.coarse_aggregate),
            fine_aggregate: unit.to_canonical(self.fine_aggregate),
            age_days: self.age_days,
        }
    }

    /// High-cement 28-day mix from the training data
    pub fn example_high_strength() -> Self {
        MixDesign {
            cement: 540.0,
            blast_furnace_slag: 0.0,
            fly_ash: 0.0,
            water: 162.0,
            superplasticizer: 2.5,
            coarse_aggregate: 1040.0,
            fine_aggregate: 676.0,
            age_days: 28.0,
        }
    }

    /// Low-cement 7-day mix, near the weak end of the training data
    pub fn example_low_strength() -> Self {
        MixDesign {
            cement: 150.0,
            blast_furnace_slag: 0.0,
            fly_ash: 0.0,
            water: 200.0,
            superplasticizer: 0.0,
            coarse_aggregate: 900.0,
            fine_aggregate: 700.0,
            age_days: 7.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_order_matches_field_names() {
        let mix = MixDesign::example_high_strength();
        let v = mix.to_vector();
        assert_eq!(v.len(), MixDesign::FIELD_NAMES.len());
        assert_eq!(v[0], mix.cement);
        assert_eq!(v[1], mix.blast_furnace_slag);
        assert_eq!(v[2], mix.fly_ash);
        assert_eq!(v[3], mix.water);
        assert_eq!(v[4], mix.superplasticizer);
        assert_eq!(v[5], mix.coarse_aggregate);
        assert_eq!(v[6], mix.fine_aggregate);
        assert_eq!(v[7], mix.age_days);
    }

    #[test]
    fn test_to_from_vector() {
        let mix = MixDesign::example_high_strength();
        let v = mix.to_vector();
        let back = MixDesign::from_vector(&v).unwrap();
        assert_eq!(back, mix);
        assert!(MixDesign::from_vector(&v[..7]).is_none());
    }

    #[test]
    fn test_to_canonical_leaves_age_alone() {
        let mix = MixDesign::example_high_strength();
        let converted = mix.to_canonical(Unit::LbPerFt3);
        assert!(converted.cement > mix.cement);
        assert_eq!(converted.age_days, mix.age_days);
    }

    #[test]
    fn test_to_canonical_identity_for_kg() {
        let mix = MixDesign::example_low_strength();
        assert_eq!(mix.to_canonical(Unit::KgPerM3), mix);
    }

    #[test]
    fn test_serde_field_names() {
        let mix = MixDesign::example_high_strength();
        let json = serde_json::to_value(mix).unwrap();
        assert_eq!(json["cement"], 540.0);
        assert_eq!(json["age"], 28.0);
        assert!(json.get("age_days").is_none());
    }
}
