//! Input units for mass-per-volume quantities
//!
//! The model consumes kg/m³. Mixes may be entered in lb/ft³ and are
//! converted before validation and inference. Age is never converted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One kg/m³ expressed in lb/ft³
pub const LB_PER_FT3_PER_KG_PER_M3: f64 = 0.062_427_960_6;

/// Unit a mix design was entered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    KgPerM3,
    LbPerFt3,
}

impl Unit {
    /// Convert a mass-per-volume quantity in this unit to canonical kg/m³
    pub fn to_canonical(&self, value: f64) -> f64 {
        match self {
            Unit::KgPerM3 => value,
            Unit::LbPerFt3 => value / LB_PER_FT3_PER_KG_PER_M3,
        }
    }

    /// Convert a canonical kg/m³ quantity into this unit
    pub fn from_canonical(&self, value: f64) -> f64 {
        match self {
            Unit::KgPerM3 => value,
            Unit::LbPerFt3 => value * LB_PER_FT3_PER_KG_PER_M3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Unit::KgPerM3 => "kg/m3",
            Unit::LbPerFt3 => "lb/ft3",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg/m3" | "kg-m3" | "kgm3" => Ok(Unit::KgPerM3),
            "lb/ft3" | "lb-ft3" | "lbft3" => Ok(Unit::LbPerFt3),
            _ => Err(format!("Unknown unit: {}. Use kg/m3 or lb/ft3.", s)),
        }
    }
}
