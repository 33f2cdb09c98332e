use std::fmt::Display;

use derive_more::derive::AsRef;
use serde::{Deserialize, Serialize};

/// Heat-loss coefficient of a zone: kilograms of pellets burnt per degree of
/// indoor/outdoor difference over 24 hours.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsRef, Serialize, Deserialize)]
pub struct EfficiencyIndex(pub f64);

impl From<&EfficiencyIndex> for f64 {
    fn from(value: &EfficiencyIndex) -> Self {
        value.0
    }
}

impl Display for EfficiencyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} kg/°C/24h", self.0)
    }
}
