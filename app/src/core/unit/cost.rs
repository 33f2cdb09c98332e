use std::{fmt::Display, ops::Mul};

use derive_more::derive::AsRef;
use serde::{Deserialize, Serialize};

use super::Kilograms;

#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, AsRef, Serialize, Deserialize)]
pub struct Cost(pub f64);

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsRef, Serialize, Deserialize)]
pub struct PricePerKg(pub f64);

impl PricePerKg {
    pub fn per_ton(price: f64) -> Self {
        Self(price / 1000.0)
    }
}

impl From<&Cost> for f64 {
    fn from(value: &Cost) -> Self {
        value.0
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Display for PricePerKg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}/kg", self.0)
    }
}

impl Mul<PricePerKg> for Kilograms {
    type Output = Cost;

    fn mul(self, rhs: PricePerKg) -> Self::Output {
        Cost(self.0 * rhs.0)
    }
}
