use std::{
    fmt::Display,
    ops::{Add, Mul, Sub},
};

use derive_more::derive::AsRef;
use serde::{Deserialize, Serialize};

use crate::core::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, AsRef, Serialize, Deserialize)]
pub struct Kilograms(pub f64);

#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, AsRef, Serialize, Deserialize)]
pub struct KilogramsPerHour(pub f64);

impl From<&Kilograms> for f64 {
    fn from(value: &Kilograms) -> Self {
        value.0
    }
}

impl From<f64> for Kilograms {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl Display for Kilograms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} kg", self.0)
    }
}

impl Add for Kilograms {
    type Output = Kilograms;

    fn add(self, rhs: Self) -> Self::Output {
        Kilograms(self.0 + rhs.0)
    }
}

impl Sub for Kilograms {
    type Output = Kilograms;

    fn sub(self, rhs: Self) -> Self::Output {
        Kilograms(self.0 - rhs.0)
    }
}

impl From<&KilogramsPerHour> for f64 {
    fn from(value: &KilogramsPerHour) -> Self {
        value.0
    }
}

impl Display for KilogramsPerHour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} kg/h", self.0)
    }
}

impl Mul<Duration> for KilogramsPerHour {
    type Output = Kilograms;

    fn mul(self, rhs: Duration) -> Self::Output {
        Kilograms(self.0 * rhs.as_hours_f64())
    }
}
