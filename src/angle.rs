//! Angle value type.

use core::cmp::Ordering;
use core::ops::{Add, Neg, Sub};

/// An angle, stored as radians.
///
/// Degrees are converted with exact `PI / 180` factors, so equality and
/// ordering always compare the same unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Angle {
    radians: f64,
}

impl Angle {
    pub const ZERO: Angle = Angle { radians: 0.0 };

    pub const fn radians(value: f64) -> Self {
        Self { radians: value }
    }

    pub fn degrees(value: f64) -> Self {
        Self {
            radians: value * core::f64::consts::PI / 180.0,
        }
    }

    pub fn as_radians(&self) -> f64 {
        self.radians
    }

    pub fn as_degrees(&self) -> f64 {
        self.radians * 180.0 / core::f64::consts::PI
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        self.radians == other.radians
    }
}

impl PartialOrd for Angle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.radians.partial_cmp(&other.radians)
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle::radians(self.radians + rhs.radians)
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle::radians(self.radians - rhs.radians)
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle::radians(-self.radians)
    }
}
