//! The packed pixel sample type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rgb::Rgb;

/// One pixel's packed color, treated as a scalar magnitude.
///
/// Ordering and distance operate on the raw `u32` value, not on the color
/// channels. Two samples that look similar can be far apart numerically when
/// their red channel differs, which is an accepted property of the scalar
/// metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample(u32);

impl Sample {
    /// Wrap a raw packed value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Return the raw packed value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Absolute difference between two samples.
    ///
    /// Widened to `u64` so that callers can use `u64::MAX` as an
    /// "unassigned" sentinel strictly above every real distance.
    #[must_use]
    pub fn distance(self, other: Self) -> u64 {
        u64::from(self.0.abs_diff(other.0))
    }

    /// Squared distance as `f64`, the k-means++ seeding weight.
    #[must_use]
    pub fn squared_distance(self, other: Self) -> f64 {
        let d = self.distance(other) as f64;
        d * d
    }

    /// Unpack into RGB channels using the `0xAARRGGBB` convention.
    #[must_use]
    pub fn to_rgb(self) -> Rgb {
        Rgb::from_packed(self.0)
    }
}

impl From<u32> for Sample {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Sample> for u32 {
    fn from(sample: Sample) -> Self {
        sample.0
    }
}

impl From<Rgb> for Sample {
    fn from(rgb: Rgb) -> Self {
        Self(rgb.to_packed())
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}
