use std::fmt;

use serde::{Deserialize, Serialize};

/// Sum of per-sample distances from each sample to its assigned medoid.
///
/// Lower cost indicates tighter clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cost(u64);

impl Cost {
    /// Zero cost.
    pub const ZERO: Self = Self(0);

    /// Create a new cost value.
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    /// Return the raw cost value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Cost;

    #[test]
    fn roundtrip() {
        assert_eq!(Cost::new(314).value(), 314);
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", Cost::new(1500)), "1500");
    }

    #[test]
    fn ordering() {
        assert!(Cost::ZERO < Cost::new(1));
        assert!(Cost::new(7) > Cost::new(6));
        assert_eq!(Cost::new(3).max(Cost::new(9)), Cost::new(9));
    }
}
