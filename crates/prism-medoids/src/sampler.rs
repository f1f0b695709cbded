//! Discrete weighted random sampling.

use rand::Rng;

/// Draws slot indices with probability proportional to per-slot weights.
///
/// Weights start at zero and are replaced one slot at a time with
/// [`set_weight`](Self::set_weight), which keeps a running total up to date.
/// One sampler is built per seeding step and is not shared between runs.
#[derive(Debug, Clone)]
pub struct WeightedSampler {
    weights: Vec<f64>,
    total: f64,
}

impl WeightedSampler {
    /// Create a sampler with `len` zero-weight slots.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            weights: vec![0.0; len],
            total: 0.0,
        }
    }

    /// Replace the weight of slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`. Panics in debug mode if `value` is negative
    /// or not finite.
    pub fn set_weight(&mut self, index: usize, value: f64) {
        debug_assert!(
            value.is_finite() && value >= 0.0,
            "weight must be finite and non-negative, got {value}"
        );
        let slot = &mut self.weights[index];
        self.total -= *slot;
        *slot = value;
        self.total += value;
    }

    /// Return the weight of slot `index`.
    #[must_use]
    pub fn weight(&self, index: usize) -> f64 {
        self.weights[index]
    }

    /// Return the running total of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Return the number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Return true if the sampler has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Draw one slot index.
    ///
    /// A uniform value in `[0, 1)` is scaled by the running total and the
    /// slots are walked until the cumulative weight reaches it. Slots with
    /// zero weight are never returned while any weight is positive: a draw of
    /// exactly `0.0` lands on the first positive-weight slot, not on index 0.
    /// When no slot has positive weight, returns `0` rather than failing;
    /// callers that need a distinct index must handle that themselves.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        if self.total <= 0.0 {
            return 0;
        }

        let target = rng.r#gen::<f64>() * self.total;

        let mut cumsum = 0.0;
        let mut last_positive = 0;
        for (i, &w) in self.weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            cumsum += w;
            last_positive = i;
            if cumsum >= target {
                return i;
            }
        }

        // Rounding in the running total can leave the walk just short.
        last_positive
    }
}
