//! Nearest-medoid assignment (private module).

use tracing::debug;

use prism_color::Sample;

use crate::cost::Cost;
use crate::slot::Slot;

/// Per-run assignment scratch state.
///
/// Allocated fresh for every run and never shared between runs. `best`
/// persists across passes within a run and is never reset, which is what
/// makes repeated passes over a fixed medoid set monotone.
#[derive(Debug, Clone)]
pub(crate) struct Assignment {
    /// Owning slot for each sample, `None` until the first improvement.
    pub(crate) labels: Vec<Option<Slot>>,
    /// Best distance recorded so far for each sample.
    pub(crate) best: Vec<u64>,
    /// Per-slot size, at least 1 since each medoid counts itself.
    pub(crate) sizes: Vec<usize>,
}

impl Assignment {
    /// Fresh state for `n` samples and `k` slots.
    pub(crate) fn new(n: usize, k: usize) -> Self {
        Self {
            labels: vec![None; n],
            best: vec![u64::MAX; n],
            sizes: vec![1; k],
        }
    }

    /// Reset every slot size to 1.
    pub(crate) fn reset_sizes(&mut self) {
        self.sizes.fill(1);
    }

    /// Count the samples currently labelled with each slot.
    pub(crate) fn member_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.sizes.len()];
        for label in self.labels.iter().flatten() {
            counts[label.index()] += 1;
        }
        counts
    }
}

/// Outcome of one assignment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PassOutcome {
    /// Whether any sample improved its best distance.
    pub(crate) changed: bool,
    /// Sum of best distances after the pass.
    pub(crate) cost: Cost,
}

/// Assign each sample to its nearest medoid and total the cost.
///
/// Every sample is compared with every medoid slot in order. A slot wins
/// only if its distance is strictly smaller than the sample's recorded best,
/// so ties keep the earlier owner. On a move the previous slot's size is
/// decremented (never below 1) and the new slot's size incremented.
pub(crate) fn assign_pass(
    samples: &[Sample],
    medoids: &[usize],
    state: &mut Assignment,
) -> PassOutcome {
    debug_assert_eq!(samples.len(), state.labels.len());
    debug_assert_eq!(medoids.len(), state.sizes.len());

    let medoid_values: Vec<Sample> = medoids.iter().map(|&m| samples[m]).collect();

    let mut changed = false;
    let mut total: u64 = 0;

    for (i, &sample) in samples.iter().enumerate() {
        for (slot, &medoid) in Slot::all(medoid_values.len()).zip(&medoid_values) {
            let d = sample.distance(medoid);
            if d < state.best[i] {
                state.best[i] = d;
                if let Some(previous) = state.labels[i] {
                    previous.release(&mut state.sizes);
                }
                slot.claim(&mut state.sizes);
                state.labels[i] = Some(slot);
                changed = true;
            }
        }
        total = total.saturating_add(state.best[i]);
    }

    debug!(changed, cost = total, "assignment pass complete");
    PassOutcome {
        changed,
        cost: Cost::new(total),
    }
}
