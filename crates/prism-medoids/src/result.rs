//! Per-run candidates and the aggregated report of one palette call.

use prism_color::Sample;

use crate::cost::Cost;
use crate::event::Palette;

/// Why a run stopped refining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopReason {
    /// An assignment pass moved at least one sample.
    AssignmentChanged,
    /// The pass bound was exhausted without a changing pass.
    PassLimit,
}

/// Result of a single completed run. Immutable once produced.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    /// Index of the run that produced this candidate.
    pub(crate) run: usize,
    /// Medoid indices into the sorted sample sequence.
    pub(crate) medoids: Vec<usize>,
    /// Sample value at each medoid, in slot order.
    pub(crate) palette: Vec<Sample>,
    /// Sum of per-sample best distances at stop.
    pub(crate) cost: Cost,
    /// Members per slot, counted from the final assignment.
    pub(crate) cluster_sizes: Vec<usize>,
    /// Assignment passes performed.
    pub(crate) passes: usize,
    /// Stop condition that ended the run.
    pub(crate) stop: StopReason,
}

impl Candidate {
    /// Build the reported palette for this candidate.
    pub(crate) fn to_palette(&self) -> Palette {
        Palette {
            colors: self.palette.iter().map(|s| s.to_rgb()).collect(),
            samples: self.palette.clone(),
            cluster_sizes: self.cluster_sizes.clone(),
            cost: Some(self.cost),
            run: Some(self.run),
        }
    }
}

/// Outcome of a whole palette-generation call, returned by
/// [`PaletteJob::wait`](crate::PaletteJob::wait) and
/// [`PaletteConfig::fit`](crate::PaletteConfig::fit).
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteReport {
    /// The best palette found, or [`Palette::unset`] if every run failed.
    pub palette: Palette,
    /// Number of runs that were scheduled (and completed).
    pub restarts: usize,
    /// Number of runs that failed.
    pub failed: usize,
}

impl PaletteReport {
    /// Return the number of runs that produced a candidate.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.restarts - self.failed
    }
}
