//! Configuration builder for palette generation.

use std::num::NonZeroUsize;

use prism_color::Sample;

use crate::coordinator::PaletteJob;
use crate::error::ClusterError;
use crate::event::{PaletteEvent, PaletteSink};
use crate::result::PaletteReport;

/// Smallest worker pool used when the pool size is left at its default.
const MIN_DEFAULT_WORKERS: usize = 4;

/// Configuration for multi-start k-medoids palette generation.
///
/// Construct via [`PaletteConfig::new`], then chain `with_*` methods to
/// override defaults.
///
/// # Defaults
///
/// | Parameter    | Default                                  |
/// |--------------|------------------------------------------|
/// | `restarts`   | 10                                       |
/// | `workers`    | available parallelism, at least 4        |
/// | `max_passes` | 100                                      |
/// | `seed`       | none (fresh OS entropy per call)         |
#[derive(Debug, Clone)]
pub struct PaletteConfig {
    pub(crate) k: usize,
    pub(crate) restarts: usize,
    pub(crate) workers: Option<usize>,
    pub(crate) max_passes: usize,
    pub(crate) seed: Option<u64>,
}

impl PaletteConfig {
    /// Create a configuration producing palettes of `k` colors.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ClusterError::InvalidK`] | `k` is zero |
    pub fn new(k: usize) -> Result<Self, ClusterError> {
        if k == 0 {
            return Err(ClusterError::InvalidK { k });
        }
        Ok(Self {
            k,
            restarts: 10,
            workers: None,
            max_passes: 100,
            seed: None,
        })
    }

    /// Set the number of independent randomized restarts.
    #[must_use]
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Set the worker pool size. `0` restores the default.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = (workers > 0).then_some(workers);
        self
    }

    /// Set the maximum number of assign/update passes per restart.
    /// Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    /// Derive every restart's RNG from `seed` instead of OS entropy.
    ///
    /// Each restart's candidate becomes reproducible. The order in which
    /// progress events arrive still depends on scheduling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Return the number of palette colors.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Return the number of restarts.
    #[must_use]
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    /// Return the resolved worker pool size.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map_or(MIN_DEFAULT_WORKERS, NonZeroUsize::get)
                .max(MIN_DEFAULT_WORKERS)
        })
    }

    /// Return the maximum number of passes per restart.
    #[must_use]
    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Return the master seed, if one was set.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Start generating a palette from `samples` in the background.
    ///
    /// Sorts `samples`, schedules every restart on a dedicated worker pool
    /// and returns immediately. Progress is observed through `sink`; the
    /// returned [`PaletteJob`] can also be waited on.
    ///
    /// # Errors
    ///
    /// Returned synchronously, before any work is scheduled or any event is
    /// sent:
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ClusterError::EmptyInput`] | `samples` is empty |
    /// | [`ClusterError::InvalidRestarts`] | restart count is zero |
    /// | [`ClusterError::ThreadPool`] | the worker pool could not be created |
    pub fn start<S>(&self, samples: Vec<Sample>, sink: S) -> Result<PaletteJob, ClusterError>
    where
        S: PaletteSink + 'static,
    {
        crate::coordinator::start(samples, self, sink)
    }

    /// Generate a palette and block until every restart has finished.
    ///
    /// # Errors
    ///
    /// Same as [`start`](Self::start). Failures of individual restarts are
    /// not errors here; they are counted in [`PaletteReport::failed`].
    pub fn fit(&self, samples: Vec<Sample>) -> Result<PaletteReport, ClusterError> {
        let job = self.start(samples, |_: PaletteEvent| {})?;
        Ok(job.wait())
    }
}

#[cfg(test)]
mod tests {
    use super::PaletteConfig;
    use crate::error::ClusterError;

    #[test]
    fn new_valid_k() {
        let cfg = PaletteConfig::new(5).unwrap();
        assert_eq!(cfg.k(), 5);
    }

    #[test]
    fn new_k_zero() {
        let result = PaletteConfig::new(0);
        assert!(matches!(result, Err(ClusterError::InvalidK { k: 0 })));
    }

    #[test]
    fn defaults_are_correct() {
        let cfg = PaletteConfig::new(10).unwrap();
        assert_eq!(cfg.restarts(), 10);
        assert_eq!(cfg.max_passes(), 100);
        assert_eq!(cfg.seed(), None);
        assert!(cfg.workers() >= 4, "default pool must have at least 4 workers");
    }

    #[test]
    fn builder_chaining() {
        let cfg = PaletteConfig::new(3)
            .unwrap()
            .with_restarts(4)
            .with_workers(2)
            .with_max_passes(7)
            .with_seed(99);
        assert_eq!(cfg.restarts(), 4);
        assert_eq!(cfg.workers(), 2);
        assert_eq!(cfg.max_passes(), 7);
        assert_eq!(cfg.seed(), Some(99));
    }

    #[test]
    fn zero_workers_restores_default() {
        let cfg = PaletteConfig::new(3).unwrap().with_workers(2).with_workers(0);
        assert!(cfg.workers() >= 4);
    }

    #[test]
    fn zero_passes_raised_to_one() {
        let cfg = PaletteConfig::new(3).unwrap().with_max_passes(0);
        assert_eq!(cfg.max_passes(), 1);
    }
}
