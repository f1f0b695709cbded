/// Errors from palette generation.
///
/// [`EmptyInput`](ClusterError::EmptyInput), [`InvalidK`](ClusterError::InvalidK)
/// and [`InvalidRestarts`](ClusterError::InvalidRestarts) are returned
/// synchronously before any run is scheduled. [`TooFewSamples`](ClusterError::TooFewSamples)
/// and [`RunPanicked`](ClusterError::RunPanicked) only ever describe a single
/// failed run and reach callers through [`PaletteEvent::Error`](crate::PaletteEvent::Error).
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    /// Returned when k is zero.
    #[error("k must be at least 1, got {k}")]
    InvalidK {
        /// The invalid k value provided.
        k: usize,
    },

    /// Returned when the restart count is zero.
    #[error("restart count must be at least 1")]
    InvalidRestarts,

    /// Returned when the sample sequence is empty.
    #[error("cannot extract a palette from an empty sample set")]
    EmptyInput,

    /// Returned by a run when fewer samples exist than requested medoids.
    #[error("need at least {k} samples to seed {k} medoids, got {n_samples}")]
    TooFewSamples {
        /// Number of samples provided.
        n_samples: usize,
        /// Requested number of clusters.
        k: usize,
    },

    /// Returned when a run panicked instead of finishing.
    #[error("run panicked: {message}")]
    RunPanicked {
        /// Panic payload, when it was a string.
        message: String,
    },

    /// Wraps a failure to start the worker pool.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
