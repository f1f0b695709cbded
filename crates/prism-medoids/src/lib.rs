//! Multi-start k-medoids palette extraction over packed color samples.
//!
//! Runs many independent randomized k-medoids restarts on a worker pool,
//! reports each new best palette as it appears, and reports the overall
//! best exactly once when every restart has finished.

mod assign;
mod config;
mod coordinator;
mod cost;
mod error;
mod event;
mod init;
mod result;
mod run;
mod sampler;
mod slot;
mod update;

pub use config::PaletteConfig;
pub use coordinator::PaletteJob;
pub use cost::Cost;
pub use error::ClusterError;
pub use event::{Palette, PaletteEvent, PaletteSink, RunFailure};
pub use result::PaletteReport;
pub use sampler::WeightedSampler;
