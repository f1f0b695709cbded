//! File I/O, validation, and serialization for the prism pipeline.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{ExperimentName, SampleSet};
pub use error::IoError;
pub use reader::SampleReader;
pub use writer::{EventWriter, PaletteWriter};
