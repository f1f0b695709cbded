//! CSV sample reader with per-cell validation.

use std::path::{Path, PathBuf};

use prism_color::{Rgb, Sample};
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::SampleSet;

/// Reads packed color samples from a CSV file.
///
/// Expected CSV format:
/// - Header row required
/// - One sample per row in the first column; further columns are ignored
/// - A cell is a decimal `u32` (`4278190335`), a `0x`-prefixed hex `u32`
///   (`0xFF0000FF`), or an `#RRGGBB` color packed with alpha `0xFF`
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InvalidSample`] | Cell is not a recognized sample value |
pub struct SampleReader {
    path: PathBuf,
}

impl SampleReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`SampleSet`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<SampleSet, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // Rows may carry extra columns (e.g. pixel coordinates).
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let column = rdr
            .headers()
            .map_err(|e| self.csv_error(e))?
            .get(0)
            .unwrap_or_default()
            .to_string();
        debug!(column, "read CSV header");

        let mut samples = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;
            let raw = record.get(0).unwrap_or_default();
            let sample = parse_sample(raw).ok_or_else(|| IoError::InvalidSample {
                path: self.path.clone(),
                row_index,
                raw: raw.to_string(),
            })?;
            samples.push(sample);
        }

        if samples.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(n_samples = samples.len(), "samples loaded");
        Ok(SampleSet { column, samples })
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

/// Parse one sample cell. Surrounding whitespace is ignored.
fn parse_sample(raw: &str) -> Option<Sample> {
    let cell = raw.trim();
    if cell.starts_with('#') {
        return Rgb::from_hex(cell).ok().map(Sample::from);
    }
    if let Some(hex) = cell.strip_prefix("0x").or_else(|| cell.strip_prefix("0X")) {
        return u32::from_str_radix(hex, 16).ok().map(Sample::new);
    }
    cell.parse::<u32>().ok().map(Sample::new)
}
