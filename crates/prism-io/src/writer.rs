//! JSON output: streamed event lines and the final palette artifact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use prism_color::TextTone;
use prism_medoids::{Palette, PaletteEvent, PaletteReport};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::ExperimentName;

/// Writes palette events as JSON lines, one event per line.
///
/// Each line is flushed as soon as it is written so a consumer reading the
/// stream sees every improvement while restarts are still running.
///
/// ```text
/// {"event":"improved","final":false,"colors":["#1A2B3C"],"cost":42,"cluster_sizes":[7],"run":3}
/// {"event":"error","run":5,"message":"need at least 4 samples to seed 4 medoids, got 2"}
/// ```
#[derive(Debug)]
pub struct EventWriter<W: Write> {
    out: W,
}

impl<W: Write> EventWriter<W> {
    /// Wrap an output stream.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Serialize `event` as a single line and flush.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Serialize`] if the line cannot be serialized or
    /// written to the underlying stream.
    pub fn write(&mut self, event: &PaletteEvent) -> Result<(), IoError> {
        let line = match event {
            PaletteEvent::Improved(palette) => EventLine::Improved(PaletteLine::new(palette, false)),
            PaletteEvent::Final(palette) => EventLine::Final(PaletteLine::new(palette, true)),
            PaletteEvent::Error(failure) => EventLine::Error {
                run: failure.run,
                message: &failure.message,
            },
        };
        serde_json::to_writer(&mut self.out, &line)?;
        self.out
            .write_all(b"\n")
            .and_then(|()| self.out.flush())
            .map_err(serde_json::Error::io)?;
        Ok(())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Return the underlying stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Writes the final palette of an experiment to a JSON file.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_palette.json`.
pub struct PaletteWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl PaletteWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Return the path of the palette artifact.
    #[must_use]
    pub fn palette_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_palette.json", self.experiment.as_str()))
    }

    /// Write a palette report to `{experiment}_palette.json`.
    ///
    /// `k` and `n_samples` describe the request that produced the report;
    /// an all-failed report is written with an empty color list and a null
    /// cost.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The artifact cannot be serialized |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip(self, report))]
    pub fn write_palette(
        &self,
        k: usize,
        n_samples: usize,
        report: &PaletteReport,
    ) -> Result<PathBuf, IoError> {
        let path = self.palette_path();
        let palette = &report.palette;

        let colors: Vec<ColorEntry> = palette
            .colors
            .iter()
            .zip(&palette.samples)
            .zip(&palette.cluster_sizes)
            .map(|((&rgb, &sample), &cluster_size)| {
                let tone = rgb.text_tone();
                ColorEntry {
                    hex: rgb.hex(),
                    rgb: [rgb.r, rgb.g, rgb.b],
                    sample: sample.value(),
                    cluster_size,
                    text_tone: tone,
                    text_color: tone.color().hex(),
                }
            })
            .collect();

        let artifact = PaletteArtifact {
            experiment: self.experiment.as_str(),
            k,
            n_samples,
            cost: palette.cost.map(|c| c.value()),
            best_run: palette.run,
            restarts: report.restarts,
            succeeded: report.succeeded(),
            failed: report.failed,
            colors,
        };

        let json = serde_json::to_string_pretty(&artifact)?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        info!(path = %path.display(), "palette written");
        Ok(path)
    }
}

// --- Shadow structs for JSON serialization ---

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum EventLine<'a> {
    Improved(PaletteLine),
    Final(PaletteLine),
    Error { run: usize, message: &'a str },
}

#[derive(Serialize)]
struct PaletteLine {
    #[serde(rename = "final")]
    is_final: bool,
    colors: Vec<String>,
    cost: Option<u64>,
    cluster_sizes: Vec<usize>,
    run: Option<usize>,
}

impl PaletteLine {
    fn new(palette: &Palette, is_final: bool) -> Self {
        Self {
            is_final,
            colors: palette.colors.iter().map(|c| c.hex()).collect(),
            cost: palette.cost.map(|c| c.value()),
            cluster_sizes: palette.cluster_sizes.clone(),
            run: palette.run,
        }
    }
}

#[derive(Serialize)]
struct PaletteArtifact<'a> {
    experiment: &'a str,
    k: usize,
    n_samples: usize,
    cost: Option<u64>,
    best_run: Option<usize>,
    restarts: usize,
    succeeded: usize,
    failed: usize,
    colors: Vec<ColorEntry>,
}

#[derive(Serialize)]
struct ColorEntry {
    hex: String,
    rgb: [u8; 3],
    sample: u32,
    cluster_size: usize,
    text_tone: TextTone,
    text_color: String,
}
