use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use prism_color::TextTone;
use prism_io::{EventWriter, ExperimentName, PaletteWriter, SampleReader};
use prism_medoids::{PaletteConfig, PaletteEvent};

#[derive(Parser)]
#[command(name = "prism")]
#[command(about = "Color palette extraction by parallel multi-start k-medoids")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a k-color palette from a CSV of packed pixel samples
    Palette {
        /// Path to the input CSV file (header row, samples in the first column)
        #[arg(long)]
        data: PathBuf,

        /// Number of palette colors
        #[arg(long, default_value_t = 5)]
        k: usize,

        /// Number of independent randomized restarts (best result kept)
        #[arg(long, default_value_t = 10)]
        restarts: usize,

        /// Worker threads (defaults to available parallelism, at least 4)
        #[arg(long)]
        workers: Option<usize>,

        /// Maximum assign/update passes per restart
        #[arg(long, default_value_t = 100)]
        max_passes: usize,

        /// Master RNG seed for reproducible restarts (defaults to OS entropy)
        #[arg(long)]
        seed: Option<u64>,

        /// Directory for the palette JSON artifact (nothing is written if omitted)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long, default_value = "palette")]
        name: String,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct PaletteOutput {
    k: usize,
    n_samples: usize,
    restarts: usize,
    failed: usize,
    cost: Option<u64>,
    colors: Vec<ColorOutput>,
    artifact: Option<PathBuf>,
}

#[derive(Serialize)]
struct ColorOutput {
    hex: String,
    cluster_size: usize,
    text_tone: TextTone,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Palette {
            data,
            k,
            restarts,
            workers,
            max_passes,
            seed,
            output_dir,
            name,
        } => {
            // Validate the name before any work so a typo fails fast.
            let writer = output_dir
                .map(|dir| -> Result<PaletteWriter> {
                    let experiment = ExperimentName::new(name)?;
                    Ok(PaletteWriter::new(&dir, experiment)?)
                })
                .transpose()?;

            let samples = SampleReader::new(&data)
                .read()
                .context("failed to read input CSV")?
                .into_samples();
            let n_samples = samples.len();

            let mut config = PaletteConfig::new(k)?
                .with_restarts(restarts)
                .with_max_passes(max_passes);
            if let Some(workers) = workers {
                config = config.with_workers(workers);
            }
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            info!(k, n_samples, restarts, workers = config.workers(), "extracting palette");

            let events: Mutex<EventWriter<Stdout>> = Mutex::new(EventWriter::new(std::io::stdout()));
            let job = config
                .start(samples, move |event: PaletteEvent| {
                    let mut events = events
                        .lock()
                        .unwrap_or_else(std::sync::PoisonError::into_inner);
                    if let Err(err) = events.write(&event) {
                        warn!(error = %err, "failed to stream event");
                    }
                })
                .context("palette extraction failed to start")?;
            let report = job.wait();

            let artifact = writer
                .map(|w| w.write_palette(k, n_samples, &report))
                .transpose()?;

            let palette = &report.palette;
            let output = PaletteOutput {
                k,
                n_samples,
                restarts: report.restarts,
                failed: report.failed,
                cost: palette.cost.map(|c| c.value()),
                colors: palette
                    .colors
                    .iter()
                    .zip(&palette.cluster_sizes)
                    .map(|(rgb, &cluster_size)| ColorOutput {
                        hex: rgb.hex(),
                        cluster_size,
                        text_tone: rgb.text_tone(),
                    })
                    .collect(),
                artifact,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
