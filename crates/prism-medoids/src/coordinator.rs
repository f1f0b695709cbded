//! Multi-start orchestration and best-of-N arbitration.
//!
//! Every restart runs on a dedicated rayon pool. Completions are serialized
//! through one mutex-guarded [`GlobalBest`] record: the completion count,
//! the best-cost comparison, the replacement and the sink notification all
//! happen inside the same critical section, so no two completions can both
//! believe they are the last one and the final event fires exactly once.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, instrument, warn};

use prism_color::Sample;

use crate::config::PaletteConfig;
use crate::error::ClusterError;
use crate::event::{Palette, PaletteEvent, PaletteSink, RunFailure};
use crate::result::{Candidate, PaletteReport};
use crate::run::run_once;

/// Shared best-so-far state for one palette call.
#[derive(Debug, Default)]
struct GlobalBest {
    best: Option<Candidate>,
    completed: usize,
    failed: usize,
    final_palette: Option<Palette>,
}

struct Shared {
    restarts: usize,
    state: Mutex<GlobalBest>,
    finished: Condvar,
    sink: Box<dyn PaletteSink>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, GlobalBest> {
        // A panicking sink poisons the lock; the counters it guards are still
        // consistent, so later completions keep counting.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one run outcome. The whole body is one critical section.
    fn record(&self, run: usize, outcome: Result<Candidate, ClusterError>) {
        let mut global = self.lock();
        global.completed += 1;

        match outcome {
            Ok(candidate) => {
                let improved = global
                    .best
                    .as_ref()
                    .is_none_or(|best| candidate.cost < best.cost);
                debug!(
                    run,
                    cost = candidate.cost.value(),
                    passes = candidate.passes,
                    stop = ?candidate.stop,
                    medoids = ?candidate.medoids,
                    improved,
                    "run complete"
                );
                if improved {
                    let palette = candidate.to_palette();
                    global.best = Some(candidate);
                    self.deliver(PaletteEvent::Improved(palette));
                }
            }
            Err(err) => {
                global.failed += 1;
                warn!(run, error = %err, "run failed");
                self.deliver(PaletteEvent::Error(RunFailure {
                    run,
                    message: err.to_string(),
                }));
            }
        }

        if global.completed == self.restarts {
            let palette = global
                .best
                .as_ref()
                .map_or_else(Palette::unset, Candidate::to_palette);
            info!(
                restarts = self.restarts,
                failed = global.failed,
                best_cost = ?palette.cost,
                "all restarts complete"
            );
            global.final_palette = Some(palette.clone());
            // Waiters cannot observe the result until this section ends, so
            // the final event below is still the last thing they can see.
            self.finished.notify_all();
            self.deliver(PaletteEvent::Final(palette));
        }
    }

    /// Hand one event to the sink. A panicking sink loses that event only;
    /// the completion count and the final event still go through.
    fn deliver(&self, event: PaletteEvent) {
        let kind = match &event {
            PaletteEvent::Improved(_) => "improved",
            PaletteEvent::Final(_) => "final",
            PaletteEvent::Error(_) => "error",
        };
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| self.sink.notify(event))) {
            error!(event = kind, panic = %panic_message(&*payload), "palette sink panicked");
        }
    }
}

/// Handle to a palette call running in the background.
///
/// Dropping the handle does not cancel anything: scheduled restarts still
/// run and the sink still receives every event.
pub struct PaletteJob {
    shared: Arc<Shared>,
    _pool: rayon::ThreadPool,
}

impl PaletteJob {
    /// Return the number of scheduled restarts.
    #[must_use]
    pub fn restarts(&self) -> usize {
        self.shared.restarts
    }

    /// Return how many restarts have completed, successfully or not.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.shared.lock().completed
    }

    /// Return true once the final event has been issued.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.shared.lock().final_palette.is_some()
    }

    /// Block until every restart has completed and return the report.
    #[must_use]
    pub fn wait(self) -> PaletteReport {
        let mut global = self.shared.lock();
        loop {
            if let Some(palette) = &global.final_palette {
                return PaletteReport {
                    palette: palette.clone(),
                    restarts: self.shared.restarts,
                    failed: global.failed,
                };
            }
            global = self
                .shared
                .finished
                .wait(global)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

impl std::fmt::Debug for PaletteJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaletteJob")
            .field("restarts", &self.shared.restarts)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run one restart body, turning a panic into a failed run.
fn guarded<F>(body: F) -> Result<Candidate, ClusterError>
where
    F: FnOnce() -> Result<Candidate, ClusterError>,
{
    panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|payload| {
        Err(ClusterError::RunPanicked {
            message: panic_message(&*payload),
        })
    })
}

/// Validate, sort, and schedule every restart. Never blocks on the runs.
#[instrument(skip(samples, config, sink), fields(n = samples.len(), k = config.k, restarts = config.restarts))]
pub(crate) fn start<S>(
    mut samples: Vec<Sample>,
    config: &PaletteConfig,
    sink: S,
) -> Result<PaletteJob, ClusterError>
where
    S: PaletteSink + 'static,
{
    if samples.is_empty() {
        return Err(ClusterError::EmptyInput);
    }
    if config.restarts == 0 {
        return Err(ClusterError::InvalidRestarts);
    }

    let workers = config.workers();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("prism-worker-{i}"))
        .panic_handler(|payload| {
            error!(panic = %panic_message(&*payload), "worker task panicked");
        })
        .build()?;

    // Medoid refinement relies on sorted input.
    samples.sort_unstable();
    let samples: Arc<[Sample]> = samples.into();

    // Per-restart seeds come from one master seed, which itself comes from
    // OS entropy unless the caller pinned it.
    let master = config.seed.unwrap_or_else(rand::random);
    let mut master_rng = ChaCha8Rng::seed_from_u64(master);
    let seeds: Vec<u64> = (0..config.restarts).map(|_| master_rng.r#gen()).collect();

    let shared = Arc::new(Shared {
        restarts: config.restarts,
        state: Mutex::new(GlobalBest::default()),
        finished: Condvar::new(),
        sink: Box::new(sink),
    });
    let config = Arc::new(config.clone());

    info!(workers, master_seed = master, "scheduling restarts");

    for (run, seed) in seeds.into_iter().enumerate() {
        let samples = Arc::clone(&samples);
        let config = Arc::clone(&config);
        let shared = Arc::clone(&shared);
        pool.spawn(move || {
            let outcome = guarded(|| run_once(&samples, &config, run, seed));
            shared.record(run, outcome);
        });
    }

    Ok(PaletteJob {
        shared,
        _pool: pool,
    })
}
