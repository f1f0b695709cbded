//! A single randomized k-medoids attempt (private module).

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use prism_color::Sample;

use crate::assign::{Assignment, assign_pass};
use crate::config::PaletteConfig;
use crate::cost::Cost;
use crate::error::ClusterError;
use crate::init::kmeans_plus_plus;
use crate::result::{Candidate, StopReason};
use crate::update::update_medoids;

/// Run one restart seeded with `seed` over sorted `samples`.
///
/// Seeds `k` medoids, then alternates assignment and medoid refinement for
/// at most `max_passes` passes. A pass that moves any sample ends the run
/// at once and its cost is final. Only a pass that moves nothing leads to a
/// medoid update and another pass. Because every sample starts with no best
/// distance, the first pass always moves samples, so in practice a run is
/// seeding plus one assignment.
///
/// All scratch buffers are allocated here and dropped with the run.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`ClusterError::TooFewSamples`] | `k > samples.len()` |
#[instrument(skip(samples, config), fields(k = config.k, n = samples.len()))]
pub(crate) fn run_once(
    samples: &[Sample],
    config: &PaletteConfig,
    run: usize,
    seed: u64,
) -> Result<Candidate, ClusterError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut medoids = kmeans_plus_plus(samples, config.k, &mut rng)?;
    let mut state = Assignment::new(samples.len(), config.k);

    let mut cost = Cost::ZERO;
    let mut passes = 0usize;
    let mut stop = StopReason::PassLimit;

    for pass in 0..config.max_passes {
        passes = pass + 1;

        let outcome = assign_pass(samples, &medoids, &mut state);
        cost = outcome.cost;

        if outcome.changed {
            stop = StopReason::AssignmentChanged;
            debug!(pass, cost = cost.value(), "assignment changed, stopping");
            break;
        }

        update_medoids(&state, &mut medoids);
        state.reset_sizes();
        debug!(pass, cost = cost.value(), "medoids updated");
    }

    Ok(Candidate {
        run,
        palette: medoids.iter().map(|&m| samples[m]).collect(),
        medoids,
        cost,
        cluster_sizes: state.member_counts(),
        passes,
        stop,
    })
}

#[cfg(test)]
mod tests {
    use prism_color::Sample;

    use super::run_once;
    use crate::config::PaletteConfig;
    use crate::error::ClusterError;
    use crate::result::StopReason;

    fn bimodal() -> Vec<Sample> {
        let mut data = vec![Sample::new(0x0000_0000); 50];
        data.extend(std::iter::repeat_n(Sample::new(0x00FF_FFFF), 50));
        data
    }

    #[test]
    fn first_changing_pass_ends_the_run() {
        // Regression guard: a run stops on the first pass that reports any
        // change instead of iterating until assignments are stable.
        let data: Vec<Sample> = (0..200u32).map(|v| Sample::new(v * 37)).collect();
        let cfg = PaletteConfig::new(4).unwrap().with_max_passes(100);

        for seed in 0..10 {
            let candidate = run_once(&data, &cfg, 0, seed).unwrap();
            assert_eq!(candidate.passes, 1, "seed {seed} ran extra passes");
            assert_eq!(candidate.stop, StopReason::AssignmentChanged);
        }
    }

    #[test]
    fn bimodal_split_has_zero_cost() {
        let data = bimodal();
        let cfg = PaletteConfig::new(2).unwrap();

        let candidate = run_once(&data, &cfg, 3, 7).unwrap();

        let mut values: Vec<u32> = candidate.palette.iter().map(|s| s.value()).collect();
        values.sort_unstable();
        assert_eq!(values, vec![0x0000_0000, 0x00FF_FFFF]);
        assert_eq!(candidate.cost.value(), 0);
        assert_eq!(candidate.run, 3);
        let mut sizes = candidate.cluster_sizes.clone();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![50, 50]);
    }

    #[test]
    fn palette_matches_medoids() {
        let data: Vec<Sample> = (0..50u32).map(|v| Sample::new(v * v)).collect();
        let cfg = PaletteConfig::new(5).unwrap();

        let candidate = run_once(&data, &cfg, 0, 11).unwrap();

        assert_eq!(candidate.medoids.len(), 5);
        for (slot, &m) in candidate.medoids.iter().enumerate() {
            assert_eq!(candidate.palette[slot], data[m]);
        }
        assert_eq!(candidate.cluster_sizes.iter().sum::<usize>(), data.len());
    }

    #[test]
    fn k_greater_than_n_fails_the_run() {
        let data = vec![Sample::new(1), Sample::new(2), Sample::new(3)];
        let cfg = PaletteConfig::new(10).unwrap();

        let result = run_once(&data, &cfg, 0, 0);

        assert!(matches!(
            result,
            Err(ClusterError::TooFewSamples { n_samples: 3, k: 10 })
        ));
    }

    #[test]
    fn same_seed_same_candidate() {
        let data: Vec<Sample> = (0..100u32).map(|v| Sample::new(v * 1_000 + v % 7)).collect();
        let cfg = PaletteConfig::new(6).unwrap();

        let a = run_once(&data, &cfg, 0, 123).unwrap();
        let b = run_once(&data, &cfg, 0, 123).unwrap();

        assert_eq!(a.medoids, b.medoids);
        assert_eq!(a.cost, b.cost);
    }
}
