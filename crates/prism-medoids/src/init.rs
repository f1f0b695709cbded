//! K-means++ medoid seeding (private module).
//!
//! Selects initial medoid indices with a probability proportional to the
//! squared scalar distance from each candidate sample to the nearest
//! already-chosen medoid. Spreading the seeds across the value range makes it
//! less likely that a restart collapses into overlapping clusters.

use rand::Rng;
use tracing::debug;

use prism_color::Sample;

use crate::error::ClusterError;
use crate::sampler::WeightedSampler;

/// Select `k` initial medoid indices from `samples` using K-means++ seeding.
///
/// The first medoid is chosen uniformly at random; each subsequent medoid is
/// drawn through a [`WeightedSampler`] whose weights are the squared distance
/// from each not-yet-chosen sample to its nearest chosen medoid. Chosen
/// samples keep weight zero.
///
/// When every remaining sample sits at distance zero from a chosen medoid
/// (for example, all samples identical) the sampler falls back to index `0`,
/// so the returned medoids may contain duplicates. That degenerate result is
/// accepted; it is not an error.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`ClusterError::TooFewSamples`] | `k > samples.len()` |
pub(crate) fn kmeans_plus_plus<R: Rng + ?Sized>(
    samples: &[Sample],
    k: usize,
    rng: &mut R,
) -> Result<Vec<usize>, ClusterError> {
    let n = samples.len();
    debug_assert!(k > 0, "k must be at least 1");
    if k > n {
        return Err(ClusterError::TooFewSamples { n_samples: n, k });
    }

    let mut chosen: Vec<usize> = Vec::with_capacity(k);
    let mut is_chosen = vec![false; n];

    // Running minimum squared distance to any chosen medoid. Only the newest
    // medoid can lower it, so each step compares against that one alone.
    let mut min_sq = vec![f64::INFINITY; n];

    let first = rng.gen_range(0..n);
    chosen.push(first);
    is_chosen[first] = true;

    for _ in 1..k {
        let newest = samples[chosen[chosen.len() - 1]];
        let mut sampler = WeightedSampler::new(n);

        for (i, &sample) in samples.iter().enumerate() {
            if is_chosen[i] {
                continue;
            }
            let d = sample.squared_distance(newest);
            if d < min_sq[i] {
                min_sq[i] = d;
            }
            sampler.set_weight(i, min_sq[i]);
        }

        let next = sampler.sample(rng);
        if is_chosen[next] {
            debug!(index = next, "zero total weight, seeded a duplicate medoid");
        }
        chosen.push(next);
        is_chosen[next] = true;
    }

    Ok(chosen)
}
