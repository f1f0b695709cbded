//! Medoid refinement (private module).

use crate::assign::Assignment;

/// Move each slot's medoid to the middle member of its cluster.
///
/// Samples are scanned in index order with a running per-slot counter; the
/// member reached as the `ceil(size / 2)`-th member of its slot becomes that
/// slot's medoid, using the slot sizes tracked by the assignment pass. Slots
/// whose scan never reaches that count keep their current medoid.
///
/// This is the positional median only when the samples are sorted
/// ascending, because each cluster's members then form an ordered
/// subsequence of the sorted input. On unsorted input the chosen member is an
/// arbitrary approximation with no median guarantee; the caller owns the
/// sorting precondition.
pub(crate) fn update_medoids(state: &Assignment, medoids: &mut [usize]) {
    let k = medoids.len();
    debug_assert_eq!(k, state.sizes.len());

    let targets: Vec<usize> = state.sizes.iter().map(|&s| s.div_ceil(2)).collect();
    let mut seen = vec![0usize; k];
    let mut done = vec![false; k];
    let mut remaining = k;

    for (i, label) in state.labels.iter().enumerate() {
        let Some(label) = label else {
            continue;
        };
        let slot = label.index();
        if done[slot] {
            continue;
        }

        seen[slot] += 1;
        if seen[slot] >= targets[slot] {
            medoids[slot] = i;
            done[slot] = true;
            remaining -= 1;
            if remaining == 0 {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use prism_color::Sample;

    use super::update_medoids;
    use crate::assign::{Assignment, assign_pass};
    use crate::slot::Slot;

    fn state_with(labels: &[Option<usize>], sizes: &[usize]) -> Assignment {
        let mut state = Assignment::new(labels.len(), sizes.len());
        state.labels = labels.iter().map(|l| l.map(Slot::new)).collect();
        state.sizes = sizes.to_vec();
        state
    }

    #[test]
    fn picks_positional_median_on_sorted_input() {
        let data: Vec<Sample> = (0..10).map(Sample::new).collect();
        let mut medoids = vec![0, 9];
        let mut state = Assignment::new(data.len(), 2);
        assign_pass(&data, &medoids, &mut state);
        // Members 0..=4 and 5..=9, each size 5 + 1 for the medoid.
        assert_eq!(state.sizes, vec![6, 6]);

        update_medoids(&state, &mut medoids);

        assert_eq!(medoids, vec![2, 7]);
    }

    #[test]
    fn size_one_takes_first_member() {
        let state = state_with(&[Some(0), Some(0), Some(0)], &[1]);
        let mut medoids = vec![2];

        update_medoids(&state, &mut medoids);

        assert_eq!(medoids, vec![0]);
    }

    #[test]
    fn odd_size_rounds_up() {
        // size 5 → the 3rd member.
        let state = state_with(&[Some(0); 6], &[5]);
        let mut medoids = vec![0];

        update_medoids(&state, &mut medoids);

        assert_eq!(medoids, vec![2]);
    }

    #[test]
    fn slot_without_enough_members_keeps_medoid() {
        let state = state_with(&[Some(0), Some(0), None], &[2, 4]);
        let mut medoids = vec![1, 2];

        update_medoids(&state, &mut medoids);

        assert_eq!(medoids, vec![0, 2], "slot 1 never reaches its target");
    }

    #[test]
    fn interleaved_membership_uses_scan_order() {
        // Unsorted precondition violated: the choice follows index order,
        // not value order.
        let state = state_with(
            &[Some(1), Some(0), Some(1), Some(0), Some(1), Some(0)],
            &[4, 4],
        );
        let mut medoids = vec![0, 0];

        update_medoids(&state, &mut medoids);

        assert_eq!(medoids, vec![3, 2]);
    }
}
