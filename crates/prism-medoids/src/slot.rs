//! Medoid slot handles (private module).

/// One of the `k` medoid slots of a run.
///
/// A slot owns a running size that starts at 1 (the medoid itself) and
/// never drops below it. Sizes live in a plain `[usize]` indexed by slot so
/// the assignment pass can keep them in one allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot(usize);

impl Slot {
    #[cfg(test)]
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Every slot of a `k`-medoid run, in slot order.
    pub(crate) fn all(k: usize) -> impl Iterator<Item = Slot> {
        (0..k).map(Slot)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }

    /// Count one more member for this slot.
    pub(crate) fn claim(self, sizes: &mut [usize]) {
        sizes[self.0] += 1;
    }

    /// Drop one member from this slot, keeping the medoid's own count.
    pub(crate) fn release(self, sizes: &mut [usize]) {
        let size = &mut sizes[self.0];
        *size = size.saturating_sub(1).max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::Slot;

    #[test]
    fn all_walks_slots_in_order() {
        let slots: Vec<usize> = Slot::all(4).map(Slot::index).collect();
        assert_eq!(slots, vec![0, 1, 2, 3]);
        assert_eq!(Slot::all(0).count(), 0);
    }

    #[test]
    fn claim_and_release_move_one_member() {
        let mut sizes = vec![1, 3];
        Slot::new(0).claim(&mut sizes);
        Slot::new(1).release(&mut sizes);
        assert_eq!(sizes, vec![2, 2]);
    }

    #[test]
    fn release_never_drops_below_the_medoid() {
        let mut sizes = vec![1, 0];
        Slot::new(0).release(&mut sizes);
        Slot::new(1).release(&mut sizes);
        assert_eq!(sizes, vec![1, 1]);
    }
}
