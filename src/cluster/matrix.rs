//! Pairwise similarity entries between active clusters.
//!
//! The matrix keeps exactly one entry per unordered pair of active cluster
//! indices. Pairs are stored normalized (`a < b`) in lexicographic order and the
//! per-round compaction is stable, so the order never changes except by removal.
//!
//! Values live in a shared [`Slots`] arena sized for the initial `n(n-1)/2`
//! entries; the live prefix shrinks by one active cluster's worth each round.

use super::pool::{Dispatcher, Slots, Task};

/// The highest-similarity active pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Best {
    pub(crate) a: usize,
    pub(crate) b: usize,
    pub(crate) similarity: f64,
}

pub(crate) struct SimilarityMatrix<'s> {
    pairs: Vec<(usize, usize)>,
    slots: &'s Slots,
}

impl<'s> SimilarityMatrix<'s> {
    /// Number of entries for `n` points.
    pub(crate) fn capacity_for(n: usize) -> usize {
        n * n.saturating_sub(1) / 2
    }

    /// `slots` must hold at least [`capacity_for(n)`](Self::capacity_for) values.
    pub(crate) fn new(n: usize, slots: &'s Slots) -> Self {
        let mut pairs = Vec::with_capacity(Self::capacity_for(n));
        for a in 0..n {
            for b in (a + 1)..n {
                pairs.push((a, b));
            }
        }
        Self { pairs, slots }
    }

    pub(crate) fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Compute every entry through the pool and wait for all of them.
    pub(crate) fn populate(&mut self, pool: &mut Dispatcher) {
        for (slot, &(a, b)) in self.pairs.iter().enumerate() {
            pool.dispatch(Task { slot, a, b });
        }
        pool.barrier();
    }

    /// Entry with the greatest similarity.
    ///
    /// Only a strictly greater value replaces the current best, so among equal
    /// values the first entry wins, which is the lexicographically smallest pair.
    pub(crate) fn best(&self) -> Option<Best> {
        let mut best: Option<Best> = None;
        for (slot, &(a, b)) in self.pairs.iter().enumerate() {
            let similarity = self.slots.get(slot);
            match best {
                Some(cur) if similarity <= cur.similarity => {}
                _ => best = Some(Best { a, b, similarity }),
            }
        }
        best
    }

    /// Update after `absorbed` was merged into `survivor`.
    ///
    /// Entries touching `absorbed` are dropped, entries touching `survivor` are
    /// recomputed by the pool, all others keep their value. Returns once every
    /// recomputation has been acknowledged.
    pub(crate) fn absorb(&mut self, survivor: usize, absorbed: usize, pool: &mut Dispatcher) {
        // Slot ownership: a task dispatched while visiting entry `k` writes slot
        // `live <= k`, and from then on the driver only reads slots `> k` and
        // writes slots `> live`. In-flight tasks and driver copies never overlap.
        let mut live = 0;
        for k in 0..self.pairs.len() {
            let (a, b) = self.pairs[k];
            if a == absorbed || b == absorbed {
                continue;
            }
            self.pairs[live] = (a, b);
            if a == survivor || b == survivor {
                pool.dispatch(Task { slot: live, a, b });
            } else if live != k {
                self.slots.set(live, self.slots.get(k));
            }
            live += 1;
        }
        self.pairs.truncate(live);
        pool.barrier();
    }
}
