//! Agglomerative clustering under cosine similarity.
//!
//! # Algorithm
//!
//! Every input vector starts as its own cluster. Each round:
//!
//! 1. Pick the active pair `(a, b)`, `a < b`, with the greatest similarity. Ties go
//!    to the lexicographically smallest pair.
//! 2. Add vector `b` into vector `a` and record `Merge { left: a, right: b }`.
//! 3. Drop every entry touching `b`, recompute every entry touching `a` against the
//!    merged vector, keep the rest.
//!
//! After `n - 1` rounds one cluster remains. Inputs with fewer than two vectors
//! produce no merges.
//!
//! # Parallelism
//!
//! Similarity computation runs on a fixed pool of worker threads fed by a bounded
//! queue. The initial `n(n-1)/2` entries and each round's recomputations are
//! dispatched as one batch, and the driver waits for the whole batch before it
//! selects the next pair. Vectors are only mutated between batches.
//!
//! # Complexity
//!
//! O(n²) similarity evaluations up front, then O(n) per round for the scan,
//! compaction and recomputation, so O(n³) overall in the worst case. Memory is
//! O(n²) for the similarity entries.

use parking_lot::RwLock;
use tracing::{debug, trace};

use super::dendrogram::{Dendrogram, Merge};
use super::matrix::SimilarityMatrix;
use super::pool::{self, Slots};
use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::vector::SparseVector;

/// Agglomerative clusterer.
#[derive(Debug, Clone)]
pub struct Agglomerative {
    workers: usize,
    queue_capacity: Option<usize>,
    n_clusters: usize,
}

impl Agglomerative {
    /// Create a clusterer with default parameters.
    ///
    /// Defaults: one worker per available CPU, queue capacity equal to the worker
    /// count, `n_clusters = 1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set how many pending similarity tasks the queue holds before the driver
    /// blocks.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    /// Set the number of flat clusters returned by [`Clustering::fit_predict`].
    pub fn with_n_clusters(mut self, n_clusters: usize) -> Self {
        self.n_clusters = n_clusters;
        self
    }

    fn queue_capacity(&self) -> usize {
        self.queue_capacity.unwrap_or(self.workers)
    }

    fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidParameter {
                name: "workers",
                message: "must be at least 1",
            });
        }
        if self.queue_capacity() == 0 {
            return Err(Error::InvalidParameter {
                name: "queue_capacity",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Cluster `vectors` down to a single cluster.
    ///
    /// The vectors are merged in place: after the call, each surviving index holds
    /// the sum of the vectors it absorbed.
    pub fn fit(&self, vectors: &mut [SparseVector]) -> Result<Dendrogram> {
        self.validate()?;
        Ok(run(vectors, self.workers, self.queue_capacity()))
    }
}

impl Default for Agglomerative {
    fn default() -> Self {
        Self {
            workers: pool::default_workers(),
            queue_capacity: None,
            n_clusters: 1,
        }
    }
}

impl Clustering for Agglomerative {
    fn fit_predict(&self, data: &[SparseVector]) -> Result<Vec<usize>> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        if self.n_clusters == 0 || self.n_clusters > data.len() {
            return Err(Error::InvalidClusterCount {
                requested: self.n_clusters,
                n_items: data.len(),
            });
        }
        let mut vectors = data.to_vec();
        self.fit(&mut vectors)?.labels(self.n_clusters)
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}

/// Cluster `vectors` with the default pool size and return the merge sequence.
///
/// Returns `max(n - 1, 0)` merges. The vectors are merged in place.
pub fn cluster(vectors: &mut [SparseVector]) -> Vec<Merge> {
    let workers = pool::default_workers();
    run(vectors, workers, workers).into_merges()
}

fn run(vectors: &mut [SparseVector], workers: usize, capacity: usize) -> Dendrogram {
    let n = vectors.len();
    if n < 2 {
        return Dendrogram::from_run(n, Vec::new(), Vec::new());
    }

    debug!(n_points = n, workers, capacity, "starting agglomerative clustering");

    let slots = Slots::new(SimilarityMatrix::capacity_for(n));
    let vectors = RwLock::new(vectors);

    let (merges, similarities) = pool::with_pool(workers, capacity, &vectors, &slots, |pool| {
        let mut matrix = SimilarityMatrix::new(n, &slots);
        matrix.populate(pool);

        let mut merges = Vec::with_capacity(n - 1);
        let mut similarities = Vec::with_capacity(n - 1);
        for round in 0..n - 1 {
            let Some(best) = matrix.best() else { break };

            absorb(&mut vectors.write()[..], best.a, best.b);
            matrix.absorb(best.a, best.b, pool);

            trace!(
                round,
                left = best.a,
                right = best.b,
                similarity = best.similarity,
                remaining = matrix.len(),
                "merged clusters"
            );
            merges.push(Merge {
                left: best.a,
                right: best.b,
            });
            similarities.push(best.similarity);
        }
        (merges, similarities)
    });

    debug!(merges = merges.len(), "clustering complete");
    Dendrogram::from_run(n, merges, similarities)
}

/// Add `vectors[absorbed]` into `vectors[survivor]`; requires `survivor < absorbed`.
fn absorb(vectors: &mut [SparseVector], survivor: usize, absorbed: usize) {
    debug_assert!(survivor < absorbed);
    let (head, tail) = vectors.split_at_mut(absorbed);
    head[survivor].add(&tail[0]);
}
