//! Merge sequences and their interpretation.
//!
//! A [`Dendrogram`] is the ordered list of [`Merge`]s produced by agglomerative
//! clustering. Cluster identities are the original point indices: `Merge { left,
//! right }` means `left` absorbed `right`, and `right` is never active again.
//!
//! ## Flagged clusters
//!
//! [`Interpreter`] replays the merges while tracking the member list behind each
//! index. When both sides of a merge are already substantial (more than
//! `min_members` members each), every side that is still smaller than
//! `total_merges / 2` is reported. The result is a list of subtrees that are big
//! enough to be meaningful but not the dominant trunk.

use tracing::trace;

use super::util::UnionFind;
use crate::error::{Error, Result};

/// One level of a dendrogram: `left` survives and absorbs `right`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Merge {
    /// Surviving cluster index.
    pub left: usize,
    /// Absorbed cluster index.
    pub right: usize,
}

/// Complete record of a clustering run.
#[derive(Clone, Debug, PartialEq)]
pub struct Dendrogram {
    n_points: usize,
    merges: Vec<Merge>,
    similarities: Option<Vec<f64>>,
}

impl Dendrogram {
    pub(crate) fn from_run(n_points: usize, merges: Vec<Merge>, similarities: Vec<f64>) -> Self {
        debug_assert_eq!(merges.len(), similarities.len());
        Self {
            n_points,
            merges,
            similarities: Some(similarities),
        }
    }

    /// Wrap an externally supplied merge sequence over `n_points` points.
    ///
    /// Every index must be below `n_points`, a merge may not join an index with
    /// itself, an absorbed index may not appear again, and there can be at most
    /// `n_points - 1` merges. A prefix of a full run is accepted.
    pub fn from_merges(n_points: usize, merges: Vec<Merge>) -> Result<Self> {
        let mut retired = vec![false; n_points];
        for (step, m) in merges.iter().enumerate() {
            if step + 1 >= n_points.max(1) {
                return Err(Error::InvalidMerge {
                    step,
                    message: "more merges than the points allow",
                });
            }
            if m.left >= n_points || m.right >= n_points {
                return Err(Error::InvalidMerge {
                    step,
                    message: "cluster index out of range",
                });
            }
            if m.left == m.right {
                return Err(Error::InvalidMerge {
                    step,
                    message: "cluster merged with itself",
                });
            }
            if retired[m.left] || retired[m.right] {
                return Err(Error::InvalidMerge {
                    step,
                    message: "cluster was already absorbed",
                });
            }
            retired[m.right] = true;
        }
        Ok(Self {
            n_points,
            merges,
            similarities: None,
        })
    }

    /// Number of original points.
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// The merges, in the order they were made.
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Similarity of the pair chosen at each merge.
    ///
    /// `None` for dendrograms built with [`from_merges`](Self::from_merges).
    pub fn similarities(&self) -> Option<&[f64]> {
        self.similarities.as_deref()
    }

    /// Number of merges.
    pub fn len(&self) -> usize {
        self.merges.len()
    }

    /// True if no merge was made.
    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }

    pub fn into_merges(self) -> Vec<Merge> {
        self.merges
    }

    /// Flagged clusters with the default [`Interpreter`].
    pub fn interpret(&self) -> Vec<Vec<usize>> {
        Interpreter::default().interpret(&self.merges)
    }

    /// Cut the tree into `k` flat clusters.
    ///
    /// Applies the first `n_points - k` merges and returns one label per point.
    /// Labels are numbered in order of each cluster's lowest point index.
    pub fn labels(&self, k: usize) -> Result<Vec<usize>> {
        let n = self.n_points;
        if k == 0 || k > n || n - k > self.merges.len() {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_items: n,
            });
        }

        let mut uf = UnionFind::new(n);
        for m in &self.merges[..n - k] {
            uf.union(m.left, m.right);
        }

        let mut label_of_root = vec![usize::MAX; n];
        let mut next = 0;
        let mut labels = Vec::with_capacity(n);
        for p in 0..n {
            let root = uf.find(p);
            if label_of_root[root] == usize::MAX {
                label_of_root[root] = next;
                next += 1;
            }
            labels.push(label_of_root[root]);
        }
        Ok(labels)
    }
}

/// Extracts flagged clusters from a merge sequence.
#[derive(Clone, Debug)]
pub struct Interpreter {
    min_members: usize,
}

impl Interpreter {
    /// Create an interpreter with default parameters (`min_members = 3`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Both sides of a merge need more than `min_members` members to be considered.
    pub fn with_min_members(mut self, min_members: usize) -> Self {
        self.min_members = min_members;
        self
    }

    /// Replay `merges` and collect flagged member lists, in order.
    pub fn interpret(&self, merges: &[Merge]) -> Vec<Vec<usize>> {
        let n = merges
            .iter()
            .map(|m| m.left.max(m.right) + 1)
            .max()
            .unwrap_or(0)
            .max(merges.len() + 1);
        // Compared against a member count; kept as the merge count on purpose.
        let dominant = merges.len() / 2;

        let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
        let mut flagged = Vec::new();

        for (step, m) in merges.iter().enumerate() {
            if m.left == m.right {
                continue;
            }
            let (l, r) = (members[m.left].len(), members[m.right].len());
            if l > self.min_members && r > self.min_members {
                if l < dominant {
                    trace!(step, cluster = m.left, size = l, "flagged cluster");
                    flagged.push(members[m.left].clone());
                }
                if r < dominant {
                    trace!(step, cluster = m.right, size = r, "flagged cluster");
                    flagged.push(members[m.right].clone());
                }
            }
            let absorbed = std::mem::take(&mut members[m.right]);
            members[m.left].extend(absorbed);
        }
        flagged
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self { min_members: 3 }
    }
}

/// Flagged member lists for `merges`, using the default [`Interpreter`].
pub fn interpret(merges: &[Merge]) -> Vec<Vec<usize>> {
    Interpreter::default().interpret(merges)
}
