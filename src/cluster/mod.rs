//! Hierarchical clustering of sparse count vectors.
//!
//! ## Agglomerative clustering
//!
//! Bottom-up: every vector starts as its own cluster, and each round the two most
//! similar clusters are merged until one remains. Similarity is the cosine of the
//! angle between the summed count vectors, so a cluster is represented by the sum of
//! its members (no linkage function over member pairs).
//!
//! The order of merges is the dendrogram. It is returned as a [`Dendrogram`] (or a
//! plain `Vec<Merge>` from [`cluster`]), which can then be:
//!
//! - interpreted into "flagged" clusters with [`Interpreter`] / [`interpret`], or
//! - cut into `k` flat clusters with [`Dendrogram::labels`].
//!
//! ## Usage
//!
//! ```rust
//! use termclust::cluster::{cluster, interpret, Agglomerative, Clustering, Merge};
//! use termclust::build_vector;
//!
//! let mut vectors = vec![
//!     build_vector(["a", "a", "b"]),
//!     build_vector(["a", "a", "b"]),
//!     build_vector(["c"]),
//!     build_vector(["d"]),
//! ];
//!
//! let merges = cluster(&mut vectors);
//! assert_eq!(merges.len(), 3);
//! assert_eq!(merges[0], Merge { left: 0, right: 1 });
//! assert!(interpret(&merges).is_empty());
//!
//! // Flat labels, without touching the input.
//! let data = vec![build_vector(["x", "y"]), build_vector(["p"]), build_vector(["x"])];
//! let labels = Agglomerative::new().with_n_clusters(2).fit_predict(&data).unwrap();
//! assert_eq!(labels, vec![0, 1, 0]);
//! ```

mod agglomerative;
mod dendrogram;
mod matrix;
mod pool;
mod traits;
mod util;

pub use agglomerative::{cluster, Agglomerative};
pub use dendrogram::{interpret, Dendrogram, Interpreter, Merge};
pub use traits::Clustering;
