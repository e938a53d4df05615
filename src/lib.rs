//! Hierarchical clustering of token multisets.
//!
//! `termclust` clusters sparse, nonnegative count vectors (for example the tokens
//! describing a set of entities) under cosine similarity. It provides:
//! - [`SparseVector`]: a token-count map with a cached norm
//! - [`cluster()`]: parallel agglomerative clustering producing a merge sequence
//! - [`interpret()`]: extraction of "flagged" clusters from that sequence
//!
//! Fetching tokens, mapping indices back to entity names and rendering results are
//! left to the caller.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod vector;

pub use cluster::{
    cluster, interpret, Agglomerative, Clustering, Dendrogram, Interpreter, Merge,
};
pub use error::{Error, Result};
pub use vector::{build_vector, SparseVector};
