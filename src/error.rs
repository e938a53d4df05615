use thiserror::Error;

/// Errors returned by the fallible parts of this crate.
///
/// Vector construction, [`cluster`](crate::cluster()) and
/// [`interpret`](crate::interpret()) are total and never produce these; only
/// builder validation, flat cuts and externally supplied merge sequences do.
#[derive(Debug, Error)]
pub enum Error {
    /// Input slice is empty.
    #[error("empty input")]
    EmptyInput,

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of items in the dataset.
        n_items: usize,
    },

    /// A merge sequence does not describe a valid dendrogram.
    #[error("invalid merge at step {step}: {message}")]
    InvalidMerge {
        /// Position of the offending merge in the sequence.
        step: usize,
        /// Human-readable explanation.
        message: &'static str,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
