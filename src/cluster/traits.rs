use crate::error::Result;
use crate::vector::SparseVector;

/// Common interface for flat clustering (one label per point).
pub trait Clustering {
    /// Fit the model and return one cluster label per input vector.
    fn fit_predict(&self, data: &[SparseVector]) -> Result<Vec<usize>>;

    /// The configured number of clusters.
    fn n_clusters(&self) -> usize;
}
