//! Sparse token-count vectors.
//!
//! A [`SparseVector`] is a multiset of string tokens: each distinct token maps to
//! the number of times it occurred. The Euclidean norm is cached next to the counts
//! so that cosine similarity costs one pass over the smaller map.
//!
//! ## Norm caching
//!
//! The cached norm is *not* updated on every mutation. Anything that changes the
//! counts must be followed by [`SparseVector::renorm`] before the vector takes part
//! in [`SparseVector::dot`]-based similarity. [`SparseVector::add`] and the
//! constructors do this themselves; [`SparseVector::increment`] does not.
//!
//! ## Zero vectors
//!
//! A vector built from no tokens has norm 0. Its similarity to every vector,
//! itself included, is defined as 0.

use std::collections::HashMap;

/// Sparse nonnegative-integer-count vector keyed by token.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "HashMap<String, u32>", into = "HashMap<String, u32>")
)]
pub struct SparseVector {
    counts: HashMap<String, u32>,
    norm: f64,
}

impl SparseVector {
    /// Create the zero vector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every token in `tokens` and compute the norm.
    ///
    /// Duplicates are meaningful: `["a", "a", "b"]` gives `a -> 2, b -> 1`.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens = tokens.into_iter();
        let mut v = Self {
            counts: HashMap::with_capacity(tokens.size_hint().0),
            norm: 0.0,
        };
        for token in tokens {
            v.increment(token.as_ref(), 1);
        }
        v.renorm();
        v
    }

    /// Build a vector from precomputed counts.
    pub fn from_counts(counts: HashMap<String, u32>) -> Self {
        let mut v = Self { counts, norm: 0.0 };
        v.renorm();
        v
    }

    /// Add `by` to the count of `token`.
    ///
    /// Leaves the cached norm stale; call [`renorm`](Self::renorm) afterwards.
    pub fn increment(&mut self, token: &str, by: u32) {
        if let Some(c) = self.counts.get_mut(token) {
            *c = c.saturating_add(by);
        } else {
            self.counts.insert(token.to_owned(), by);
        }
    }

    /// Recompute the cached norm: `sqrt(Σ count²)`.
    pub fn renorm(&mut self) {
        let sum: u128 = self
            .counts
            .values()
            .map(|&c| u128::from(c) * u128::from(c))
            .sum();
        self.norm = (sum as f64).sqrt();
    }

    /// Add `other` into `self` in place, then renormalize.
    ///
    /// `other` is left untouched.
    pub fn add(&mut self, other: &SparseVector) {
        self.counts.reserve(other.counts.len());
        for (token, &c) in &other.counts {
            self.increment(token, c);
        }
        self.renorm();
    }

    /// Inner product over the tokens both vectors share.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (small, large) = if self.counts.len() > other.counts.len() {
            (other, self)
        } else {
            (self, other)
        };
        let sum: u128 = small
            .counts
            .iter()
            .filter_map(|(token, &a)| {
                large
                    .counts
                    .get(token)
                    .map(|&b| u128::from(a) * u128::from(b))
            })
            .sum();
        sum as f64
    }

    /// Cosine similarity, in `[0, 1]` for count vectors.
    ///
    /// Returns 0 when either vector has norm 0.
    pub fn similarity(&self, other: &SparseVector) -> f64 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }
        self.dot(other) / (self.norm * other.norm)
    }

    /// The cached Euclidean norm.
    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// Count for `token` (0 if absent).
    pub fn count(&self, token: &str) -> u32 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens stored.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if no token is stored.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(token, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }
}

impl From<HashMap<String, u32>> for SparseVector {
    fn from(counts: HashMap<String, u32>) -> Self {
        Self::from_counts(counts)
    }
}

impl From<SparseVector> for HashMap<String, u32> {
    fn from(v: SparseVector) -> Self {
        v.counts
    }
}

impl<S: AsRef<str>> FromIterator<S> for SparseVector {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_tokens(iter)
    }
}

/// Build a [`SparseVector`] from a token sequence.
pub fn build_vector<I, S>(tokens: I) -> SparseVector
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    SparseVector::from_tokens(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_duplicates() {
        let v = build_vector(["a", "a", "b"]);
        assert_eq!(v.count("a"), 2);
        assert_eq!(v.count("b"), 1);
        assert_eq!(v.count("c"), 0);
        assert_eq!(v.len(), 2);
        assert!((v.norm() - 5.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empty_tokens_give_zero_vector() {
        let v = build_vector(Vec::<String>::new());
        assert!(v.is_empty());
        assert_eq!(v.norm(), 0.0);
        assert_eq!(v.similarity(&v), 0.0);
        assert_eq!(v, SparseVector::new());
    }

    #[test]
    fn zero_vector_similarity_is_zero() {
        let a = build_vector(["x", "y"]);
        let z = SparseVector::new();
        assert_eq!(a.similarity(&z), 0.0);
        assert_eq!(z.similarity(&a), 0.0);
    }

    #[test]
    fn identical_vectors_have_similarity_one() {
        let a = build_vector(["a", "a", "b"]);
        let b = build_vector(["b", "a", "a"]);
        assert!((a.similarity(&b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn disjoint_vectors_have_similarity_zero() {
        let a = build_vector(["a"]);
        let b = build_vector(["b"]);
        assert_eq!(a.dot(&b), 0.0);
        assert_eq!(a.similarity(&b), 0.0);
    }

    #[test]
    fn dot_iterates_smaller_side_symmetrically() {
        let a = build_vector(["a", "b", "c", "d", "a"]);
        let b = build_vector(["a", "z"]);
        assert_eq!(a.dot(&b), 2.0);
        assert_eq!(b.dot(&a), 2.0);
    }

    #[test]
    fn add_merges_counts_and_renorms() {
        let mut a = build_vector(["a", "b"]);
        let b = build_vector(["b", "c", "c"]);
        a.add(&b);
        assert_eq!(a.count("a"), 1);
        assert_eq!(a.count("b"), 2);
        assert_eq!(a.count("c"), 2);
        assert!((a.norm() - 3.0).abs() < 1e-12);
        // Other side is unchanged.
        assert_eq!(b.count("b"), 1);
    }

    #[test]
    fn increment_leaves_norm_stale_until_renorm() {
        let mut v = build_vector(["a"]);
        v.increment("a", 2);
        assert_eq!(v.norm(), 1.0);
        v.renorm();
        assert_eq!(v.norm(), 3.0);
        let before = v.norm();
        v.renorm();
        assert_eq!(v.norm(), before);
    }

    #[test]
    fn from_counts_and_collect_agree() {
        let mut counts = HashMap::new();
        counts.insert("a".to_string(), 2);
        counts.insert("b".to_string(), 1);
        let a = SparseVector::from_counts(counts);
        let b: SparseVector = ["a", "b", "a"].iter().collect();
        assert_eq!(a, b);
    }
}
