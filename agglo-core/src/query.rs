//! Distance and nearest-neighbour query abstractions consumed by the
//! clustering algorithms.

use std::num::NonZeroUsize;

use crate::error::DistanceQueryError;

/// Abstraction over a collection of objects that can yield pairwise distances.
///
/// Objects are addressed by dense indices `0..len()`. Distances must be
/// finite and non-negative; the algorithms do not validate them.
///
/// # Examples
/// ```
/// use agglo_core::{DistanceQuery, DistanceQueryError};
///
/// struct Line(Vec<f64>);
///
/// impl DistanceQuery for Line {
///     fn len(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "line" }
///     fn distance(&self, i: usize, j: usize) -> Result<f64, DistanceQueryError> {
///         let a = self.0.get(i).ok_or(DistanceQueryError::OutOfBounds { index: i })?;
///         let b = self.0.get(j).ok_or(DistanceQueryError::OutOfBounds { index: j })?;
///         Ok((a - b).abs())
///     }
/// }
///
/// let query = Line(vec![1.0, 2.0, 4.0]);
/// assert_eq!(query.len(), 3);
/// assert_eq!(query.distance(0, 2)?, 3.0);
/// assert!(!query.is_squared());
///
/// let batched = query.batch_distances(0, &[1, 2])?;
/// assert_eq!(batched, [1.0, 3.0]);
/// # Ok::<(), DistanceQueryError>(())
/// ```
pub trait DistanceQuery {
    /// Returns number of objects in the query.
    fn len(&self) -> usize;

    /// Returns whether the query contains no objects.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a human-readable name.
    fn name(&self) -> &str;

    /// Computes the distance between two objects.
    fn distance(&self, i: usize, j: usize) -> Result<f64, DistanceQueryError>;

    /// Reports whether [`distance`](Self::distance) already yields squared
    /// values, as squared Euclidean does.
    ///
    /// Linkages that work on squared distances skip their own squaring step
    /// when this is `true`.
    fn is_squared(&self) -> bool {
        false
    }

    /// Computes the distances from `query` to every entry in `candidates`.
    ///
    /// Implementations can override this method to provide vectorised
    /// kernels. The default implementation calls [`distance`](Self::distance)
    /// repeatedly and collects the results.
    ///
    /// # Errors
    /// Returns any [`DistanceQueryError`] surfaced by
    /// [`distance`](Self::distance).
    fn batch_distances(
        &self,
        query: usize,
        candidates: &[usize],
    ) -> Result<Vec<f64>, DistanceQueryError> {
        candidates
            .iter()
            .map(|&candidate| self.distance(query, candidate))
            .collect()
    }
}

/// Supplies core distances for density-based clustering.
pub trait KnnQuery {
    /// Returns the distance from `index` to its `k`-th nearest neighbour,
    /// counting the object itself as its first neighbour.
    ///
    /// # Errors
    /// Returns [`DistanceQueryError::OutOfBounds`] for invalid indices and any
    /// error raised by the underlying distance computation.
    fn core_distance(&self, index: usize, k: NonZeroUsize) -> Result<f64, DistanceQueryError>;
}

/// Exhaustive [`KnnQuery`] over any [`DistanceQuery`].
///
/// Each lookup computes all `n` distances from the object and selects the
/// `k`-th smallest, so a full core-distance pass costs `O(n²)` distance
/// evaluations. When `k` exceeds the number of objects the largest distance is
/// returned.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use agglo_core::{BruteForceKnn, DistanceQuery, DistanceQueryError, KnnQuery};
///
/// struct Line(Vec<f64>);
///
/// impl DistanceQuery for Line {
///     fn len(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "line" }
///     fn distance(&self, i: usize, j: usize) -> Result<f64, DistanceQueryError> {
///         let a = self.0.get(i).ok_or(DistanceQueryError::OutOfBounds { index: i })?;
///         let b = self.0.get(j).ok_or(DistanceQueryError::OutOfBounds { index: j })?;
///         Ok((a - b).abs())
///     }
/// }
///
/// let line = Line(vec![0.0, 1.0, 3.0, 7.0]);
/// let knn = BruteForceKnn::new(&line);
/// let two = NonZeroUsize::new(2).expect("non-zero");
/// assert_eq!(knn.core_distance(2, two)?, 2.0);
/// # Ok::<(), DistanceQueryError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BruteForceKnn<'q, D: ?Sized> {
    query: &'q D,
}

impl<'q, D: DistanceQuery + ?Sized> BruteForceKnn<'q, D> {
    /// Wraps `query` for exhaustive neighbour lookups.
    #[must_use]
    pub fn new(query: &'q D) -> Self {
        Self { query }
    }
}

impl<D: DistanceQuery + ?Sized> KnnQuery for BruteForceKnn<'_, D> {
    fn core_distance(&self, index: usize, k: NonZeroUsize) -> Result<f64, DistanceQueryError> {
        let len = self.query.len();
        if index >= len {
            return Err(DistanceQueryError::OutOfBounds { index });
        }
        let candidates: Vec<usize> = (0..len).collect();
        let mut distances = self.query.batch_distances(index, &candidates)?;
        distances.sort_by(f64::total_cmp);
        let rank = k.get().min(distances.len()) - 1;
        Ok(distances.get(rank).copied().unwrap_or(0.0))
    }
}
