//! Sibson's SLINK single-linkage algorithm.

use tracing::instrument;

use crate::{DistanceQuery, HierarchyError, MergeProgress, PointerHierarchy, progress::Ticker};

/// Single-linkage clustering in `O(n²)` time and `O(n)` memory.
///
/// Objects are inserted one at a time and the pointer representation is
/// rewritten incrementally, so no distance matrix is ever stored. In the
/// result every object points at a larger index and no merge order is
/// recorded.
///
/// # Examples
/// ```
/// use agglo_core::{DistanceQuery, DistanceQueryError, Slink};
///
/// struct Line(Vec<f64>);
///
/// impl DistanceQuery for Line {
///     fn len(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "line" }
///     fn distance(&self, i: usize, j: usize) -> Result<f64, DistanceQueryError> {
///         Ok((self.0[i] - self.0[j]).abs())
///     }
/// }
///
/// let hierarchy = Slink::new().run(&Line(vec![0.0, 1.0, 2.0, 10.0]), None)?;
/// assert_eq!(hierarchy.parents(), &[2, 2, 3, 3]);
/// assert_eq!(hierarchy.distances(), &[1.0, 1.0, 8.0, f64::INFINITY]);
/// # Ok::<(), agglo_core::HierarchyError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slink;

impl Slink {
    /// Creates the algorithm.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Clusters every object of `query`.
    ///
    /// # Errors
    /// Returns [`HierarchyError::Query`] when a distance lookup fails.
    #[instrument(
        name = "core.slink",
        skip(self, query, progress),
        fields(objects = query.len(), linkage = "single"),
    )]
    pub fn run<D>(
        &self,
        query: &D,
        progress: Option<&mut dyn MergeProgress>,
    ) -> Result<PointerHierarchy, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
    {
        let mut pointers = Pointers::new(query.len());
        let mut ticker = Ticker::new(progress, query.len().saturating_sub(1));
        let mut columns = Vec::with_capacity(query.len());
        for n in 0..query.len() {
            let row = query.batch_distances(n, &columns)?;
            pointers.insert_single(n, row);
            columns.push(n);
            if n > 0 {
                ticker.tick();
            }
        }
        Ok(pointers.into_hierarchy(query.is_squared()))
    }
}

/// Incrementally maintained pointer representation `(π, λ)`.
#[derive(Debug)]
pub(crate) struct Pointers {
    pub(crate) parent: Vec<usize>,
    pub(crate) height: Vec<f64>,
}

impl Pointers {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            height: vec![f64::INFINITY; size],
        }
    }

    /// Inserts object `n` given its distances `m` to objects `0..n`,
    /// merging at the minimum.
    pub(crate) fn insert_single(&mut self, n: usize, mut m: Vec<f64>) {
        self.parent[n] = n;
        self.height[n] = f64::INFINITY;
        for i in 0..n {
            let p = self.parent[i];
            if self.height[i] >= m[i] {
                m[p] = m[p].min(self.height[i]);
                self.height[i] = m[i];
                self.parent[i] = n;
            } else {
                m[p] = m[p].min(m[i]);
            }
        }
        for i in 0..n {
            if self.height[i] >= self.height[self.parent[i]] {
                self.parent[i] = n;
            }
        }
    }

    pub(crate) fn into_hierarchy(self, squared: bool) -> PointerHierarchy {
        PointerHierarchy::from_forest(self.parent, self.height, squared)
    }
}
