//! Naive agglomerative nesting over the full distance matrix.

use tracing::instrument;

use super::{
    LinkageMatrix,
    driver::{self, Ties},
};
use crate::{
    DistanceQuery, HierarchyError, Linkage, MAX_OBJECTS, MergeProgress, PointerHierarchy,
    PointerHierarchyBuilder, progress::Ticker,
};

/// Agglomerative nesting (AGNES): every merge rescans the whole active
/// triangle for the closest pair.
///
/// Runs in `O(n³)` time and `O(n²)` memory and supports every [`Linkage`],
/// including the non-reducible ones. On ties the pair scanned last wins.
///
/// # Examples
/// ```
/// use agglo_core::{Agnes, DistanceQuery, DistanceQueryError, Linkage};
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
/// let hierarchy = Agnes::new(Linkage::Complete).run(&Line(vec![0.0, 1.0, 3.0]), None)?;
/// assert_eq!(hierarchy.merges().last().map(|merge| merge.distance()), Some(3.0));
/// # Ok::<(), agglo_core::HierarchyError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agnes {
    linkage: Linkage,
    max_objects: usize,
}

impl Agnes {
    /// Creates the algorithm for `linkage` with the default object limit.
    #[must_use]
    pub fn new(linkage: Linkage) -> Self {
        Self {
            linkage,
            max_objects: MAX_OBJECTS,
        }
    }

    /// Overrides the largest object count accepted before allocation.
    #[must_use]
    pub fn with_max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = max_objects;
        self
    }

    /// Linkage applied by this instance.
    #[must_use]
    #[rustfmt::skip]
    pub fn linkage(&self) -> Linkage { self.linkage }

    /// Clusters every object of `query`.
    ///
    /// # Errors
    /// Returns [`HierarchyError::TooManyObjects`] when the query exceeds the
    /// object limit and [`HierarchyError::Query`] when a distance lookup
    /// fails.
    #[instrument(
        name = "core.agnes",
        skip(self, query, progress),
        fields(objects = query.len(), linkage = %self.linkage),
    )]
    pub fn run<D>(
        &self,
        query: &D,
        progress: Option<&mut dyn MergeProgress>,
    ) -> Result<PointerHierarchy, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
    {
        let size = query.len();
        let mut state = LinkageMatrix::load(query, self.linkage, self.max_objects)?;
        let mut builder = PointerHierarchyBuilder::new(size, query.is_squared());
        let mut ticker = Ticker::new(progress, size.saturating_sub(1));
        driver::naive(&mut state, &mut builder, &mut ticker, Ties::PreferLast);
        Ok(builder.complete())
    }
}
