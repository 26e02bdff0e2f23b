//! Anderberg's nearest-neighbour cached agglomeration.

use tracing::instrument;

use super::{LinkageMatrix, driver};
use crate::{
    DistanceQuery, HierarchyError, Linkage, MAX_OBJECTS, MergeProgress, PointerHierarchy,
    PointerHierarchyBuilder, progress::Ticker,
};

/// Agglomeration with a per-row cache of each cluster's nearest neighbour.
///
/// Produces the same hierarchy as [`Agnes`](super::Agnes) up to ties, while
/// typically running close to `O(n²)` because only rows whose cached
/// neighbour took part in a merge are rescanned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anderberg {
    linkage: Linkage,
    max_objects: usize,
}

impl Anderberg {
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
        name = "core.anderberg",
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
        driver::nearest_cache(&mut state, &mut builder, &mut ticker);
        Ok(builder.complete())
    }
}
