//! Nearest-neighbour chain agglomeration.

use tracing::{instrument, warn};

use super::{LinkageMatrix, driver};
use crate::{
    DistanceQuery, HierarchyError, Linkage, MAX_OBJECTS, MergeProgress, PointerHierarchy,
    PointerHierarchyBuilder, progress::Ticker,
};

/// Nearest-neighbour chain algorithm.
///
/// Grows a chain in which every element is the nearest neighbour of its
/// predecessor and merges the first reciprocal pair it reaches. This runs in
/// `O(n²)` time and is exact for reducible linkages. Non-reducible linkages
/// ([`Linkage::Centroid`], [`Linkage::Median`]) still run but may differ from
/// [`Agnes`](super::Agnes); a `warn` event flags this.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NnChain {
    linkage: Linkage,
    max_objects: usize,
}

impl NnChain {
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
        name = "core.nn_chain",
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
        if !self.linkage.is_reducible() {
            warn!(
                linkage = %self.linkage,
                "linkage is not reducible; nearest-neighbour chains may not match exhaustive search"
            );
        }
        let size = query.len();
        let mut state = LinkageMatrix::load(query, self.linkage, self.max_objects)?;
        let mut builder = PointerHierarchyBuilder::new(size, query.is_squared());
        let mut ticker = Ticker::new(progress, size.saturating_sub(1));
        driver::nn_chain(&mut state, &mut builder, &mut ticker);
        Ok(builder.complete())
    }
}
