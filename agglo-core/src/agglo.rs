//! Clustering orchestration for the agglo library.
//!
//! Provides the [`Agglo`] runtime entry point, which dispatches to the
//! configured algorithm and wraps hierarchy failures with the name of the
//! distance query being clustered.

use std::{num::NonZeroUsize, sync::Arc};

use tracing::{info, instrument, warn};

use crate::{
    Agnes, Algorithm, Anderberg, Clink, DistanceQuery, HdbscanPrim, HdbscanSlink, Linkage, Medoid,
    MergeProgress, MiniMax, MiniMaxAnderberg, MiniMaxNnChain, NnChain, ObjectId, PointerHierarchy,
    Result, Slink,
    error::{AggloError, HierarchyError},
};

/// Entry point for running a configured clustering algorithm.
///
/// # Examples
/// ```
/// use agglo_core::{AggloBuilder, Algorithm, DistanceQuery, DistanceQueryError};
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
/// let agglo = AggloBuilder::new()
///     .with_algorithm(Algorithm::Slink)
///     .build()
///     .expect("builder must succeed");
/// let hierarchy = agglo
///     .run(&Line(vec![0.0, 1.0, 2.0, 10.0]))
///     .expect("run must succeed");
/// assert_eq!(hierarchy.link_count(), 3);
/// assert_eq!(hierarchy.roots(), vec![3]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Agglo {
    algorithm: Algorithm,
    linkage: Linkage,
    min_pts: NonZeroUsize,
    max_objects: usize,
}

impl Agglo {
    pub(crate) fn new(
        algorithm: Algorithm,
        linkage: Linkage,
        min_pts: NonZeroUsize,
        max_objects: usize,
    ) -> Self {
        Self {
            algorithm,
            linkage,
            min_pts,
            max_objects,
        }
    }

    /// Returns the algorithm configured for this instance.
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Returns the linkage configured for this instance.
    #[must_use]
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Returns the neighbourhood size used for core distances.
    #[must_use]
    pub fn min_pts(&self) -> NonZeroUsize {
        self.min_pts
    }

    /// Returns the largest object count the matrix algorithms accept.
    #[must_use]
    pub fn max_objects(&self) -> usize {
        self.max_objects
    }

    /// Clusters every object of `source`.
    ///
    /// # Errors
    /// Returns [`AggloError::Hierarchy`] when the algorithm fails, for
    /// example because `source` exceeds the object limit or a distance lookup
    /// fails.
    pub fn run<D>(&self, source: &D) -> Result<PointerHierarchy>
    where
        D: DistanceQuery + ?Sized,
    {
        self.run_inner(source, None)
    }

    /// Clusters every object of `source`, reporting each merge to `progress`.
    ///
    /// # Errors
    /// Fails under the same conditions as [`run`](Self::run).
    pub fn run_with_progress<D>(
        &self,
        source: &D,
        progress: &mut dyn MergeProgress,
    ) -> Result<PointerHierarchy>
    where
        D: DistanceQuery + ?Sized,
    {
        self.run_inner(source, Some(progress))
    }

    /// Clusters every object of `source` and labels the result with `ids`.
    ///
    /// # Errors
    /// Fails under the same conditions as [`run`](Self::run) and with
    /// [`HierarchyError::IdTableMismatch`] (wrapped in
    /// [`AggloError::Hierarchy`]) when `ids` does not hold one identifier per
    /// object.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::{AggloBuilder, DistanceQuery, DistanceQueryError, ObjectId};
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
    /// let agglo = AggloBuilder::new().build()?;
    /// let ids = vec![ObjectId::new(10), ObjectId::new(20)];
    /// let hierarchy = agglo.run_with_ids(&Line(vec![0.0, 1.0]), ids)?;
    /// assert_eq!(hierarchy.parent_id(1), Some(ObjectId::new(10)));
    /// # Ok::<(), agglo_core::AggloError>(())
    /// ```
    pub fn run_with_ids<D>(&self, source: &D, ids: Vec<ObjectId>) -> Result<PointerHierarchy>
    where
        D: DistanceQuery + ?Sized,
    {
        let hierarchy = self.run_inner(source, None)?;
        hierarchy
            .with_ids(ids)
            .map_err(|error| wrap_hierarchy_error(source, error))
    }

    #[instrument(
        name = "core.run",
        err,
        skip(self, source, progress),
        fields(
            data_source = %source.name(),
            objects = source.len(),
            algorithm = %self.algorithm,
            linkage = %self.linkage,
        ),
    )]
    fn run_inner<D>(
        &self,
        source: &D,
        progress: Option<&mut dyn MergeProgress>,
    ) -> Result<PointerHierarchy>
    where
        D: DistanceQuery + ?Sized,
    {
        if source.is_empty() {
            warn!(
                data_source = source.name(),
                "distance query is empty, returning an empty hierarchy"
            );
        }

        let hierarchy = self
            .dispatch(source, progress)
            .map_err(|error| wrap_hierarchy_error(source, error))?;
        info!(
            merges = hierarchy.link_count(),
            roots = hierarchy.roots().len(),
            "clustering completed"
        );
        Ok(hierarchy)
    }

    fn dispatch<D>(
        &self,
        source: &D,
        progress: Option<&mut dyn MergeProgress>,
    ) -> core::result::Result<PointerHierarchy, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
    {
        let limit = self.max_objects;
        match self.algorithm {
            Algorithm::Agnes => Agnes::new(self.linkage)
                .with_max_objects(limit)
                .run(source, progress),
            Algorithm::Anderberg => Anderberg::new(self.linkage)
                .with_max_objects(limit)
                .run(source, progress),
            Algorithm::NnChain => NnChain::new(self.linkage)
                .with_max_objects(limit)
                .run(source, progress),
            Algorithm::Slink => Slink::new().run(source, progress),
            Algorithm::Clink => Clink::new().run(source, progress),
            Algorithm::HdbscanSlink => HdbscanSlink::new(self.min_pts).run(source, progress),
            Algorithm::HdbscanPrim => HdbscanPrim::new(self.min_pts).run(source, progress),
            Algorithm::MiniMax => MiniMax::new().with_max_objects(limit).run(source, progress),
            Algorithm::MiniMaxAnderberg => MiniMaxAnderberg::new()
                .with_max_objects(limit)
                .run(source, progress),
            Algorithm::MiniMaxNnChain => MiniMaxNnChain::new()
                .with_max_objects(limit)
                .run(source, progress),
            Algorithm::Medoid(objective) => Medoid::new(objective)
                .with_max_objects(limit)
                .run(source, progress),
        }
    }
}

fn wrap_hierarchy_error<D>(source: &D, error: HierarchyError) -> AggloError
where
    D: DistanceQuery + ?Sized,
{
    AggloError::Hierarchy {
        data_source: Arc::from(source.name()),
        error,
    }
}
