//! HDBSCAN hierarchies over mutual reachability distances.
//!
//! The mutual reachability of `i` and `j` is the largest of their distance
//! and the two core distances. Single linkage over it yields the HDBSCAN
//! hierarchy; [`HdbscanSlink`] builds it with SLINK and [`HdbscanPrim`]
//! through a minimum spanning tree.

use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    num::NonZeroUsize,
};

use tracing::instrument;

use super::slink::Pointers;
use crate::{
    BruteForceKnn, DistanceQuery, HierarchyError, KnnQuery, MergeProgress, PointerHierarchy,
    PointerHierarchyBuilder, progress::Ticker,
};

/// Computes the core distance of every object of `query`.
fn core_distances<D, K>(query: &D, knn: &K, min_pts: NonZeroUsize) -> Result<Vec<f64>, HierarchyError>
where
    D: DistanceQuery + ?Sized,
    K: KnnQuery + ?Sized,
{
    (0..query.len())
        .map(|index| knn.core_distance(index, min_pts).map_err(HierarchyError::from))
        .collect()
}

fn check_core_distances<D>(query: &D, core: &[f64]) -> Result<(), HierarchyError>
where
    D: DistanceQuery + ?Sized,
{
    if core.len() != query.len() {
        return Err(HierarchyError::InvalidCoreDistances {
            expected: query.len(),
            actual: core.len(),
        });
    }
    Ok(())
}

/// HDBSCAN hierarchy built with SLINK in `O(n)` memory.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use agglo_core::{DistanceQuery, DistanceQueryError, HdbscanSlink};
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
/// let min_pts = NonZeroUsize::new(2).expect("non-zero");
/// let hierarchy = HdbscanSlink::new(min_pts).run(&Line(vec![0.0, 1.0, 3.0]), None)?;
/// assert_eq!(hierarchy.core_distances(), Some(&[1.0, 1.0, 2.0][..]));
/// assert_eq!(hierarchy.link_count(), 2);
/// # Ok::<(), agglo_core::HierarchyError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HdbscanSlink {
    min_pts: NonZeroUsize,
}

impl HdbscanSlink {
    /// Creates the algorithm; `min_pts` counts the object itself.
    #[must_use]
    pub fn new(min_pts: NonZeroUsize) -> Self {
        Self { min_pts }
    }

    /// Neighbourhood size used for core distances.
    #[must_use]
    #[rustfmt::skip]
    pub fn min_pts(&self) -> NonZeroUsize { self.min_pts }

    /// Clusters `query`, computing core distances by exhaustive search.
    ///
    /// # Errors
    /// Returns [`HierarchyError::Query`] when a distance lookup fails.
    pub fn run<D>(
        &self,
        query: &D,
        progress: Option<&mut dyn MergeProgress>,
    ) -> Result<PointerHierarchy, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
    {
        self.run_with_knn(query, &BruteForceKnn::new(query), progress)
    }

    /// Clusters `query`, taking core distances from `knn`.
    ///
    /// # Errors
    /// Returns [`HierarchyError::Query`] when a distance or neighbour lookup
    /// fails.
    #[instrument(
        name = "core.hdbscan_slink",
        skip(self, query, knn, progress),
        fields(objects = query.len(), min_pts = self.min_pts.get()),
    )]
    pub fn run_with_knn<D, K>(
        &self,
        query: &D,
        knn: &K,
        progress: Option<&mut dyn MergeProgress>,
    ) -> Result<PointerHierarchy, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
        K: KnnQuery + ?Sized,
    {
        let core = core_distances(query, knn, self.min_pts)?;
        slink_reachability(query, core, progress)
    }

    /// Clusters `query` with caller-supplied core distances.
    ///
    /// # Errors
    /// Returns [`HierarchyError::InvalidCoreDistances`] when `core` does not
    /// hold one value per object and [`HierarchyError::Query`] when a
    /// distance lookup fails.
    #[instrument(
        name = "core.hdbscan_slink",
        skip(self, query, core, progress),
        fields(objects = query.len(), min_pts = self.min_pts.get()),
    )]
    pub fn run_with_core_distances<D>(
        &self,
        query: &D,
        core: &[f64],
        progress: Option<&mut dyn MergeProgress>,
    ) -> Result<PointerHierarchy, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
    {
        check_core_distances(query, core)?;
        slink_reachability(query, core.to_vec(), progress)
    }
}

fn slink_reachability<D>(
    query: &D,
    core: Vec<f64>,
    progress: Option<&mut dyn MergeProgress>,
) -> Result<PointerHierarchy, HierarchyError>
where
    D: DistanceQuery + ?Sized,
{
    let mut pointers = Pointers::new(query.len());
    let mut ticker = Ticker::new(progress, query.len().saturating_sub(1));
    let mut columns = Vec::with_capacity(query.len());
    for n in 0..query.len() {
        let mut row = query.batch_distances(n, &columns)?;
        for (i, distance) in row.iter_mut().enumerate() {
            *distance = distance.max(core[i]).max(core[n]);
        }
        pointers.insert_single(n, row);
        columns.push(n);
        if n > 0 {
            ticker.tick();
        }
    }
    Ok(pointers
        .into_hierarchy(query.is_squared())
        .with_core_distance_table(Some(core)))
}

/// HDBSCAN hierarchy built from a minimum spanning tree grown with Prim's
/// algorithm over the dense mutual reachability graph.
///
/// Tree edges are replayed in ascending order; each edge links the larger
/// of the two current cluster representatives under the smaller one. Ties
/// can leave parents merging at the same height as their children, which
/// [`PointerHierarchy::repair_monotonicity`] flattens before returning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HdbscanPrim {
    min_pts: NonZeroUsize,
}

impl HdbscanPrim {
    /// Creates the algorithm; `min_pts` counts the object itself.
    #[must_use]
    pub fn new(min_pts: NonZeroUsize) -> Self {
        Self { min_pts }
    }

    /// Neighbourhood size used for core distances.
    #[must_use]
    #[rustfmt::skip]
    pub fn min_pts(&self) -> NonZeroUsize { self.min_pts }

    /// Clusters `query`, computing core distances by exhaustive search.
    ///
    /// # Errors
    /// Returns [`HierarchyError::Query`] when a distance lookup fails.
    pub fn run<D>(
        &self,
        query: &D,
        progress: Option<&mut dyn MergeProgress>,
    ) -> Result<PointerHierarchy, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
    {
        self.run_with_knn(query, &BruteForceKnn::new(query), progress)
    }

    /// Clusters `query`, taking core distances from `knn`.
    ///
    /// # Errors
    /// Returns [`HierarchyError::Query`] when a distance or neighbour lookup
    /// fails.
    #[instrument(
        name = "core.hdbscan_prim",
        skip(self, query, knn, progress),
        fields(objects = query.len(), min_pts = self.min_pts.get()),
    )]
    pub fn run_with_knn<D, K>(
        &self,
        query: &D,
        knn: &K,
        progress: Option<&mut dyn MergeProgress>,
    ) -> Result<PointerHierarchy, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
        K: KnnQuery + ?Sized,
    {
        let core = core_distances(query, knn, self.min_pts)?;
        prim_reachability(query, core, progress)
    }

    /// Clusters `query` with caller-supplied core distances.
    ///
    /// # Errors
    /// Returns [`HierarchyError::InvalidCoreDistances`] when `core` does not
    /// hold one value per object and [`HierarchyError::Query`] when a
    /// distance lookup fails.
    #[instrument(
        name = "core.hdbscan_prim",
        skip(self, query, core, progress),
        fields(objects = query.len(), min_pts = self.min_pts.get()),
    )]
    pub fn run_with_core_distances<D>(
        &self,
        query: &D,
        core: &[f64],
        progress: Option<&mut dyn MergeProgress>,
    ) -> Result<PointerHierarchy, HierarchyError>
    where
        D: DistanceQuery + ?Sized,
    {
        check_core_distances(query, core)?;
        prim_reachability(query, core.to_vec(), progress)
    }
}

/// Edge of the mutual reachability spanning tree.
#[derive(Clone, Copy, Debug)]
struct SpanningEdge {
    distance: f64,
    source: usize,
    target: usize,
}

impl Ord for SpanningEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.source.cmp(&other.source))
            .then_with(|| self.target.cmp(&other.target))
    }
}

impl PartialOrd for SpanningEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SpanningEdge {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SpanningEdge {}

fn prim_reachability<D>(
    query: &D,
    core: Vec<f64>,
    progress: Option<&mut dyn MergeProgress>,
) -> Result<PointerHierarchy, HierarchyError>
where
    D: DistanceQuery + ?Sized,
{
    let size = query.len();
    let mut ticker = Ticker::new(progress, size.saturating_sub(1));
    let mut edges = BinaryHeap::with_capacity(size);
    let mut best = vec![f64::INFINITY; size];
    let mut source = vec![0; size];
    let mut remaining: Vec<usize> = (1..size).collect();
    let mut current = 0;
    while !remaining.is_empty() {
        let row = query.batch_distances(current, &remaining)?;
        let mut next: Option<(usize, usize)> = None;
        for (slot, (&j, &distance)) in remaining.iter().zip(&row).enumerate() {
            let reachability = distance.max(core[current]).max(core[j]);
            if reachability < best[j] {
                best[j] = reachability;
                source[j] = current;
            }
            if next.is_none_or(|(_, chosen)| best[j] < best[chosen]) {
                next = Some((slot, j));
            }
        }
        let Some((slot, target)) = next else {
            break;
        };
        edges.push(Reverse(SpanningEdge {
            distance: best[target],
            source: source[target],
            target,
        }));
        remaining.remove(slot);
        current = target;
        ticker.tick();
    }

    let mut builder = PointerHierarchyBuilder::new(size, query.is_squared());
    while let Some(Reverse(edge)) = edges.pop() {
        let left = representative(&builder, edge.source);
        let right = representative(&builder, edge.target);
        if left == right {
            continue;
        }
        builder.add(left.max(right), edge.distance, left.min(right));
    }
    let mut hierarchy = builder.complete().with_core_distance_table(Some(core));
    hierarchy.repair_monotonicity();
    Ok(hierarchy)
}

/// Root of the partial hierarchy currently containing `object`.
fn representative(builder: &PointerHierarchyBuilder, mut object: usize) -> usize {
    while let Some(parent) = builder.parent(object) {
        object = parent;
    }
    object
}
