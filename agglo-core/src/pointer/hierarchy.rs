//! Immutable pointer-representation result.

use tracing::warn;

use crate::{HierarchyError, ObjectId};

/// Merge-order sentinel for objects that never joined a parent.
pub(crate) const UNMERGED: usize = usize::MAX;

/// Dendrogram encoded as one parent pointer and merge distance per object.
///
/// Objects are addressed by dense index; [`ids`](Self::ids) maps each index to
/// the caller's [`ObjectId`]. Parent pointers always refer to dense indices.
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
///         let a = self.0.get(i).ok_or(DistanceQueryError::OutOfBounds { index: i })?;
///         let b = self.0.get(j).ok_or(DistanceQueryError::OutOfBounds { index: j })?;
///         Ok((a - b).abs())
///     }
/// }
///
/// let hierarchy = Agnes::new(Linkage::Single).run(&Line(vec![0.0, 1.0, 5.0]), None)?;
/// assert_eq!(hierarchy.link_count(), 2);
/// assert_eq!(hierarchy.roots(), vec![0]);
/// assert_eq!(hierarchy.distances()[2], 4.0);
/// # Ok::<(), agglo_core::HierarchyError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PointerHierarchy {
    ids: Vec<ObjectId>,
    parent: Vec<usize>,
    distance: Vec<f64>,
    order: Option<Vec<usize>>,
    prototypes: Option<Vec<usize>>,
    core_distances: Option<Vec<f64>>,
    squared: bool,
}

/// A single link of a [`PointerHierarchy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    child: usize,
    parent: usize,
    distance: f64,
}

impl Merge {
    /// Dense index of the object that joined its parent.
    #[must_use]
    #[rustfmt::skip]
    pub fn child(&self) -> usize { self.child }

    /// Dense index of the surviving representative.
    #[must_use]
    #[rustfmt::skip]
    pub fn parent(&self) -> usize { self.parent }

    /// Distance at which the merge happened.
    #[must_use]
    #[rustfmt::skip]
    pub fn distance(&self) -> f64 { self.distance }
}

impl PointerHierarchy {
    pub(crate) fn assemble(
        parent: Vec<usize>,
        distance: Vec<f64>,
        order: Option<Vec<usize>>,
        squared: bool,
        merges: usize,
    ) -> Self {
        let objects = parent.len();
        let expected = objects.saturating_sub(1);
        if objects == 0 || merges != expected {
            warn!(
                objects,
                merges, expected, "pointer hierarchy does not link every object"
            );
        }
        Self {
            ids: (0..objects).map(ObjectId::from).collect(),
            parent,
            distance,
            order,
            prototypes: None,
            core_distances: None,
            squared,
        }
    }

    /// Builds a hierarchy from parent and distance arrays produced without a
    /// merge order.
    pub(crate) fn from_forest(parent: Vec<usize>, distance: Vec<f64>, squared: bool) -> Self {
        let merges = parent
            .iter()
            .enumerate()
            .filter(|&(object, &target)| object != target)
            .count();
        Self::assemble(parent, distance, None, squared, merges)
    }

    pub(crate) fn with_prototype_table(mut self, prototypes: Option<Vec<usize>>) -> Self {
        self.prototypes = prototypes;
        self
    }

    pub(crate) fn with_core_distance_table(mut self, core_distances: Option<Vec<f64>>) -> Self {
        self.core_distances = core_distances;
        self
    }

    /// Replaces the identifier side table.
    ///
    /// # Errors
    /// Returns [`HierarchyError::IdTableMismatch`] when `ids` does not hold
    /// exactly one identifier per object.
    pub fn with_ids(mut self, ids: Vec<ObjectId>) -> Result<Self, HierarchyError> {
        if ids.len() != self.parent.len() {
            return Err(HierarchyError::IdTableMismatch {
                expected: self.parent.len(),
                actual: ids.len(),
            });
        }
        self.ids = ids;
        Ok(self)
    }

    /// Number of objects in the hierarchy.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.parent.len() }

    /// Whether the hierarchy covers no objects.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.parent.is_empty() }

    /// Identifier of every object, by dense index.
    #[must_use]
    #[rustfmt::skip]
    pub fn ids(&self) -> &[ObjectId] { &self.ids }

    /// Parent index of every object; roots point at themselves.
    #[must_use]
    #[rustfmt::skip]
    pub fn parents(&self) -> &[usize] { &self.parent }

    /// Merge distance of every object; roots carry `+∞`.
    #[must_use]
    #[rustfmt::skip]
    pub fn distances(&self) -> &[f64] { &self.distance }

    /// 0-based merge sequence number per object, when the algorithm recorded
    /// one. Roots carry `usize::MAX`.
    #[must_use]
    pub fn merge_order(&self) -> Option<&[usize]> {
        self.order.as_deref()
    }

    /// Prototype chosen for the cluster each object's merge created, for the
    /// prototype-based linkages.
    #[must_use]
    pub fn prototypes(&self) -> Option<&[usize]> {
        self.prototypes.as_deref()
    }

    /// Core distance of every object, for the density-based algorithms.
    #[must_use]
    pub fn core_distances(&self) -> Option<&[f64]> {
        self.core_distances.as_deref()
    }

    /// Whether the recorded distances are squared values.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_squared(&self) -> bool { self.squared }

    /// Identifier of the parent of `index`, or `None` for out-of-range input.
    #[must_use]
    pub fn parent_id(&self, index: usize) -> Option<ObjectId> {
        let parent = *self.parent.get(index)?;
        self.ids.get(parent).copied()
    }

    /// Objects that never joined a parent, in index order.
    #[must_use]
    pub fn roots(&self) -> Vec<usize> {
        self.parent
            .iter()
            .enumerate()
            .filter_map(|(object, &parent)| (object == parent).then_some(object))
            .collect()
    }

    /// Number of objects linked to a parent.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.len() - self.roots().len()
    }

    /// Links in merge order, or by ascending distance when no merge order was
    /// recorded.
    #[must_use]
    pub fn merges(&self) -> Vec<Merge> {
        let mut linked: Vec<usize> = (0..self.len())
            .filter(|&object| self.parent[object] != object)
            .collect();
        match &self.order {
            Some(order) => linked.sort_by_key(|&object| (order[object], object)),
            None => linked.sort_by(|&a, &b| {
                self.distance[a]
                    .total_cmp(&self.distance[b])
                    .then_with(|| a.cmp(&b))
            }),
        }
        linked
            .into_iter()
            .map(|child| Merge {
                child,
                parent: self.parent[child],
                distance: self.distance[child],
            })
            .collect()
    }

    /// Whether every object joined its parent no later than the parent joined
    /// its own.
    #[must_use]
    pub fn is_monotone(&self) -> bool {
        (0..self.len()).all(|object| {
            let parent = self.parent[object];
            parent == object || self.distance[object] <= self.distance[parent]
        })
    }

    /// Re-parents objects whose merge distance is not below their parent's,
    /// moving them up the chain to the first ancestor that merged later.
    ///
    /// Tied distances in spanning-tree conversions can leave such locally
    /// non-monotone chains. Returns the number of objects re-parented.
    pub fn repair_monotonicity(&mut self) -> usize {
        let mut moved = 0;
        for object in 0..self.len() {
            let height = self.distance[object];
            let original = self.parent[object];
            let mut target = original;
            while height >= self.distance[target] && self.parent[target] != target {
                target = self.parent[target];
            }
            if target != original {
                self.parent[object] = target;
                moved += 1;
            }
        }
        moved
    }
}
