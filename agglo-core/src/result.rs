//! Flat clustering results and the identifier newtypes shared by the public
//! API.

use std::fmt;

/// Flat clustering obtained by cutting a hierarchy with
/// [`cut_by_height`](crate::cut_by_height) or
/// [`cut_by_count`](crate::cut_by_count).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusteringResult {
    assignments: Vec<ClusterId>,
    cluster_count: usize,
}

impl ClusteringResult {
    /// Wraps labels that are already known to be contiguous from zero.
    pub(crate) fn from_contiguous(assignments: Vec<ClusterId>, cluster_count: usize) -> Self {
        debug_assert!(
            assignments
                .iter()
                .all(|id| usize::try_from(id.get()).is_ok_and(|value| value < cluster_count)),
            "labels must lie below the cluster count"
        );
        Self {
            assignments,
            cluster_count,
        }
    }

    /// Label of each object, by object index.
    #[must_use]
    pub fn assignments(&self) -> &[ClusterId] {
        &self.assignments
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }
}

/// Identifier assigned to a cluster.
///
/// # Examples
/// ```
/// use agglo_core::ClusterId;
///
/// let id = ClusterId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(u64);

impl ClusterId {
    /// Creates a new cluster identifier.
    #[rustfmt::skip]
    #[must_use]
    pub fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub fn get(self) -> u64 { self.0 }
}

impl From<usize> for ClusterId {
    fn from(label: usize) -> Self {
        Self(label as u64)
    }
}

/// Opaque identifier of an input object.
///
/// Algorithms work on dense indices; the hierarchy maps each index to an
/// `ObjectId` only at the boundary.
///
/// # Examples
/// ```
/// use agglo_core::ObjectId;
///
/// let id = ObjectId::new(42);
/// assert_eq!(id.get(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Creates a new object identifier.
    #[rustfmt::skip]
    #[must_use]
    pub fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub fn get(self) -> u64 { self.0 }
}

impl From<usize> for ObjectId {
    fn from(index: usize) -> Self {
        Self(index as u64)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_convert_from_dense_indices() {
        let result = ClusteringResult::from_contiguous(
            [0_usize, 1, 0].into_iter().map(ClusterId::from).collect(),
            2,
        );
        assert_eq!(result.cluster_count(), 2);
        assert_eq!(result.assignments()[2], ClusterId::new(0));
    }
}
