//! Flat clusterings cut from a pointer hierarchy.
//!
//! Both cuts replay a prefix of the hierarchy's links through a union-find
//! and label the resulting components `0..k` in order of their first
//! object.

mod union_find;

use crate::{ClusterId, ClusteringResult, HierarchyError, PointerHierarchy};

use self::union_find::DisjointSet;

/// Cuts the hierarchy at `threshold`: objects linked at a distance not
/// exceeding it share a cluster.
///
/// # Examples
/// ```
/// use agglo_core::{PointerHierarchyBuilder, cut_by_height};
///
/// let mut builder = PointerHierarchyBuilder::new(4, false);
/// builder.add(2, 1.0, 1);
/// builder.add(1, 1.0, 0);
/// builder.add(3, 8.0, 0);
/// let hierarchy = builder.complete();
///
/// let flat = cut_by_height(&hierarchy, 2.0);
/// assert_eq!(flat.cluster_count(), 2);
/// assert_eq!(flat.assignments()[3].get(), 1);
/// ```
#[must_use]
pub fn cut_by_height(hierarchy: &PointerHierarchy, threshold: f64) -> ClusteringResult {
    let mut sets = DisjointSet::new(hierarchy.len());
    for (object, (&parent, &distance)) in hierarchy
        .parents()
        .iter()
        .zip(hierarchy.distances())
        .enumerate()
    {
        if parent != object && distance <= threshold {
            sets.union(object, parent);
        }
    }
    label(&mut sets, hierarchy.len())
}

/// Cuts the hierarchy into exactly `clusters` clusters by replaying its
/// first `n - clusters` merges.
///
/// # Errors
/// Returns [`HierarchyError::InvalidClusterCount`] when `clusters` is zero,
/// exceeds the number of objects, or is smaller than the number of roots the
/// hierarchy has.
pub fn cut_by_count(
    hierarchy: &PointerHierarchy,
    clusters: usize,
) -> Result<ClusteringResult, HierarchyError> {
    let objects = hierarchy.len();
    let merges = hierarchy.merges();
    let invalid = HierarchyError::InvalidClusterCount {
        requested: clusters,
        objects,
    };
    if clusters == 0 || clusters > objects {
        return Err(invalid);
    }
    let replay = objects - clusters;
    if replay > merges.len() {
        return Err(invalid);
    }
    let mut sets = DisjointSet::new(objects);
    for merge in &merges[..replay] {
        sets.union(merge.child(), merge.parent());
    }
    Ok(label(&mut sets, objects))
}

fn label(sets: &mut DisjointSet, objects: usize) -> ClusteringResult {
    let mut labels: Vec<Option<usize>> = vec![None; objects];
    let mut next = 0;
    let assignments = (0..objects)
        .map(|object| {
            let root = sets.find(object);
            let id = *labels[root].get_or_insert_with(|| {
                next += 1;
                next - 1
            });
            ClusterId::from(id)
        })
        .collect();
    ClusteringResult::from_contiguous(assignments, next)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::PointerHierarchyBuilder;

    /// Dendrogram of points {0, 1, 2, 10} under single linkage.
    fn small() -> PointerHierarchy {
        let mut builder = PointerHierarchyBuilder::new(4, false);
        builder.add(2, 1.0, 1);
        builder.add(1, 1.0, 0);
        builder.add(3, 8.0, 0);
        builder.complete()
    }

    fn labels(result: &ClusteringResult) -> Vec<u64> {
        result.assignments().iter().map(|id| id.get()).collect()
    }

    #[rstest]
    #[case::below_everything(0.5, vec![0, 1, 2, 3])]
    #[case::first_level(1.0, vec![0, 0, 0, 1])]
    #[case::between_levels(7.9, vec![0, 0, 0, 1])]
    #[case::everything(8.0, vec![0, 0, 0, 0])]
    fn height_cut_respects_threshold(#[case] threshold: f64, #[case] expected: Vec<u64>) {
        assert_eq!(labels(&cut_by_height(&small(), threshold)), expected);
    }

    #[rstest]
    #[case::all(1, vec![0, 0, 0, 0])]
    #[case::outlier_apart(2, vec![0, 0, 0, 1])]
    #[case::first_merge_only(3, vec![0, 1, 1, 2])]
    #[case::singletons(4, vec![0, 1, 2, 3])]
    fn count_cut_replays_merges_in_order(#[case] clusters: usize, #[case] expected: Vec<u64>) {
        let flat = cut_by_count(&small(), clusters).expect("valid cluster count");
        assert_eq!(flat.cluster_count(), clusters);
        assert_eq!(labels(&flat), expected);
    }

    #[rstest]
    #[case::zero(0)]
    #[case::too_many(5)]
    fn count_cut_rejects_out_of_range_counts(#[case] clusters: usize) {
        let err = cut_by_count(&small(), clusters).expect_err("count must be rejected");
        assert_eq!(
            err,
            HierarchyError::InvalidClusterCount {
                requested: clusters,
                objects: 4,
            }
        );
    }

    #[rstest]
    fn count_cut_rejects_counts_below_the_root_count() {
        let mut builder = PointerHierarchyBuilder::new(3, false);
        builder.add(2, 1.0, 1);
        let forest = builder.complete();

        assert!(cut_by_count(&forest, 1).is_err());
        assert_eq!(
            cut_by_count(&forest, 2).map(|flat| labels(&flat)),
            Ok(vec![0, 1, 1])
        );
    }

    #[rstest]
    fn cuts_of_an_empty_hierarchy_are_empty() {
        let empty = PointerHierarchyBuilder::new(0, false).complete();
        assert_eq!(cut_by_height(&empty, 1.0).cluster_count(), 0);
        assert!(cut_by_count(&empty, 1).is_err());
    }
}
