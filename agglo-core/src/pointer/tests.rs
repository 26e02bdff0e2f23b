//! Unit tests for the pointer-representation builder and result.

use agglo_test_support::tracing::{EventRecord, RecordingLayer};
use proptest::prelude::*;
use rstest::rstest;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use super::*;
use crate::{HierarchyError, ObjectId, test_utils::suite_proptest_config};

fn chain_builder() -> PointerHierarchyBuilder {
    let mut builder = PointerHierarchyBuilder::new(4, false);
    builder.add(2, 1.0, 1);
    builder.add(1, 1.0, 0);
    builder.add(3, 8.0, 0);
    builder
}

fn incomplete_warnings(layer: &RecordingLayer) -> Vec<EventRecord> {
    layer.events_with_message(Level::WARN, "pointer hierarchy does not link every object")
}

#[rstest]
fn complete_hierarchy_has_one_root_and_n_minus_one_links() {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let hierarchy = tracing::subscriber::with_default(subscriber, || chain_builder().complete());

    assert_eq!(hierarchy.roots(), vec![0]);
    assert_eq!(hierarchy.link_count(), 3);
    assert_eq!(hierarchy.distances(), &[f64::INFINITY, 1.0, 1.0, 8.0]);
    assert!(incomplete_warnings(&layer).is_empty());
}

#[rstest]
#[case::empty(0, 0)]
#[case::missing_merge(3, 1)]
fn complete_warns_when_merge_count_is_wrong(#[case] objects: usize, #[case] merges: usize) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let hierarchy = tracing::subscriber::with_default(subscriber, || {
        let mut builder = PointerHierarchyBuilder::new(objects, false);
        for child in 1..=merges {
            builder.add(child, 1.0, 0);
        }
        builder.complete()
    });

    assert_eq!(hierarchy.len(), objects);
    let warnings = incomplete_warnings(&layer);
    assert_eq!(warnings.len(), 1);
    let fields = &warnings[0].fields;
    assert_eq!(fields.get("objects"), Some(&objects.to_string()));
    assert_eq!(fields.get("merges"), Some(&merges.to_string()));
    assert_eq!(
        fields.get("expected"),
        Some(&objects.saturating_sub(1).to_string())
    );
}

#[rstest]
fn builder_tracks_sizes_until_completion() {
    let mut builder = PointerHierarchyBuilder::new(3, false);
    assert_eq!(builder.size(1), 1);
    builder.add(2, 0.5, 1);
    builder.set_size(1, 2);
    assert_eq!(builder.size(1), 2);
    assert!(builder.is_linked(2));
    assert!(!builder.is_linked(1));
    assert_eq!(builder.merge_count(), 1);
}

#[rstest]
fn prototypes_are_recorded_per_merge() {
    let mut builder = PointerHierarchyBuilder::with_prototypes(3, false);
    builder.strict_add_with_prototype(1, 1.0, 0, 0);
    builder.strict_add_with_prototype(2, 1.0, 0, 1);

    let hierarchy = builder.complete();

    assert_eq!(hierarchy.prototypes(), Some(&[0, 0, 1][..]));
}

#[rstest]
fn merges_follow_recorded_order() {
    let merges: Vec<(usize, usize, f64)> = chain_builder()
        .complete()
        .merges()
        .iter()
        .map(|merge| (merge.child(), merge.parent(), merge.distance()))
        .collect();

    assert_eq!(merges, vec![(2, 1, 1.0), (1, 0, 1.0), (3, 0, 8.0)]);
}

#[rstest]
fn merges_without_order_sort_by_distance_then_index() {
    let hierarchy = PointerHierarchy::from_forest(
        vec![2, 2, 3, 3],
        vec![1.0, 1.0, 8.0, f64::INFINITY],
        false,
    );

    let children: Vec<usize> = hierarchy.merges().iter().map(Merge::child).collect();

    assert_eq!(children, vec![0, 1, 2]);
    assert_eq!(hierarchy.merge_order(), None);
}

#[rstest]
fn with_ids_replaces_the_side_table() {
    let ids = vec![
        ObjectId::new(10),
        ObjectId::new(20),
        ObjectId::new(30),
        ObjectId::new(40),
    ];

    let hierarchy = chain_builder()
        .complete()
        .with_ids(ids.clone())
        .expect("lengths match");

    assert_eq!(hierarchy.ids(), ids.as_slice());
    assert_eq!(hierarchy.parent_id(2), Some(ObjectId::new(20)));
    assert_eq!(hierarchy.parent_id(9), None);
}

#[rstest]
fn with_ids_rejects_short_tables() {
    let err = chain_builder()
        .complete()
        .with_ids(vec![ObjectId::new(1)])
        .expect_err("one identifier cannot cover four objects");

    assert_eq!(
        err,
        HierarchyError::IdTableMismatch {
            expected: 4,
            actual: 1,
        }
    );
}

#[rstest]
fn repair_lifts_objects_above_earlier_parents() {
    let mut hierarchy = PointerHierarchy::from_forest(
        vec![1, 2, 3, 3],
        vec![2.0, 1.0, 3.0, f64::INFINITY],
        false,
    );
    assert!(!hierarchy.is_monotone());

    let moved = hierarchy.repair_monotonicity();

    assert_eq!(moved, 1);
    assert_eq!(hierarchy.parents(), &[2, 2, 3, 3]);
    assert!(hierarchy.is_monotone());
}

#[rstest]
fn topological_order_without_merge_order_uses_heights() {
    let hierarchy = PointerHierarchy::from_forest(
        vec![2, 2, 3, 3],
        vec![1.0, 1.0, 8.0, f64::INFINITY],
        false,
    );

    assert_eq!(hierarchy.topological_order(), vec![0, 1, 2, 3]);
    assert_eq!(hierarchy.subtree_sizes(), vec![1, 1, 3, 4]);
    assert_eq!(hierarchy.positions(), vec![1, 0, 2, 3]);
}

#[rstest]
fn positions_lay_out_separate_roots_side_by_side() {
    let mut builder = PointerHierarchyBuilder::new(4, false);
    builder.add(1, 1.0, 0);
    builder.add(3, 2.0, 2);
    let hierarchy = builder.complete();

    let mut positions = hierarchy.positions();
    assert_eq!(hierarchy.subtree_sizes(), vec![2, 1, 2, 1]);
    assert_eq!(positions[1] + 1, positions[0]);
    assert_eq!(positions[3] + 1, positions[2]);
    positions.sort_unstable();
    assert_eq!(positions, vec![0, 1, 2, 3]);
}

/// Random forest whose parents always have a larger index than the child.
fn forest() -> impl Strategy<Value = (Vec<usize>, Vec<f64>)> {
    (1usize..24).prop_flat_map(|size| {
        let parents: Vec<BoxedStrategy<usize>> = (0..size)
            .map(|child| {
                if child + 1 == size {
                    Just(child).boxed()
                } else {
                    (child + 1..size).boxed()
                }
            })
            .collect();
        (parents, proptest::collection::vec(0u8..6, size))
    })
    .prop_map(|(parents, heights)| {
        let distances = parents
            .iter()
            .zip(&heights)
            .enumerate()
            .map(|(child, (&parent, &height))| {
                if parent == child {
                    f64::INFINITY
                } else {
                    f64::from(height)
                }
            })
            .collect();
        (parents, distances)
    })
}

fn subtree_members(parents: &[usize], root: usize) -> Vec<usize> {
    (0..parents.len())
        .filter(|&object| {
            let mut current = object;
            loop {
                if current == root {
                    return true;
                }
                if parents[current] == current {
                    return false;
                }
                current = parents[current];
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(suite_proptest_config(64))]

    #[test]
    fn repair_always_yields_monotone_hierarchies((parents, distances) in forest()) {
        let mut hierarchy = PointerHierarchy::from_forest(parents, distances, false);
        hierarchy.repair_monotonicity();
        prop_assert!(hierarchy.is_monotone());
        prop_assert_eq!(hierarchy.roots().len(), 1);
    }

    #[test]
    fn positions_give_every_subtree_a_contiguous_interval((parents, distances) in forest()) {
        let hierarchy = PointerHierarchy::from_forest(parents.clone(), distances, false);
        let positions = hierarchy.positions();
        let sizes = hierarchy.subtree_sizes();

        let mut sorted = positions.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..parents.len()).collect::<Vec<_>>());

        for object in 0..parents.len() {
            let members = subtree_members(&parents, object);
            prop_assert_eq!(members.len(), sizes[object]);
            let low = positions[object] + 1 - sizes[object];
            for member in members {
                prop_assert!(positions[member] >= low && positions[member] <= positions[object]);
            }
        }
    }

    #[test]
    fn topological_order_lists_descendants_first((parents, distances) in forest()) {
        let hierarchy = PointerHierarchy::from_forest(parents.clone(), distances, false);
        let order = hierarchy.topological_order();
        let mut rank = vec![0; order.len()];
        for (position, &object) in order.iter().enumerate() {
            rank[object] = position;
        }
        for (child, &parent) in parents.iter().enumerate() {
            if parent != child {
                prop_assert!(rank[child] < rank[parent]);
            }
        }
    }
}
