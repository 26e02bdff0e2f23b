use super::{DenseMatrixProvider, DenseMatrixProviderError, DenseMetric, support::*};
use agglo_core::{AggloBuilder, Algorithm, DistanceQuery, DistanceQueryError, Linkage};
use arrow_array::builder::{FixedSizeListBuilder, Float32Builder};
use arrow_array::{ArrayRef, FixedSizeListArray};
use arrow_schema::{DataType, Field};
use rstest::{fixture, rstest};
use std::sync::Arc;

#[fixture]
fn pair() -> DenseMatrixProvider {
    let array = build_array(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    DenseMatrixProvider::try_from_fixed_size_list("demo", &array).expect("valid matrix")
}

#[rstest]
fn matrix_provider_from_fixed_size_list(pair: DenseMatrixProvider) {
    assert_eq!(pair.len(), 2);
    assert_eq!(pair.dimension(), 3);
    assert_eq!(pair.data(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let distance = pair.distance(0, 1).expect("distance should work");
    assert!((distance - 27.0_f64.sqrt()).abs() < 1e-9);
}

#[rstest]
fn matrix_provider_squared_metric(pair: DenseMatrixProvider) {
    let provider = pair.with_metric(DenseMetric::SquaredEuclidean);
    assert!(provider.is_squared());
    assert_eq!(provider.distance(1, 0).expect("distance"), 27.0);
}

#[rstest]
fn matrix_provider_batch_distances(pair: DenseMatrixProvider) {
    let out = pair
        .batch_distances(0, &[1, 0])
        .expect("batch distances should work");
    assert_eq!(out.len(), 2);
    assert!((out[0] - 27.0_f64.sqrt()).abs() < 1e-9);
    assert_eq!(out[1], 0.0);
}

#[rstest]
#[case::query(99, &[0])]
#[case::candidate(0, &[1, 99])]
fn matrix_provider_out_of_bounds(
    pair: DenseMatrixProvider,
    #[case] query: usize,
    #[case] candidates: &[usize],
) {
    let err = pair
        .batch_distances(query, candidates)
        .expect_err("out-of-bounds indices must be reported");
    assert!(matches!(err, DistanceQueryError::OutOfBounds { index: 99 }));
}

#[rstest]
fn matrix_provider_rejects_null_rows() {
    let mut builder = FixedSizeListBuilder::new(Float32Builder::new(), 2);
    builder.values().append_value(1.0);
    builder.values().append_value(2.0);
    builder.append(true);
    builder.values().append_null();
    builder.values().append_null();
    builder.append(false);
    let array = builder.finish();
    let err = DenseMatrixProvider::try_from_fixed_size_list("demo", &array)
        .expect_err("null rows must be rejected");
    assert!(matches!(err, DenseMatrixProviderError::NullRow { row: 1 }));
}

#[rstest]
fn matrix_provider_rejects_null_values() {
    let mut builder = FixedSizeListBuilder::new(Float32Builder::new(), 2);
    builder.values().append_value(1.0);
    builder.values().append_value(2.0);
    builder.append(true);
    builder.values().append_value(3.0);
    builder.values().append_null();
    builder.append(true);
    let array = builder.finish();
    let err = DenseMatrixProvider::try_from_fixed_size_list("demo", &array)
        .expect_err("null values must be rejected");
    assert!(matches!(
        err,
        DenseMatrixProviderError::NullValue {
            row: 1,
            value_index: 1
        }
    ));
}

#[rstest]
fn matrix_provider_rejects_non_float_children() {
    let field = Arc::new(Field::new("item", DataType::Int32, true));
    let values: ArrayRef = Arc::new(arrow_array::Int32Array::from(vec![1, 2, 3, 4]));
    let array = FixedSizeListArray::new(field, 2, values, None);
    let err = DenseMatrixProvider::try_from_fixed_size_list("demo", &array)
        .expect_err("non-float children must be rejected");
    assert!(matches!(
        err,
        DenseMatrixProviderError::InvalidListValueType {
            actual: DataType::Int32
        }
    ));
}

#[rstest]
fn matrix_provider_clusters_with_ward() {
    let rows = [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [9.0, 0.0, 0.0], [9.0, 1.0, 0.0]];
    let provider = DenseMatrixProvider::try_from_fixed_size_list("blobs", &build_array(&rows))
        .expect("valid matrix")
        .with_metric(DenseMetric::SquaredEuclidean);

    let hierarchy = AggloBuilder::new()
        .with_algorithm(Algorithm::NnChain)
        .with_linkage(Linkage::Ward)
        .build()
        .expect("configuration must be valid")
        .run(&provider)
        .expect("clustering must succeed");

    assert_eq!(hierarchy.link_count(), 3);
    let heights: Vec<f64> = hierarchy.merges().iter().map(|m| m.distance()).collect();
    assert_eq!(&heights[..2], &[1.0, 1.0]);
    assert!(hierarchy.is_squared());
}
