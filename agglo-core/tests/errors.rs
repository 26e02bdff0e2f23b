use std::sync::Arc;

use agglo_core::{
    AggloError, AggloErrorCode, DistanceQueryError, DistanceQueryErrorCode, HierarchyError,
    HierarchyErrorCode,
};
use rstest::rstest;

#[rstest]
#[case(DistanceQueryError::OutOfBounds { index: 0 }, DistanceQueryErrorCode::OutOfBounds)]
#[case(
    DistanceQueryError::OutputLengthMismatch { out: 1, expected: 2 },
    DistanceQueryErrorCode::OutputLengthMismatch,
)]
#[case(
    DistanceQueryError::DimensionMismatch { left: 1, right: 2 },
    DistanceQueryErrorCode::DimensionMismatch,
)]
#[case(DistanceQueryError::EmptyData, DistanceQueryErrorCode::EmptyData)]
#[case(DistanceQueryError::ZeroDimension, DistanceQueryErrorCode::ZeroDimension)]
fn returns_expected_distance_query_code(
    #[case] error: DistanceQueryError,
    #[case] expected: DistanceQueryErrorCode,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().to_string(), expected.as_str());
}

#[rstest]
#[case(
    HierarchyError::TooManyObjects { objects: 9, limit: 8 },
    "HIERARCHY_TOO_MANY_OBJECTS",
    None,
)]
#[case(
    HierarchyError::Query { source: DistanceQueryError::EmptyData },
    "HIERARCHY_QUERY_FAILURE",
    Some(DistanceQueryErrorCode::EmptyData),
)]
#[case(
    HierarchyError::IdTableMismatch { expected: 3, actual: 2 },
    "HIERARCHY_ID_TABLE_MISMATCH",
    None,
)]
#[case(
    HierarchyError::InvalidClusterCount { requested: 0, objects: 3 },
    "HIERARCHY_INVALID_CLUSTER_COUNT",
    None,
)]
#[case(
    HierarchyError::InvalidCoreDistances { expected: 3, actual: 1 },
    "HIERARCHY_INVALID_CORE_DISTANCES",
    None,
)]
fn returns_expected_hierarchy_code(
    #[case] error: HierarchyError,
    #[case] expected: &str,
    #[case] query_code: Option<DistanceQueryErrorCode>,
) {
    assert_eq!(error.code().as_str(), expected);
    assert_eq!(error.query_code(), query_code);
}

#[rstest]
#[case(
    AggloError::InvalidMinPts { got: 0 },
    AggloErrorCode::InvalidMinPts,
    None,
)]
#[case(
    AggloError::InvalidFlexibleBeta { beta: f64::NAN },
    AggloErrorCode::InvalidFlexibleBeta,
    None,
)]
#[case(
    AggloError::InvalidObjectLimit { got: 0, max: 65_536 },
    AggloErrorCode::InvalidObjectLimit,
    None,
)]
#[case(
    AggloError::Hierarchy {
        data_source: Arc::from("source"),
        error: HierarchyError::TooManyObjects { objects: 9, limit: 8 },
    },
    AggloErrorCode::HierarchyFailure,
    Some(HierarchyErrorCode::TooManyObjects),
)]
fn returns_expected_agglo_code(
    #[case] error: AggloError,
    #[case] expected: AggloErrorCode,
    #[case] hierarchy_code: Option<HierarchyErrorCode>,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), expected.as_str());
    assert_eq!(error.hierarchy_code(), hierarchy_code);
}

#[test]
fn distance_query_error_display_includes_index() {
    let err = DistanceQueryError::OutOfBounds { index: 5 };
    assert_eq!(format!("{err}"), "index 5 is out of bounds");
}

#[test]
fn hierarchy_error_wraps_query_failures() {
    let inner = DistanceQueryError::DimensionMismatch { left: 2, right: 3 };
    let err = HierarchyError::from(inner.clone());
    assert_eq!(err, HierarchyError::Query { source: inner });
    assert_eq!(
        err.to_string(),
        "distance query failed: dimension mismatch: left=2, right=3"
    );
}

#[test]
fn agglo_error_includes_source_name() {
    let err = AggloError::Hierarchy {
        data_source: Arc::from("dummy"),
        error: HierarchyError::IdTableMismatch {
            expected: 2,
            actual: 1,
        },
    };
    assert_eq!(
        err.to_string(),
        "clustering `dummy` failed: identifier table has 1 entries but the hierarchy has 2 objects"
    );
}
