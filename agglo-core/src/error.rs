//! Error types for the agglomerative clustering core.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::DistanceQuery`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DistanceQueryError {
    /// Requested index was outside the query's bounds.
    #[error("index {index} is out of bounds")]
    OutOfBounds {
        /// The requested object that exceeded the query bounds.
        index: usize,
    },
    /// Provided output buffer length did not match number of pairs.
    #[error("output buffer has length {out} but {expected} pairs were given")]
    OutputLengthMismatch {
        /// Caller-provided buffer length.
        out: usize,
        /// Expected number of pairs required for the operation.
        expected: usize,
    },
    /// Compared vectors had different dimensions.
    #[error("dimension mismatch: left={left}, right={right}")]
    DimensionMismatch {
        /// Dimensionality of the left-hand vector.
        left: usize,
        /// Dimensionality of the right-hand vector.
        right: usize,
    },
    /// The query contained no objects.
    #[error("distance query contains no objects")]
    EmptyData,
    /// Vector objects must have positive dimension.
    #[error("distance query vectors must have positive dimension")]
    ZeroDimension,
}

define_error_codes! {
    /// Stable codes describing [`DistanceQueryError`] variants.
    enum DistanceQueryErrorCode for DistanceQueryError {
        /// Requested index was outside the query's bounds.
        OutOfBounds => OutOfBounds { .. } => "DISTANCE_QUERY_OUT_OF_BOUNDS",
        /// Provided output buffer length did not match number of pairs.
        OutputLengthMismatch => OutputLengthMismatch { .. } => "DISTANCE_QUERY_OUTPUT_LENGTH_MISMATCH",
        /// Compared vectors had different dimensions.
        DimensionMismatch => DimensionMismatch { .. } => "DISTANCE_QUERY_DIMENSION_MISMATCH",
        /// The query contained no objects.
        EmptyData => EmptyData => "DISTANCE_QUERY_EMPTY",
        /// Vector objects must have positive dimension.
        ZeroDimension => ZeroDimension => "DISTANCE_QUERY_ZERO_DIMENSION",
    }
}

/// Errors raised while building or post-processing a hierarchy.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum HierarchyError {
    /// The object count exceeds what the triangular matrix may address.
    #[error("{objects} objects exceed the distance matrix limit of {limit}")]
    TooManyObjects {
        /// Number of objects requested.
        objects: usize,
        /// Configured upper bound.
        limit: usize,
    },
    /// The distance query failed while the hierarchy was being built.
    #[error("distance query failed: {source}")]
    Query {
        /// Underlying query error.
        #[from]
        source: DistanceQueryError,
    },
    /// An identifier side table does not cover every object.
    #[error("identifier table has {actual} entries but the hierarchy has {expected} objects")]
    IdTableMismatch {
        /// Number of objects in the hierarchy.
        expected: usize,
        /// Number of identifiers supplied.
        actual: usize,
    },
    /// A flat cut asked for an impossible number of clusters.
    #[error("cannot cut {objects} objects into {requested} clusters")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of objects in the hierarchy.
        objects: usize,
    },
    /// Caller-supplied core distances do not cover every object.
    #[error("expected {expected} core distances but {actual} were supplied")]
    InvalidCoreDistances {
        /// Number of objects in the query.
        expected: usize,
        /// Number of core distances supplied.
        actual: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`HierarchyError`] variants.
    enum HierarchyErrorCode for HierarchyError {
        /// The object count exceeds what the triangular matrix may address.
        TooManyObjects => TooManyObjects { .. } => "HIERARCHY_TOO_MANY_OBJECTS",
        /// The distance query failed while the hierarchy was being built.
        Query => Query { .. } => "HIERARCHY_QUERY_FAILURE",
        /// An identifier side table does not cover every object.
        IdTableMismatch => IdTableMismatch { .. } => "HIERARCHY_ID_TABLE_MISMATCH",
        /// A flat cut asked for an impossible number of clusters.
        InvalidClusterCount => InvalidClusterCount { .. } => "HIERARCHY_INVALID_CLUSTER_COUNT",
        /// Caller-supplied core distances do not cover every object.
        InvalidCoreDistances => InvalidCoreDistances { .. } => "HIERARCHY_INVALID_CORE_DISTANCES",
    }
}

impl HierarchyError {
    /// Retrieve the inner [`DistanceQueryErrorCode`] when the error originated
    /// in a [`crate::DistanceQuery`].
    #[must_use]
    pub const fn query_code(&self) -> Option<DistanceQueryErrorCode> {
        match self {
            Self::Query { source } => Some(source.code()),
            _ => None,
        }
    }
}

/// Error type produced when constructing or running [`crate::Agglo`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AggloError {
    /// `min_pts` must be greater than zero.
    #[error("min_pts must be at least 1 (got {got})")]
    InvalidMinPts {
        /// The invalid value supplied by the caller.
        got: usize,
    },
    /// Flexible-beta linkage needs a finite coefficient.
    #[error("flexible beta coefficient must be finite (got {beta})")]
    InvalidFlexibleBeta {
        /// The rejected coefficient.
        beta: f64,
    },
    /// The object limit must lie within the addressable matrix range.
    #[error("object limit must lie in 1..={max} (got {got})")]
    InvalidObjectLimit {
        /// The rejected limit.
        got: usize,
        /// Largest accepted limit.
        max: usize,
    },
    /// Building the hierarchy failed.
    #[error("clustering `{data_source}` failed: {error}")]
    Hierarchy {
        /// Identifier for the distance query that was being clustered.
        data_source: Arc<str>,
        #[source]
        /// Underlying hierarchy error.
        error: HierarchyError,
    },
}

define_error_codes! {
    /// Stable codes describing [`AggloError`] variants.
    enum AggloErrorCode for AggloError {
        /// `min_pts` must be greater than zero.
        InvalidMinPts => InvalidMinPts { .. } => "AGGLO_INVALID_MIN_PTS",
        /// Flexible-beta linkage needs a finite coefficient.
        InvalidFlexibleBeta => InvalidFlexibleBeta { .. } => "AGGLO_INVALID_FLEXIBLE_BETA",
        /// The object limit must lie within the addressable matrix range.
        InvalidObjectLimit => InvalidObjectLimit { .. } => "AGGLO_INVALID_OBJECT_LIMIT",
        /// Building the hierarchy failed.
        HierarchyFailure => Hierarchy { .. } => "AGGLO_HIERARCHY_FAILURE",
    }
}

impl AggloError {
    /// Retrieve the inner [`HierarchyErrorCode`] when the error originated
    /// while building the hierarchy.
    #[must_use]
    pub const fn hierarchy_code(&self) -> Option<HierarchyErrorCode> {
        match self {
            Self::Hierarchy { error, .. } => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the orchestration API.
pub type Result<T> = core::result::Result<T, AggloError>;
