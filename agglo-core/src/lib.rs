//! Agglomerative hierarchical clustering core library.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod agglo;
mod algorithms;
mod builder;
mod cut;
mod error;
mod linkage;
mod matrix;
mod memory;
mod pointer;
mod progress;
mod query;
mod result;

#[cfg(test)]
mod test_utils;

pub use crate::{
    agglo::Agglo,
    algorithms::{
        Agnes, Anderberg, Clink, HdbscanPrim, HdbscanSlink, Medoid, MiniMax, MiniMaxAnderberg,
        MiniMaxNnChain, NnChain, PrototypeObjective, Slink,
    },
    builder::{AggloBuilder, Algorithm},
    cut::{cut_by_count, cut_by_height},
    error::{
        AggloError, AggloErrorCode, DistanceQueryError, DistanceQueryErrorCode, HierarchyError,
        HierarchyErrorCode, Result,
    },
    linkage::Linkage,
    matrix::{MAX_OBJECTS, TriangularMatrix, triangle_size},
    memory::{estimate_peak_bytes, format_bytes},
    pointer::{Merge, PointerHierarchy, PointerHierarchyBuilder},
    progress::{MergeProgress, TracingProgress},
    query::{BruteForceKnn, DistanceQuery, KnnQuery},
    result::{ClusterId, ClusteringResult, ObjectId},
};
