pub(crate) use super::{DenseMatrixProvider, DenseMatrixProviderError, DenseMetric, DenseSource};

mod provider;
mod support;
