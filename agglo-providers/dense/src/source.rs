//! In-memory dense rows exposed as a distance query.
use agglo_core::{DistanceQuery, DistanceQueryError};

use crate::metric::DenseMetric;

/// In-memory dense vector data source.
#[derive(Clone, Debug)]
pub struct DenseSource {
    rows: Vec<Vec<f32>>,
    name: String,
    metric: DenseMetric,
}

impl DenseSource {
    /// Creates a dense source after validating uniform dimensions.
    ///
    /// The source measures Euclidean distances until
    /// [`with_metric`](Self::with_metric) selects another metric.
    ///
    /// # Errors
    /// Returns `DistanceQueryError::EmptyData` if `rows` is empty,
    /// `DistanceQueryError::ZeroDimension` if the rows have no columns, and
    /// `DistanceQueryError::DimensionMismatch` if row lengths differ.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::{DistanceQuery, DistanceQueryError};
    /// use agglo_providers_dense::DenseSource;
    ///
    /// let err = DenseSource::try_new("demo", vec![vec![0.0], vec![1.0, 2.0]]);
    /// assert!(matches!(err, Err(DistanceQueryError::DimensionMismatch { .. })));
    /// let err_empty = DenseSource::try_new("demo", vec![]);
    /// assert!(matches!(err_empty, Err(DistanceQueryError::EmptyData)));
    ///
    /// let source = DenseSource::try_new("demo", vec![vec![0.0, 0.0], vec![3.0, 4.0]])?;
    /// assert_eq!(source.distance(0, 1)?, 5.0);
    /// # Ok::<(), DistanceQueryError>(())
    /// ```
    pub fn try_new(
        name: impl Into<String>,
        rows: Vec<Vec<f32>>,
    ) -> Result<Self, DistanceQueryError> {
        let Some((first, rest)) = rows.split_first() else {
            return Err(DistanceQueryError::EmptyData);
        };
        let dimension = first.len();
        if dimension == 0 {
            return Err(DistanceQueryError::ZeroDimension);
        }
        if let Some(row) = rest.iter().find(|row| row.len() != dimension) {
            return Err(DistanceQueryError::DimensionMismatch {
                left: dimension,
                right: row.len(),
            });
        }
        Ok(Self {
            rows,
            name: name.into(),
            metric: DenseMetric::default(),
        })
    }

    /// Replaces the distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: DenseMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Returns the metric used for distances.
    #[must_use]
    pub fn metric(&self) -> DenseMetric {
        self.metric
    }

    /// Returns the shared dimensionality of every row.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    fn row(&self, index: usize) -> Result<&[f32], DistanceQueryError> {
        self.rows
            .get(index)
            .map(Vec::as_slice)
            .ok_or(DistanceQueryError::OutOfBounds { index })
    }
}

impl DistanceQuery for DenseSource {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, i: usize, j: usize) -> Result<f64, DistanceQueryError> {
        let a = self.row(i)?;
        let b = self.row(j)?;
        Ok(self.metric.measure(a, b))
    }

    fn is_squared(&self) -> bool {
        self.metric.is_squared()
    }
}
