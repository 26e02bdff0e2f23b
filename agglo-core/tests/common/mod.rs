use agglo_core::{DistanceQuery, DistanceQueryError};

/// Points on a line measured by absolute difference.
#[derive(Clone)]
pub struct Line {
    name: &'static str,
    data: Vec<f64>,
}

impl Line {
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self { name: "line", data }
    }

    /// Same points, but reporting one object more than it can measure so the
    /// last lookup fails.
    #[must_use]
    pub fn broken(data: Vec<f64>) -> Broken {
        Broken(Self {
            name: "broken",
            data,
        })
    }
}

impl DistanceQuery for Line {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn name(&self) -> &str {
        self.name
    }

    fn distance(&self, i: usize, j: usize) -> Result<f64, DistanceQueryError> {
        let a = self
            .data
            .get(i)
            .ok_or(DistanceQueryError::OutOfBounds { index: i })?;
        let b = self
            .data
            .get(j)
            .ok_or(DistanceQueryError::OutOfBounds { index: j })?;
        Ok((a - b).abs())
    }
}

pub struct Broken(Line);

impl DistanceQuery for Broken {
    fn len(&self) -> usize {
        self.0.len() + 1
    }

    fn name(&self) -> &str {
        self.0.name()
    }

    fn distance(&self, i: usize, j: usize) -> Result<f64, DistanceQueryError> {
        self.0.distance(i, j)
    }
}
