//! Line-based UTF-8 text provider measuring Levenshtein distance.
use std::io::BufRead;

use agglo_core::{DistanceQuery, DistanceQueryError};
use thiserror::Error;

/// Errors raised while building a [`TextProvider`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TextProviderError {
    /// The input held no lines.
    #[error("text input contains no lines")]
    EmptyInput,
    /// Reading the input failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// UTF-8 lines compared by character-level edit distance.
#[derive(Clone, Debug)]
pub struct TextProvider {
    name: String,
    lines: Vec<String>,
}

impl TextProvider {
    /// Creates a provider over `lines`.
    ///
    /// # Errors
    /// Returns [`TextProviderError::EmptyInput`] when `lines` is empty.
    ///
    /// # Examples
    /// ```
    /// use agglo_core::DistanceQuery;
    /// use agglo_providers_text::TextProvider;
    ///
    /// let provider = TextProvider::new("demo", vec!["kitten".into(), "sitting".into()])?;
    /// assert_eq!(provider.len(), 2);
    /// assert_eq!(provider.distance(0, 1)?, 3.0);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(name: impl Into<String>, lines: Vec<String>) -> Result<Self, TextProviderError> {
        if lines.is_empty() {
            return Err(TextProviderError::EmptyInput);
        }
        Ok(Self {
            name: name.into(),
            lines,
        })
    }

    /// Reads one object per line, stripping `\n` and `\r\n` terminators.
    ///
    /// # Errors
    /// Returns [`TextProviderError::Io`] when reading fails and
    /// [`TextProviderError::EmptyInput`] when no lines were read.
    pub fn try_from_reader<R: BufRead>(
        name: impl Into<String>,
        reader: R,
    ) -> Result<Self, TextProviderError> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        Self::new(name, lines)
    }

    /// Returns the stored lines in input order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn line(&self, index: usize) -> Result<&str, DistanceQueryError> {
        self.lines
            .get(index)
            .map(String::as_str)
            .ok_or(DistanceQueryError::OutOfBounds { index })
    }
}

impl DistanceQuery for TextProvider {
    fn len(&self) -> usize {
        self.lines.len()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, i: usize, j: usize) -> Result<f64, DistanceQueryError> {
        let left = self.line(i)?;
        let right = self.line(j)?;
        Ok(strsim::levenshtein(left, right) as f64)
    }
}
