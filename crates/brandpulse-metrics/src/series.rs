//! Chart-ready series shapes shared by the API and CLI report output.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("series '{name}' has {got} values but the chart has {expected} labels")]
    LengthMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
}

/// A label axis with zero or more named, equal-length value series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub series: Vec<NamedSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    pub name: String,
    pub values: Vec<f64>,
}

impl ChartSeries {
    #[must_use]
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            series: Vec::new(),
        }
    }

    /// Adds a series, rejecting any whose length differs from the labels.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::LengthMismatch`] when `values.len()` differs
    /// from `labels.len()`.
    pub fn try_push_series(&mut self, name: &str, values: Vec<f64>) -> Result<(), SeriesError> {
        if values.len() != self.labels.len() {
            return Err(SeriesError::LengthMismatch {
                name: name.to_string(),
                expected: self.labels.len(),
                got: values.len(),
            });
        }
        self.series.push(NamedSeries {
            name: name.to_string(),
            values,
        });
        Ok(())
    }
}
