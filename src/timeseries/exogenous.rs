//! Exogenous daily time series (e.g. tidal range) supplied outside the
//! optimization model's monthly inputs.
//!
//! Some surrogate inputs are not carried by the monthly histories at all;
//! they come from a daily table aligned to the calendar. An
//! [`ExogAssignment`] names the table column and the surrogate input it
//! feeds, and is resolved to numeric indices when the orchestrator is built.
//! Loading the table from disk is the caller's job; [`DailyTable`] is the
//! in-memory form.
use chrono::NaiveDate;

use crate::timeseries::errors::{SeriesError, SeriesResult};

/// Source of calendar-aligned daily data.
pub trait ExogenousSource: Send + Sync {
    /// Column index for a column name, if present.
    fn column_index(&self, name: &str) -> Option<usize>;

    /// `n_day` consecutive values of `column` starting at `start`.
    ///
    /// # Errors
    /// Implementations return [`SeriesError::ExogenousOutOfRange`] when the
    /// request leaves the loaded range and [`SeriesError::ColumnOutOfRange`]
    /// for a bad column.
    fn daily_slice(&self, column: usize, start: NaiveDate, n_day: usize) -> SeriesResult<Vec<f64>>;
}

/// Column-major daily table starting at a fixed date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTable {
    start: NaiveDate,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl DailyTable {
    /// Build a table; all columns must share one length.
    ///
    /// # Errors
    /// - [`SeriesError::RaggedColumns`] if column lengths differ or names and
    ///   columns disagree in count.
    pub fn new(start: NaiveDate, names: Vec<String>, columns: Vec<Vec<f64>>) -> SeriesResult<Self> {
        if names.len() != columns.len() {
            return Err(SeriesError::RaggedColumns {
                expected: names.len(),
                found: columns.len(),
                column: columns.len().min(names.len()),
            });
        }
        let expected = columns.first().map_or(0, Vec::len);
        if let Some((column, col)) = columns.iter().enumerate().find(|(_, c)| c.len() != expected) {
            return Err(SeriesError::RaggedColumns { expected, found: col.len(), column });
        }
        Ok(Self { start, names, columns })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Number of days loaded.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }
}

impl ExogenousSource for DailyTable {
    fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    fn daily_slice(&self, column: usize, start: NaiveDate, n_day: usize) -> SeriesResult<Vec<f64>> {
        let data = self
            .columns
            .get(column)
            .ok_or(SeriesError::ColumnOutOfRange { index: column, n_columns: self.columns.len() })?;
        let offset = start.signed_duration_since(self.start).num_days();
        let out_of_range = || SeriesError::ExogenousOutOfRange {
            start: start.to_string(),
            n_day,
            loaded_from: self.start.to_string(),
            loaded_len: data.len(),
        };
        if offset < 0 {
            return Err(out_of_range());
        }
        let offset = offset as usize;
        if offset + n_day > data.len() {
            return Err(out_of_range());
        }
        Ok(data[offset..offset + n_day].to_vec())
    }
}

/// Binding of an exogenous column to a named surrogate input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExogAssignment {
    pub column: String,
    pub input_name: String,
}

impl ExogAssignment {
    pub fn new(column: impl Into<String>, input_name: impl Into<String>) -> Self {
        Self { column: column.into(), input_name: input_name.into() }
    }

    /// Column index of this assignment in `source`.
    pub fn column_index(&self, source: &dyn ExogenousSource) -> SeriesResult<usize> {
        source
            .column_index(&self.column)
            .ok_or_else(|| SeriesError::UnknownColumn { name: self.column.clone() })
    }
}

/// Assignment after name resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedAssignment {
    pub input_index: usize,
    pub column_index: usize,
}
