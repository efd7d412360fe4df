//! Monthly → daily disaggregation strategies.
//!
//! Every strategy consumes one reverse-chronological monthly row (lag 0 =
//! current month) and returns a forward daily series covering the
//! [`MonthWindow`] that ends at the requested month. The output length is
//! always the window's calendar length in days.
//!
//! Variants
//! --------
//! - [`Disaggregation::Repeat`]: each day takes its month's value.
//! - [`Disaggregation::DaysToOps`]: the monthly value counts operating days;
//!   the first `round(v)` days of the month take `start_op`, the rest
//!   `end_op`.
//! - [`Disaggregation::Spline`]: mass-conservative histospline sampled once
//!   per day (see [`crate::timeseries::histospline`]).
use crate::timeseries::{
    calendar::{IrregularSeries, MonthWindow},
    errors::{SeriesError, SeriesResult},
    histospline::{Histospline, DEFAULT_FLOOR},
};

/// Strategy used to spread a monthly value over its days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Disaggregation {
    Repeat,
    DaysToOps { start_op: f64, end_op: f64 },
    Spline { floor: f64 },
}

/// A disaggregation strategy bound to a fixed monthly window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyDisaggregator {
    window: MonthWindow,
    kind: Disaggregation,
}

impl MonthlyDisaggregator {
    /// Generic constructor.
    ///
    /// # Errors
    /// - [`SeriesError::EmptyWindow`] if `n_month == 0`.
    /// - [`SeriesError::InvalidTransform`] for non-finite operating values or
    ///   spline floor.
    pub fn new(n_month: usize, kind: Disaggregation) -> SeriesResult<Self> {
        let window = MonthWindow::new(n_month)?;
        match kind {
            Disaggregation::DaysToOps { start_op, end_op }
                if !(start_op.is_finite() && end_op.is_finite()) =>
            {
                return Err(SeriesError::InvalidTransform {
                    reason: "operating values must be finite",
                });
            }
            Disaggregation::Spline { floor } if !floor.is_finite() => {
                return Err(SeriesError::InvalidTransform { reason: "spline floor must be finite" });
            }
            _ => {}
        }
        Ok(Self { window, kind })
    }

    pub fn repeat(n_month: usize) -> SeriesResult<Self> {
        Self::new(n_month, Disaggregation::Repeat)
    }

    pub fn days_to_ops(n_month: usize, start_op: f64, end_op: f64) -> SeriesResult<Self> {
        Self::new(n_month, Disaggregation::DaysToOps { start_op, end_op })
    }

    /// Spline disaggregator with the default density floor.
    pub fn spline(n_month: usize) -> SeriesResult<Self> {
        Self::new(n_month, Disaggregation::Spline { floor: DEFAULT_FLOOR })
    }

    pub fn window(&self) -> MonthWindow {
        self.window
    }

    pub fn kind(&self) -> Disaggregation {
        self.kind
    }

    pub fn n_month(&self) -> usize {
        self.window.n_month()
    }

    /// Length of the daily buffer produced for `(year, month)`.
    pub fn n_day(&self, year: i32, month: u32) -> SeriesResult<usize> {
        self.window.n_day(year, month)
    }

    /// Index of day 1 of the current month inside the daily buffer.
    pub fn offset_first_month(&self, year: i32, month: u32) -> SeriesResult<usize> {
        self.window.offset_first_month(year, month)
    }

    /// Disaggregate one reverse-chronological monthly row.
    ///
    /// # Errors
    /// - [`SeriesError::HistoryTooShort`] / [`SeriesError::NonFiniteMonthly`]
    ///   from the window checks.
    /// - [`SeriesError::InvalidOperatingDays`] when a days-to-ops value does
    ///   not fit in its month.
    pub fn apply(&self, year: i32, month: u32, data_rev: &[f64]) -> SeriesResult<Vec<f64>> {
        let series = self.window.irregular_series(year, month, data_rev)?;
        match self.kind {
            Disaggregation::Repeat => Ok(repeat(&series)),
            Disaggregation::DaysToOps { start_op, end_op } => {
                days_to_ops(&series, start_op, end_op)
            }
            Disaggregation::Spline { floor } => Ok(Histospline::fit(&series, floor)?.daily_means()),
        }
    }
}

fn repeat(series: &IrregularSeries) -> Vec<f64> {
    let mut out = Vec::with_capacity(series.knots.last().copied().unwrap_or(0.0) as usize);
    for i in 0..series.n_month() {
        out.extend(std::iter::repeat(series.values[i]).take(series.month_len(i)));
    }
    out
}

fn days_to_ops(series: &IrregularSeries, start_op: f64, end_op: f64) -> SeriesResult<Vec<f64>> {
    let mut out = Vec::with_capacity(series.knots.last().copied().unwrap_or(0.0) as usize);
    for i in 0..series.n_month() {
        let len = series.month_len(i);
        let v = series.values[i];
        let n_op = v.round();
        if n_op < 0.0 || n_op > len as f64 {
            return Err(SeriesError::InvalidOperatingDays { value: v, days_in_month: len as u32 });
        }
        let n_op = n_op as usize;
        out.extend(std::iter::repeat(start_op).take(n_op));
        out.extend(std::iter::repeat(end_op).take(len - n_op));
    }
    Ok(out)
}
