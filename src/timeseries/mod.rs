//! timeseries — calendar-correct reshaping between monthly and daily data.
//!
//! Purpose
//! -------
//! Provide the leaf building blocks of the surrogate pipeline: calendar
//! arithmetic over multi-month windows, monthly → daily disaggregation,
//! daily → monthly aggregation, per-day feature transforms and exogenous
//! daily inputs. Nothing here calls a surrogate; the orchestrator in
//! [`crate::surrogate`] composes these pieces.
//!
//! Key behaviors
//! -------------
//! - [`calendar`]: leap-year aware month lengths, window length and the
//!   offset of the current month inside a daily buffer.
//! - [`disaggregate`]: repeat, days-to-ops and spline strategies over a
//!   fixed [`calendar::MonthWindow`].
//! - [`histospline`]: mass-conservative interpolation used by the spline
//!   strategy.
//! - [`aggregate`]: mean, max, max 14-day running mean, n-th smallest and
//!   count-below statistics.
//! - [`features`]: blocked and plain-window daily → feature transforms.
//! - [`exogenous`]: calendar-aligned daily tables and input assignments.
//!
//! Invariants & assumptions
//! ------------------------
//! - Monthly rows are reverse-chronological (lag 0 = current month); daily
//!   buffers are forward with day 0 = first day of the oldest window month.
//! - Every daily buffer produced for `(year, month)` has exactly
//!   `MonthWindow::n_day(year, month)` entries.
//! - Requests that reach outside the available data fail with a
//!   [`errors::SeriesError`]; nothing wraps around.
//!
//! Conventions
//! -----------
//! - Months are 1-based (`1..=12`), years are `i32`, day indices `usize`.
//! - Fallible operations return [`errors::SeriesResult`].
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own edge cases; the
//!   repeat/mean round trip and spline mass conservation are checked both
//!   here and end to end in `tests/`.

pub mod aggregate;
pub mod calendar;
pub mod disaggregate;
pub mod errors;
pub mod exogenous;
pub mod features;
pub mod histospline;

pub mod prelude {
    pub use super::aggregate::MonthlyAggregator;
    pub use super::calendar::{days_in_month, is_leap_year, MonthWindow};
    pub use super::disaggregate::{Disaggregation, MonthlyDisaggregator};
    pub use super::errors::{SeriesError, SeriesResult};
    pub use super::exogenous::{DailyTable, ExogAssignment, ExogenousSource};
    pub use super::features::DailyToSurrogate;
}
