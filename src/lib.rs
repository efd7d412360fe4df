//! salinity_surrogate — monthly planning interface to daily salinity surrogates.
//!
//! Purpose
//! -------
//! Let a monthly water-allocation model use a daily machine-learned salinity
//! surrogate. Monthly inputs are disaggregated to daily series, fed to the
//! surrogate, and the daily output is reduced back to monthly statistics;
//! on top of that sit inversion (flow needed to meet a target),
//! linearization (constraint coefficients) and a cached manager that the
//! optimization model calls by location code.
//!
//! Key behaviors
//! -------------
//! - [`timeseries`]: calendar windows, monthly → daily disaggregation
//!   (repeat, operating days, mass-conserving spline), daily → monthly
//!   aggregation, daily feature transforms and exogenous daily tables.
//! - [`surrogate`]: the [`surrogate::traits::Surrogate`] seam and the
//!   [`surrogate::month::SurrogateMonth`] orchestrator.
//! - [`optimization`]: bracketed Brent root finding along a line, run
//!   through `argmin`.
//! - [`control`]: inversion and linearization of a surrogate month in its
//!   two control inputs.
//! - [`manager`]: registry, LRU evaluation caches and the
//!   [`manager::service::SalinityManager`] call surface.
//!
//! Invariants & assumptions
//! ------------------------
//! - Monthly histories are reverse-chronological (lag 0 = current month);
//!   daily buffers are chronological.
//! - Inputs 0 and 1 of every surrogate are the two control flows.
//! - Surrogates are deterministic and preserve batch row order.
//!
//! Conventions
//! -----------
//! - Each module family has its own error enum and `XResult` alias; errors
//!   from lower layers are wrapped, not flattened.
//! - Diagnostics go through `tracing`; the crate never installs a
//!   subscriber.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to the code; `tests/` runs the full pipeline
//!   against analytic surrogates.

pub mod control;
pub mod manager;
pub mod optimization;
pub mod surrogate;
pub mod timeseries;
pub mod utils;
