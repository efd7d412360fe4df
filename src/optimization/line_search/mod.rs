//! line_search — zero of a multivariate function along a line.
//!
//! Purpose
//! -------
//! Solve `f(start + z·direction) = 0` for scalar `z` in a bracket. This is
//! the numerical core behind surrogate inversion: "which value of input `k`
//! makes the monthly salinity statistic hit its target?".
//!
//! Key behaviors
//! -------------
//! - [`api::find_root`] probes the midpoint and both ends of the bracket and
//!   runs Brent's method on whichever half changes sign.
//! - [`solver::BrentZero`] is an `argmin` solver, run through
//!   [`run::run_brent`] with the usual executor, iteration cap and optional
//!   slog observer.
//! - [`adapter::LineAdapter`] turns a [`traits::LineSearchable`] plus a
//!   [`traits::LineSearch`] into an `argmin` cost function.
//!
//! Invariants & assumptions
//! ------------------------
//! - The objective is continuous on the bracket; only a sign change is
//!   required, not monotonicity.
//! - Objective errors abort the search and are returned unchanged.
//!
//! Conventions
//! -----------
//! - Accuracies default to `1e-6` (absolute), `1e-5` (relative) and `1e-4`
//!   (function), with at most 100 Brent iterations.
pub mod adapter;
pub mod api;
pub mod run;
pub mod solver;
pub mod traits;
pub mod validation;

pub use self::{
    api::find_root,
    traits::{BrentOptions, LineSearch, LineSearchable, RootOutcome},
};
