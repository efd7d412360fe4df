//! control — inverse and linearized views of a surrogate month.
//!
//! Purpose
//! -------
//! Turn the forward monthly model into what a linear-programming planning
//! model can use: the control value that meets a salinity target
//! ([`inverse`]) and a locally linear constraint on the two controls
//! ([`linear`]).
//!
//! Key behaviors
//! -------------
//! - [`inverse::InverseSurrogateMonth::invert`] roots the monthly statistic
//!   along inflow or exports with the Brent line search.
//! - [`linear::LinearConstraint::gradient`] computes value and derivatives
//!   for every output with one batched surrogate call.
//! - [`linear::formulate_constraint`] produces `(rhs, coef_x, coef_y)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs 0 and 1 are the controls; only batch row 0 is read.
//! - Callers' inputs are never modified.
//!
//! Conventions
//! -----------
//! - Infeasible inversions are reported through ±999999 sentinels by
//!   [`inverse::InverseSurrogateMonth::required_value`]; a bracket without a
//!   sign change is an error.

pub mod inverse;
pub mod linear;

pub mod prelude {
    pub use super::inverse::{InverseSurrogateMonth, OUT_OF_RANGE_SENTINEL};
    pub use super::linear::{formulate_constraint, ConstraintCoefs, LinearConstraint};
}
