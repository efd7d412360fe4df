//! surrogate — monthly orchestration of a daily machine-learned model.
//!
//! Purpose
//! -------
//! Let a monthly planning model query a daily surrogate as if it produced
//! monthly scalars. The [`month::SurrogateMonth`] orchestrator owns the
//! full monthly → daily → surrogate → monthly round trip.
//!
//! Key behaviors
//! -------------
//! - [`traits::Surrogate`] is the seam to the inference engine: batched,
//!   deterministic and row-order preserving.
//! - [`month::SurrogateMonth::ann_month`] issues exactly one surrogate call
//!   per invocation, whatever the batch size.
//! - [`month::SurrogateMonth::evaluate_on_grid`] evaluates the two control
//!   inputs on an even grid in one call and returns a [`types::GridResult`].
//! - [`mock::MockSurrogate`] is an analytic surrogate for tests and demos.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs 0 and 1 of every surrogate are the two control variables (e.g.
//!   inflow and exports); grid evaluation and linearization rely on this.
//! - Monthly inputs are reverse-chronological with lag 0 the current month.
//!
//! Conventions
//! -----------
//! - Fallible operations return [`errors::SurrogateResult`]; errors from
//!   the time-series layer and the root finder are wrapped, not flattened.
//!
//! Testing notes
//! -------------
//! - Orchestrator tests use a linear surrogate with repeat disaggregation so
//!   expected monthly values are exact; the mock is checked against
//!   hand-computed kernel values.

pub mod errors;
pub mod mock;
pub mod month;
pub mod traits;
pub mod types;

pub mod prelude {
    pub use super::errors::{SurrogateError, SurrogateResult};
    pub use super::mock::MockSurrogate;
    pub use super::month::SurrogateMonth;
    pub use super::traits::Surrogate;
    pub use super::types::{GridResult, MonthlyHistory, MonthlyInputs};
}
