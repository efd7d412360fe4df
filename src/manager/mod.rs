//! manager — the call surface a monthly optimization model talks to.
//!
//! Purpose
//! -------
//! Route queries from a planning model, identified by integer location and
//! averaging-type codes, to registered surrogate months, and memoize the
//! results so repeated solver iterations do not re-run the surrogate.
//!
//! Key behaviors
//! -------------
//! - [`registry::SurrogateRegistry`] maps `(location, ave_type)` to a shared
//!   [`crate::surrogate::month::SurrogateMonth`] and each location to the
//!   surrogate output column it reads.
//! - [`cache::EvaluationCache`] keeps five bounded LRU tables (constraints,
//!   gradients, monthly outputs, grids, required flows) keyed by
//!   [`key::EvaluationKey`].
//! - [`service::SalinityManager`] answers `ann_ec`, `line_gen` and
//!   `required_flow`; [`feasibility::Feasibility`] classifies the coarse
//!   grid that `line_gen` starts from.
//!
//! Invariants & assumptions
//! ------------------------
//! - Cache keys carry only the current-month values of the inputs, so two
//!   calls that differ only in older lags share an entry.
//! - Floating-point key fields compare by bit pattern.
//! - Aggregation parameters never mutate a registered month; a reconfigured
//!   copy is evaluated instead.
//!
//! Conventions
//! -----------
//! - Every lock is taken for a single map operation. A poisoned lock is
//!   reported as [`errors::ManagerError::CachePoisoned`].
//! - Months are `u32` in `1..=12`; years are calendar years.
//!
//! Testing notes
//! -------------
//! - Service tests run the analytic mock with repeat disaggregation, where
//!   monthly statistics reduce to closed-form kernel values.

pub mod cache;
pub mod errors;
pub mod feasibility;
pub mod key;
pub mod options;
pub mod registry;
pub mod service;

pub mod prelude {
    pub use super::cache::{EvaluationCache, LruCache};
    pub use super::errors::{ManagerError, ManagerResult};
    pub use super::feasibility::Feasibility;
    pub use super::key::EvaluationKey;
    pub use super::options::{GridSpec, ManagerOptions};
    pub use super::registry::{location_code, SurrogateRegistry};
    pub use super::service::SalinityManager;
}
