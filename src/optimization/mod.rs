//! optimization — root finding along a line and its error surface.
//!
//! Purpose
//! -------
//! Provide the numerical solver used by surrogate inversion: an
//! Argmin-backed Brent root finder that works on any function of a full
//! input vector restricted to a line, plus a single error/result surface.
//!
//! Key behaviors
//! -------------
//! - [`line_search`] exposes [`line_search::find_root`], its options and the
//!   [`line_search::LineSearchable`] trait callers implement.
//! - [`errors::OptError`] normalizes option mistakes, failed brackets,
//!   objective failures and backend solver errors, with [`errors::OptResult`]
//!   as the common alias.
//!
//! Invariants & assumptions
//! ------------------------
//! - Invalid configurations are rejected when options are built, never
//!   mid-search.
//! - Non-finite objective values abort a search with
//!   [`errors::OptError::NonFiniteObjective`] instead of steering Brent.
//!
//! Conventions
//! -----------
//! - Public entrypoints return `OptResult<T>`; callers never see raw argmin
//!   errors. Errors raised by an objective inside the argmin loop are
//!   recovered with their original variant.
//! - Progress reporting goes through `tracing` events; the optional
//!   `obs_slog` feature adds argmin's own terminal observer.
//!
//! Downstream usage
//! ----------------
//! - [`crate::control::inverse`] wraps a surrogate month as a
//!   [`line_search::LineSearchable`] and maps the root back to a flow.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the bare solver on a classic cubic, bracket probing,
//!   the circle/diagonal root and error recovery through argmin.

pub mod errors;
pub mod line_search;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::line_search::{find_root, BrentOptions, LineSearch, LineSearchable, RootOutcome};
}
