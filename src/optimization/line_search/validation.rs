//! Validation helpers for the Brent line search.
//!
//! - **Accuracy checks**: [`verify_absolute_accuracy`],
//!   [`verify_relative_accuracy`] and [`verify_function_accuracy`] reject
//!   non-finite or out-of-range tolerances before a solver is built.
//! - **Search setup**: [`validate_bracket`] and [`validate_search_vectors`]
//!   check the line `start + z·direction` on `[min, max]`.
//! - **Objective values**: [`validate_objective`] rejects non-finite
//!   evaluations at a given `z`.
use crate::optimization::errors::{OptError, OptResult};

/// Validate the absolute accuracy used in the convergence test.
///
/// # Errors
/// Returns [`OptError::InvalidAbsoluteAccuracy`] if the value is non-finite
/// or ≤ 0.0.
pub fn verify_absolute_accuracy(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidAbsoluteAccuracy { tol, reason: "Accuracy must be finite." });
    }
    if tol <= 0.0 {
        return Err(OptError::InvalidAbsoluteAccuracy { tol, reason: "Accuracy must be positive." });
    }
    Ok(())
}

/// Validate the relative accuracy (scaled by |b| in the convergence test).
///
/// # Errors
/// Returns [`OptError::InvalidRelativeAccuracy`] if the value is non-finite
/// or negative.
pub fn verify_relative_accuracy(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidRelativeAccuracy { tol, reason: "Accuracy must be finite." });
    }
    if tol < 0.0 {
        return Err(OptError::InvalidRelativeAccuracy {
            tol,
            reason: "Accuracy must be non-negative.",
        });
    }
    Ok(())
}

/// Validate the function accuracy (|f| below which a point is a root).
///
/// # Errors
/// Returns [`OptError::InvalidFunctionAccuracy`] if the value is non-finite
/// or negative.
pub fn verify_function_accuracy(tol: f64) -> OptResult<()> {
    if !tol.is_finite() {
        return Err(OptError::InvalidFunctionAccuracy { tol, reason: "Accuracy must be finite." });
    }
    if tol < 0.0 {
        return Err(OptError::InvalidFunctionAccuracy {
            tol,
            reason: "Accuracy must be non-negative.",
        });
    }
    Ok(())
}

/// Validate a search bracket `[min, max]`.
///
/// # Errors
/// Returns [`OptError::InvalidBracket`] if either end is non-finite or
/// `min >= max`.
pub fn validate_bracket(min: f64, max: f64) -> OptResult<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(OptError::InvalidBracket { min, max, reason: "Bracket ends must be finite." });
    }
    if min >= max {
        return Err(OptError::InvalidBracket { min, max, reason: "Bracket requires min < max." });
    }
    Ok(())
}

/// Validate the start point and direction of a line.
///
/// # Errors
/// - [`OptError::DirectionMismatch`] if lengths differ.
/// - [`OptError::InvalidSearchVector`] for the first non-finite entry,
///   start point first.
pub fn validate_search_vectors(start: &[f64], direction: &[f64]) -> OptResult<()> {
    if start.len() != direction.len() {
        return Err(OptError::DirectionMismatch { start: start.len(), direction: direction.len() });
    }
    for (index, &value) in start.iter().chain(direction.iter()).enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidSearchVector { index: index % start.len(), value });
        }
    }
    Ok(())
}

/// Validate that an objective value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteObjective`] for `NaN` or `±∞`.
pub fn validate_objective(z: f64, value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteObjective { z, value });
    }
    Ok(())
}
