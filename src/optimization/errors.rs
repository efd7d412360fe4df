use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for root-finding operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- BrentOptions ----
    /// Absolute accuracy needs to be positive and finite.
    InvalidAbsoluteAccuracy { tol: f64, reason: &'static str },
    /// Relative accuracy needs to be non-negative and finite.
    InvalidRelativeAccuracy { tol: f64, reason: &'static str },
    /// Function accuracy needs to be non-negative and finite.
    InvalidFunctionAccuracy { tol: f64, reason: &'static str },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter { max_iter: usize, reason: &'static str },

    // ---- Line search setup ----
    /// Search bracket must be finite with `min < max`.
    InvalidBracket { min: f64, max: f64, reason: &'static str },
    /// Start point and direction must have the same length.
    DirectionMismatch { start: usize, direction: usize },
    /// Start point or direction contains a non-finite entry.
    InvalidSearchVector { index: usize, value: f64 },

    // ---- Objective ----
    /// Objective returned a non-finite value.
    NonFiniteObjective { z: f64, value: f64 },
    /// Objective failed for a reason outside the optimizer.
    ObjectiveFailed { text: String },

    // ---- Root finder outcome ----
    /// Neither half of the bracket shows a sign change.
    NoBracketingValues { f_min: f64, f_mid: f64, f_max: f64 },
    /// Iteration budget exhausted before convergence.
    NotConverged { iterations: u64, z: f64 },
    /// Solver finished without a best parameter.
    MissingSolution,

    // ---- Argmin ----
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter { text: String },
    /// Wrapper for argmin::NotImplemented
    NotImplemented { text: String },
    /// Wrapper for argmin::NotInitialized
    NotInitialized { text: String },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated { text: String },
    /// Wrapper for argmin::CheckpointNotFound
    CheckPointNotFound { text: String },
    /// Wrapper for argmin::PotentialBug
    PotentialBug { text: String },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError { text: String },
    /// Wrapper for other argmin::Error types
    BackendError { text: String },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- BrentOptions ----
            OptError::InvalidAbsoluteAccuracy { tol, reason } => {
                write!(f, "Invalid absolute accuracy {tol}: {reason}")
            }
            OptError::InvalidRelativeAccuracy { tol, reason } => {
                write!(f, "Invalid relative accuracy {tol}: {reason}")
            }
            OptError::InvalidFunctionAccuracy { tol, reason } => {
                write!(f, "Invalid function accuracy {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }

            // ---- Line search setup ----
            OptError::InvalidBracket { min, max, reason } => {
                write!(f, "Invalid search bracket [{min}, {max}]: {reason}")
            }
            OptError::DirectionMismatch { start, direction } => {
                write!(
                    f,
                    "Search direction length {direction} does not match start point length {start}"
                )
            }
            OptError::InvalidSearchVector { index, value } => {
                write!(f, "Non-finite search vector entry at index {index}: {value}")
            }

            // ---- Objective ----
            OptError::NonFiniteObjective { z, value } => {
                write!(f, "Non-finite objective value {value} at z = {z}")
            }
            OptError::ObjectiveFailed { text } => {
                write!(f, "Objective evaluation failed: {text}")
            }

            // ---- Root finder outcome ----
            OptError::NoBracketingValues { f_min, f_mid, f_max } => {
                write!(
                    f,
                    "No bracketing values: f(min) = {f_min}, f(mid) = {f_mid}, f(max) = {f_max}"
                )
            }
            OptError::NotConverged { iterations, z } => {
                write!(f, "Root finder did not converge after {iterations} iterations (z = {z})")
            }
            OptError::MissingSolution => {
                write!(f, "Root finder returned no solution")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        // Errors raised by the objective travel through argmin boxed; unwrap
        // them first so callers see the original variant.
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}
