//! Error surface of the surrogate orchestrator and the control layer.
//!
//! Shape problems are detected before any surrogate call; wrapped
//! [`SeriesError`] and [`OptError`] values keep their original variant so
//! callers can match on e.g. `OptError::NoBracketingValues`.
use crate::{optimization::errors::OptError, timeseries::errors::SeriesError};

/// Result alias for surrogate and control operations.
pub type SurrogateResult<T> = Result<T, SurrogateError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SurrogateError {
    // ---- Input shapes ----
    /// Number of monthly inputs does not match the orchestrator.
    InputCountMismatch { expected: usize, found: usize },
    /// Monthly inputs disagree on batch size.
    BatchSizeMismatch { input: usize, expected: usize, found: usize },
    /// Batch dimension is zero.
    EmptyBatch,
    /// Feature matrix handed to a surrogate has the wrong shape.
    FeatureShape { input: usize, expected: (usize, usize), found: (usize, usize) },
    /// Surrogate output does not have one row per batch day.
    OutputRows { expected: usize, found: usize },
    /// Surrogate produced no output columns.
    NoOutputs,
    /// Requested output column does not exist.
    OutputIndexOutOfRange { index: usize, n_out: usize },
    /// Control input index outside `0..=1`.
    InvalidControlIndex { index: usize },
    /// Control input has no current-month (lag 0) column.
    MissingCurrentMonth { input: usize },

    // ---- Construction ----
    /// Every input is exogenous, so there is no window to follow.
    NoDisaggregators,
    /// Disaggregators cover different numbers of months.
    WindowMismatch { input: usize, expected: usize, found: usize },
    /// Assignment names an input the surrogate does not know.
    UnknownInput { name: String },
    /// Input has neither a disaggregator nor an exogenous assignment.
    UnassignedInput { input: usize },
    /// Grid request is malformed.
    InvalidGrid { reason: &'static str },

    // ---- Surrogate ----
    /// Inference engine failed.
    EstimateFailed { text: String },

    // ---- Wrapped ----
    Series(SeriesError),
    Optimization(OptError),
}

impl std::error::Error for SurrogateError {}

impl std::fmt::Display for SurrogateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input shapes ----
            SurrogateError::InputCountMismatch { expected, found } => {
                write!(f, "Expected {expected} monthly inputs, found {found}")
            }
            SurrogateError::BatchSizeMismatch { input, expected, found } => {
                write!(f, "Input {input} has batch size {found}, expected {expected}")
            }
            SurrogateError::EmptyBatch => write!(f, "Monthly inputs have an empty batch"),
            SurrogateError::FeatureShape { input, expected, found } => {
                write!(
                    f,
                    "Feature matrix {input} has shape {found:?}, expected {expected:?}"
                )
            }
            SurrogateError::OutputRows { expected, found } => {
                write!(f, "Surrogate returned {found} rows, expected {expected}")
            }
            SurrogateError::NoOutputs => write!(f, "Surrogate returned no output columns"),
            SurrogateError::OutputIndexOutOfRange { index, n_out } => {
                write!(f, "Output index {index} out of range for {n_out} outputs")
            }
            SurrogateError::InvalidControlIndex { index } => {
                write!(f, "Control input index {index} must be 0 or 1")
            }
            SurrogateError::MissingCurrentMonth { input } => {
                write!(f, "Control input {input} has no current-month column")
            }

            // ---- Construction ----
            SurrogateError::NoDisaggregators => {
                write!(f, "At least one input needs a monthly disaggregator")
            }
            SurrogateError::WindowMismatch { input, expected, found } => {
                write!(
                    f,
                    "Disaggregator for input {input} spans {found} months, expected {expected}"
                )
            }
            SurrogateError::UnknownInput { name } => {
                write!(f, "Surrogate has no input named '{name}'")
            }
            SurrogateError::UnassignedInput { input } => {
                write!(f, "Input {input} has no disaggregator and no exogenous assignment")
            }
            SurrogateError::InvalidGrid { reason } => write!(f, "Invalid grid: {reason}"),

            // ---- Surrogate ----
            SurrogateError::EstimateFailed { text } => {
                write!(f, "Surrogate estimate failed: {text}")
            }

            // ---- Wrapped ----
            SurrogateError::Series(err) => write!(f, "Time series error: {err}"),
            SurrogateError::Optimization(err) => write!(f, "Optimization error: {err}"),
        }
    }
}

impl From<SeriesError> for SurrogateError {
    fn from(err: SeriesError) -> Self {
        SurrogateError::Series(err)
    }
}

impl From<OptError> for SurrogateError {
    fn from(err: OptError) -> Self {
        SurrogateError::Optimization(err)
    }
}
