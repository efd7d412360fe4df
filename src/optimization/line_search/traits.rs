//! Public API surface for one-dimensional root finding along a line.
//!
//! - [`LineSearchable`]: trait users implement for a multivariate function
//!   whose zero is searched along a line.
//! - [`BrentOptions`]: accuracies and iteration limit of the Brent solver.
//! - [`LineSearch`]: the line `start + z·direction` and the bracket of `z`.
//! - [`RootOutcome`]: normalized result returned by
//!   [`find_root`](crate::optimization::line_search::api::find_root).
//!
//! Convention: the solver drives the *signed* objective
//! `f(z) = eval(start + z·direction)` to zero. Argmin's cost is `|f(z)|`, so
//! "best cost" and "closest to a root" mean the same thing.
use crate::optimization::{
    errors::{OptError, OptResult},
    line_search::validation::{
        validate_bracket, validate_objective, validate_search_vectors, verify_absolute_accuracy,
        verify_function_accuracy, verify_relative_accuracy,
    },
};
use argmin::core::{TerminationReason, TerminationStatus};

/// Default absolute accuracy on `z`.
pub const DEFAULT_ABSOLUTE_ACCURACY: f64 = 1e-6;
/// Default relative accuracy on `z`.
pub const DEFAULT_RELATIVE_ACCURACY: f64 = 1e-5;
/// Default function accuracy on `|f(z)|`.
pub const DEFAULT_FUNCTION_ACCURACY: f64 = 1e-4;
/// Default iteration budget.
pub const DEFAULT_MAX_ITER: usize = 100;

/// User-implemented multivariate function searched along a line.
///
/// Required:
/// - `eval(&[f64]) -> OptResult<f64>`: value at a full point. Return a
///   descriptive `OptError` (usually [`OptError::ObjectiveFailed`]) when the
///   model cannot be evaluated.
pub trait LineSearchable {
    fn eval(&self, point: &[f64]) -> OptResult<f64>;
}

impl<F> LineSearchable for F
where
    F: Fn(&[f64]) -> OptResult<f64>,
{
    fn eval(&self, point: &[f64]) -> OptResult<f64> {
        self(point)
    }
}

/// Accuracies and iteration limit of the Brent root finder.
///
/// - `absolute_accuracy`: `t` in the convergence tolerance `2·eps·|b| + t`.
/// - `relative_accuracy`: `eps` in the same tolerance.
/// - `function_accuracy`: any point with `|f| <= function_accuracy` is a root.
/// - `max_iter`: hard cap on Brent iterations.
/// - `verbose`: attaches a terminal observer when built with `obs_slog`.
///
/// Default: `1e-6`, `1e-5`, `1e-4`, `100`, `false`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrentOptions {
    pub absolute_accuracy: f64,
    pub relative_accuracy: f64,
    pub function_accuracy: f64,
    pub max_iter: usize,
    pub verbose: bool,
}

impl BrentOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`OptError::InvalidAbsoluteAccuracy`] unless finite and `> 0`.
    /// - [`OptError::InvalidRelativeAccuracy`] /
    ///   [`OptError::InvalidFunctionAccuracy`] unless finite and `>= 0`.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        absolute_accuracy: f64, relative_accuracy: f64, function_accuracy: f64, max_iter: usize,
        verbose: bool,
    ) -> OptResult<Self> {
        verify_absolute_accuracy(absolute_accuracy)?;
        verify_relative_accuracy(relative_accuracy)?;
        verify_function_accuracy(function_accuracy)?;
        if max_iter == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { absolute_accuracy, relative_accuracy, function_accuracy, max_iter, verbose })
    }
}

impl Default for BrentOptions {
    fn default() -> Self {
        Self {
            absolute_accuracy: DEFAULT_ABSOLUTE_ACCURACY,
            relative_accuracy: DEFAULT_RELATIVE_ACCURACY,
            function_accuracy: DEFAULT_FUNCTION_ACCURACY,
            max_iter: DEFAULT_MAX_ITER,
            verbose: false,
        }
    }
}

/// A line `start + z·direction` with `z` restricted to `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSearch {
    start: Vec<f64>,
    direction: Vec<f64>,
    min: f64,
    max: f64,
}

impl LineSearch {
    /// # Errors
    /// Propagates [`validate_search_vectors`] and [`validate_bracket`].
    pub fn new(start: Vec<f64>, direction: Vec<f64>, min: f64, max: f64) -> OptResult<Self> {
        validate_search_vectors(&start, &direction)?;
        validate_bracket(min, max)?;
        Ok(Self { start, direction, min, max })
    }

    pub fn start(&self) -> &[f64] {
        &self.start
    }

    pub fn direction(&self) -> &[f64] {
        &self.direction
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Point on the line at `z`.
    pub fn point_at(&self, z: f64) -> Vec<f64> {
        self.start.iter().zip(&self.direction).map(|(s, d)| s + z * d).collect()
    }

    /// Signed objective `f(z)`.
    ///
    /// # Errors
    /// Propagates errors from `problem.eval` and returns
    /// [`OptError::NonFiniteObjective`] for non-finite values.
    pub fn objective<P: LineSearchable + ?Sized>(&self, problem: &P, z: f64) -> OptResult<f64> {
        let value = problem.eval(&self.point_at(z))?;
        validate_objective(z, value)?;
        Ok(value)
    }
}

/// Canonical result returned by `find_root`.
///
/// - `z`: position of the root along the line.
/// - `residual`: `|f(z)|`.
/// - `status`: human-readable termination status.
/// - `iterations`: Brent iterations (0 when a pre-check hit a root).
/// - `evaluations`: objective evaluations, pre-checks included.
#[derive(Debug, Clone, PartialEq)]
pub struct RootOutcome {
    pub z: f64,
    pub residual: f64,
    pub status: String,
    pub iterations: u64,
    pub evaluations: u64,
}

impl RootOutcome {
    /// Root found by one of the endpoint or midpoint pre-checks.
    pub fn from_precheck(z: f64, value: f64, evaluations: u64) -> Self {
        Self {
            z,
            residual: value.abs(),
            status: "Root at bracket probe".to_string(),
            iterations: 0,
            evaluations,
        }
    }

    /// Build an outcome from the final solver state.
    ///
    /// # Errors
    /// - [`OptError::MissingSolution`] if no parameter was recorded.
    /// - [`OptError::NotConverged`] if the iteration budget ran out.
    pub fn from_solver(
        z: Option<f64>, residual: f64, status: TerminationStatus, iterations: u64, evaluations: u64,
    ) -> OptResult<Self> {
        let z = z.ok_or(OptError::MissingSolution)?;
        match status {
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
            | TerminationStatus::Terminated(TerminationReason::TargetCostReached) => {
                Ok(Self { z, residual, status: format!("{status:?}"), iterations, evaluations })
            }
            _ => Err(OptError::NotConverged { iterations, z }),
        }
    }
}
