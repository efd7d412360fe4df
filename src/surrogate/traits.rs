//! The inference-engine seam.
//!
//! A [`Surrogate`] maps per-input feature matrices to per-day outputs. The
//! orchestrator never looks inside; it only relies on the contract below.
use ndarray::Array2;

use crate::{surrogate::errors::SurrogateResult, timeseries::features::DailyToSurrogate};

/// Batched, deterministic surrogate model.
///
/// Contract:
/// - `estimate` receives one matrix per input variable, each of shape
///   `(rows, daily_to_features().feature_len())`, and returns
///   `(rows, n_out)` with row order preserved.
/// - Equal inputs give equal outputs; results are cached on that basis.
/// - `identifier` is stable for the lifetime of the model and distinguishes
///   models in cache keys.
pub trait Surrogate: Send + Sync {
    fn identifier(&self) -> &str;

    /// Number of input variables (monthly histories per call).
    fn n_features(&self) -> usize;

    /// Position of a named input, used to resolve exogenous assignments.
    fn input_index(&self, _name: &str) -> Option<usize> {
        None
    }

    fn daily_to_features(&self) -> &DailyToSurrogate;

    fn estimate(&self, features: &[Array2<f64>]) -> SurrogateResult<Array2<f64>>;
}
