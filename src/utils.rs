//! Helpers shared by the orchestrator, the control layer and the manager for
//! handling batches of monthly inputs.
use ndarray::Array2;

use crate::surrogate::{
    errors::{SurrogateError, SurrogateResult},
    types::MonthlyInputs,
};

/// Check that `inputs` has `n_inputs` entries sharing one non-empty batch.
///
/// Returns the batch size.
///
/// # Errors
/// - [`SurrogateError::InputCountMismatch`] for a wrong number of inputs.
/// - [`SurrogateError::EmptyBatch`] if the batch is empty.
/// - [`SurrogateError::BatchSizeMismatch`] for the first disagreeing input.
pub fn validate_monthly_inputs(inputs: &[Array2<f64>], n_inputs: usize) -> SurrogateResult<usize> {
    if inputs.len() != n_inputs {
        return Err(SurrogateError::InputCountMismatch { expected: n_inputs, found: inputs.len() });
    }
    let batch = inputs.first().map_or(0, Array2::nrows);
    if batch == 0 {
        return Err(SurrogateError::EmptyBatch);
    }
    for (input, x) in inputs.iter().enumerate() {
        if x.nrows() != batch {
            return Err(SurrogateError::BatchSizeMismatch {
                input,
                expected: batch,
                found: x.nrows(),
            });
        }
    }
    Ok(batch)
}

/// Check that the two control inputs exist and carry a current-month value
/// in batch row 0.
///
/// # Errors
/// - [`SurrogateError::InputCountMismatch`] for fewer than two inputs.
/// - [`SurrogateError::EmptyBatch`] if a control input has no rows.
/// - [`SurrogateError::MissingCurrentMonth`] if a control input has no lags.
pub fn validate_control_inputs(inputs: &[Array2<f64>], n_inputs: usize) -> SurrogateResult<()> {
    if inputs.len() < 2 {
        return Err(SurrogateError::InputCountMismatch { expected: n_inputs, found: inputs.len() });
    }
    for (input, x) in inputs[..2].iter().enumerate() {
        if x.nrows() == 0 {
            return Err(SurrogateError::EmptyBatch);
        }
        if x.ncols() == 0 {
            return Err(SurrogateError::MissingCurrentMonth { input });
        }
    }
    Ok(())
}

/// Current-month value (batch 0, lag 0) of every input.
///
/// Inputs with no rows or no lags contribute `NaN`, which never equals a
/// real value in a bitwise key comparison except another such `NaN`.
pub fn latest_values(inputs: &[Array2<f64>]) -> Vec<f64> {
    inputs.iter().map(|x| x.get((0, 0)).copied().unwrap_or(f64::NAN)).collect()
}

/// Batch row 0 of every input, replicated `n` times.
pub fn replicate_first_row(inputs: &[Array2<f64>], n: usize) -> MonthlyInputs {
    inputs
        .iter()
        .map(|x| {
            let row = x.row(0);
            Array2::from_shape_fn((n, row.len()), |(_, lag)| row[lag])
        })
        .collect()
}

/// Copy of `inputs` with the current-month value of batch row 0 of the two
/// control inputs replaced by `x0` and `x1`.
pub fn with_controls(inputs: &[Array2<f64>], x0: f64, x1: f64) -> MonthlyInputs {
    let mut out: MonthlyInputs = inputs.to_vec();
    for (k, value) in [x0, x1].into_iter().enumerate() {
        if let Some(cell) = out.get_mut(k).and_then(|x| x.get_mut((0, 0))) {
            *cell = value;
        }
    }
    out
}

/// `n` evenly spaced points from `lo` to `hi` inclusive; `n == 1` gives `[lo]`.
pub fn even_grid(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => (0..n).map(|i| lo + (i as f64) / ((n - 1) as f64) * (hi - lo)).collect(),
    }
}
