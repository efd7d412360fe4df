//! First-order linearization of a surrogate month in the two control inputs.
//!
//! [`LinearConstraint::gradient`] stacks five cases of batch row 0
//! (nominal, inflow −1, inflow +1, exports −1, exports +1) into a single
//! [`SurrogateMonth::ann_month`] call and takes central differences.
//! [`formulate_constraint`] turns one output's `(S0, dS/dx, dS/dy)` into the
//! linear-program row `coef_x·x + coef_y·y ≤ rhs` from
//! `S0 + dS/dx·(x − x0) + dS/dy·(y − y0) ≤ target`.
use ndarray::{Array2, ArrayView1};

use crate::{
    surrogate::{
        errors::{SurrogateError, SurrogateResult},
        month::SurrogateMonth,
    },
    utils::{replicate_first_row, validate_control_inputs},
};

/// Column of the nominal value in a gradient row.
pub const VALUE_INDEX: usize = 0;
/// Column of dS/dx (first control input).
pub const D_X_INDEX: usize = 1;
/// Column of dS/dy (second control input).
pub const D_Y_INDEX: usize = 2;

/// Perturbation applied to each control input, in flow units.
pub const PERTURBATION: f64 = 1.0;

/// Coefficients of `coef_x·x + coef_y·y ≤ rhs`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintCoefs {
    pub rhs: f64,
    pub coef_x: f64,
    pub coef_y: f64,
}

impl ConstraintCoefs {
    pub fn new(rhs: f64, coef_x: f64, coef_y: f64) -> Self {
        Self { rhs, coef_x, coef_y }
    }

    /// Component by position: 0 = rhs, 1 = coef_x, 2 = coef_y.
    pub fn component(&self, index: usize) -> Option<f64> {
        match index {
            0 => Some(self.rhs),
            1 => Some(self.coef_x),
            2 => Some(self.coef_y),
            _ => None,
        }
    }

    /// Whether `(x, y)` satisfies the constraint.
    pub fn admits(&self, x: f64, y: f64) -> bool {
        self.coef_x * x + self.coef_y * y <= self.rhs
    }
}

/// Rearrange a gradient row `(S0, dS/dx, dS/dy)` into constraint
/// coefficients around `(x0, y0)`.
pub fn formulate_constraint(grad: ArrayView1<'_, f64>, x0: f64, y0: f64, target: f64) -> ConstraintCoefs {
    let (s0, dx, dy) = (grad[VALUE_INDEX], grad[D_X_INDEX], grad[D_Y_INDEX]);
    ConstraintCoefs { rhs: target - s0 + dx * x0 + dy * y0, coef_x: dx, coef_y: dy }
}

#[derive(Debug, Clone, Copy)]
pub struct LinearConstraint<'a> {
    month: &'a SurrogateMonth,
}

impl<'a> LinearConstraint<'a> {
    pub fn new(month: &'a SurrogateMonth) -> Self {
        Self { month }
    }

    /// Nominal value and central-difference derivatives for every output.
    ///
    /// Returns `(n_out, 3)` with columns [`VALUE_INDEX`], [`D_X_INDEX`] and
    /// [`D_Y_INDEX`]. Only batch row 0 of `inputs` is used.
    ///
    /// # Errors
    /// - [`SurrogateError::InputCountMismatch`] for fewer than two inputs.
    /// - [`SurrogateError::MissingCurrentMonth`] if a control input has no
    ///   lag 0.
    /// - Any error from [`SurrogateMonth::ann_month`].
    #[tracing::instrument(level = "debug", skip_all, fields(year = year, month = month))]
    pub fn gradient(&self, inputs: &[Array2<f64>], year: i32, month: u32) -> SurrogateResult<Array2<f64>> {
        validate_control_inputs(inputs, self.month.n_inputs())?;
        if inputs.iter().any(|x| x.nrows() == 0) {
            return Err(SurrogateError::EmptyBatch);
        }
        let mut cases = replicate_first_row(inputs, 5);
        cases[0][[1, 0]] -= PERTURBATION;
        cases[0][[2, 0]] += PERTURBATION;
        cases[1][[3, 0]] -= PERTURBATION;
        cases[1][[4, 0]] += PERTURBATION;

        let out = self.month.ann_month(&cases, year, month)?;
        let step = 2.0 * PERTURBATION;
        Ok(Array2::from_shape_fn((out.ncols(), 3), |(k, col)| match col {
            VALUE_INDEX => out[[0, k]],
            D_X_INDEX => (out[[2, k]] - out[[1, k]]) / step,
            _ => (out[[4, k]] - out[[3, k]]) / step,
        }))
    }
}
