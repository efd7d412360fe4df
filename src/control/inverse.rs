//! Inversion of a surrogate month along one control input.
//!
//! Answers "which value of input `k` (inflow or exports) makes the monthly
//! statistic hit its target?" by rooting
//! `ann_month(inputs with x_k = z)[0][output] − target` along `z` with
//! [`find_root`]. The other control input stays at its current nominal
//! value (batch 0, lag 0). Work happens on a private copy of the inputs.
use std::cell::RefCell;

use ndarray::Array2;
use tracing::debug;

use crate::{
    optimization::{
        errors::{OptError, OptResult},
        line_search::{find_root, BrentOptions, LineSearch, LineSearchable},
    },
    surrogate::{
        errors::{SurrogateError, SurrogateResult},
        month::SurrogateMonth,
        types::MonthlyInputs,
    },
    utils::validate_control_inputs,
};

/// Reported by [`InverseSurrogateMonth::required_value`] when the root lies
/// outside the search bounds.
pub const OUT_OF_RANGE_SENTINEL: f64 = 999_999.0;

/// Surrogate month wrapped as a line-search objective.
struct MonthObjective<'a> {
    month: &'a SurrogateMonth,
    inputs: RefCell<MonthlyInputs>,
    target: f64,
    year: i32,
    month_of_year: u32,
    output_index: usize,
    failure: RefCell<Option<SurrogateError>>,
}

impl MonthObjective<'_> {
    fn fail(&self, err: SurrogateError) -> OptError {
        let text = err.to_string();
        self.failure.borrow_mut().get_or_insert(err);
        OptError::ObjectiveFailed { text }
    }
}

impl LineSearchable for MonthObjective<'_> {
    fn eval(&self, point: &[f64]) -> OptResult<f64> {
        let output = {
            let mut inputs = self.inputs.borrow_mut();
            inputs[0][[0, 0]] = point[0];
            inputs[1][[0, 0]] = point[1];
            self.month.ann_month(&inputs, self.year, self.month_of_year)
        };
        let output = output.map_err(|e| self.fail(e))?;
        match output.get((0, self.output_index)) {
            Some(value) => Ok(value - self.target),
            None => Err(self.fail(SurrogateError::OutputIndexOutOfRange {
                index: self.output_index,
                n_out: output.ncols(),
            })),
        }
    }
}

/// Inverse view of a [`SurrogateMonth`].
#[derive(Debug, Clone)]
pub struct InverseSurrogateMonth<'a> {
    month: &'a SurrogateMonth,
    opts: BrentOptions,
    sentinel: f64,
}

impl<'a> InverseSurrogateMonth<'a> {
    pub fn new(month: &'a SurrogateMonth) -> Self {
        Self::with_options(month, BrentOptions::default())
    }

    pub fn with_options(month: &'a SurrogateMonth, opts: BrentOptions) -> Self {
        Self { month, opts, sentinel: OUT_OF_RANGE_SENTINEL }
    }

    /// Report out-of-range roots as `±sentinel` instead of `±999999`.
    pub fn with_sentinel(self, sentinel: f64) -> Self {
        Self { sentinel, ..self }
    }

    /// Value of control input `search_index` in `[lo, hi]` at which output
    /// `output_index` of batch row 0 equals `target`.
    ///
    /// # Errors
    /// - [`SurrogateError::InvalidControlIndex`] unless `search_index` is 0 or 1.
    /// - [`SurrogateError::Optimization`] wrapping
    ///   [`OptError::NoBracketingValues`] when the bracket holds no sign
    ///   change, or any other root-finder failure.
    /// - The first error raised by the surrogate month, unchanged.
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(level = "debug", skip_all, fields(target = target, search_index = search_index, lo = lo, hi = hi))]
    pub fn invert(
        &self, target: f64, inputs: &[Array2<f64>], search_index: usize, lo: f64, hi: f64,
        year: i32, month: u32, output_index: usize,
    ) -> SurrogateResult<f64> {
        if search_index > 1 {
            return Err(SurrogateError::InvalidControlIndex { index: search_index });
        }
        validate_control_inputs(inputs, self.month.n_inputs())?;
        let fixed_index = (search_index + 1) % 2;
        let mut start = vec![0.0; 2];
        start[fixed_index] = inputs[fixed_index].get((0, 0)).copied().ok_or(SurrogateError::EmptyBatch)?;
        let mut direction = vec![0.0; 2];
        direction[search_index] = 1.0;
        let line = LineSearch::new(start, direction, lo, hi)?;

        let objective = MonthObjective {
            month: self.month,
            inputs: RefCell::new(inputs.to_vec()),
            target,
            year,
            month_of_year: month,
            output_index,
            failure: RefCell::new(None),
        };
        match find_root(&objective, &line, &self.opts) {
            Ok(outcome) => {
                debug!(z = outcome.z, iterations = outcome.iterations, "inverted");
                Ok(outcome.z)
            }
            Err(err) => Err(objective.failure.take().unwrap_or(SurrogateError::Optimization(err))),
        }
    }

    /// [`InverseSurrogateMonth::invert`], with roots above `hi` reported as
    /// `+sentinel` and below `lo` as `−sentinel` (999999 unless set with
    /// [`InverseSurrogateMonth::with_sentinel`]).
    ///
    /// # Errors
    /// As [`InverseSurrogateMonth::invert`]; a failed bracket is still an error.
    #[allow(clippy::too_many_arguments)]
    pub fn required_value(
        &self, target: f64, inputs: &[Array2<f64>], search_index: usize, lo: f64, hi: f64,
        year: i32, month: u32, output_index: usize,
    ) -> SurrogateResult<f64> {
        let z = self.invert(target, inputs, search_index, lo, hi, year, month, output_index)?;
        Ok(if z > hi {
            self.sentinel
        } else if z < lo {
            -self.sentinel
        } else {
            z
        })
    }
}
