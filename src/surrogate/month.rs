//! Monthly orchestrator around a daily surrogate.
//!
//! Purpose
//! -------
//! Present a daily surrogate as a monthly model: take reverse-chronological
//! monthly histories for every input, expand them to daily series over the
//! disaggregation window, feed the surrogate one feature vector per day of
//! the current month, and reduce each month of daily output to a scalar.
//!
//! Key behaviors
//! -------------
//! - [`SurrogateMonth::ann_month`] performs exactly one
//!   [`Surrogate::estimate`] call for the whole batch: the feature matrices
//!   stack `batch × days_in_month` rows with a batch row's days contiguous.
//! - Inputs with an exogenous assignment are read from the
//!   [`ExogenousSource`] starting at day 1 of the window's oldest month and
//!   replicated across the batch; the assignment wins over a disaggregator.
//! - [`SurrogateMonth::evaluate_on_grid`] evaluates an even grid of the two
//!   control inputs (inputs 0 and 1) around batch row 0.
//!
//! Invariants & assumptions
//! ------------------------
//! - All disaggregators share one [`MonthWindow`]; the daily buffer has
//!   `n_day(year, month)` entries and the current month starts at
//!   `offset_first_month(year, month)`.
//! - The aggregator sees the month-local slice of daily output
//!   (`days_in_month` values, first month index 0).
//! - Shape errors are raised before the surrogate is called.
//!
//! Conventions
//! -----------
//! - An orchestrator is immutable once built. [`SurrogateMonth::reconfigured`]
//!   returns a copy with another aggregator, which is how per-call
//!   aggregation parameters (rank, threshold) are applied.
use std::sync::Arc;

use ndarray::{s, Array2, Array3, Axis};
use tracing::{debug, trace};

use crate::{
    surrogate::{
        errors::{SurrogateError, SurrogateResult},
        traits::Surrogate,
        types::{GridResult, MonthlyInputs},
    },
    timeseries::{
        aggregate::MonthlyAggregator,
        calendar::{days_in_month, MonthWindow},
        disaggregate::MonthlyDisaggregator,
        exogenous::{ExogAssignment, ExogenousSource, ResolvedAssignment},
    },
    utils::{even_grid, replicate_first_row, validate_control_inputs, validate_monthly_inputs},
};

#[derive(Clone)]
pub struct SurrogateMonth {
    disaggregators: Vec<Option<MonthlyDisaggregator>>,
    aggregator: MonthlyAggregator,
    surrogate: Arc<dyn Surrogate>,
    exogenous: Option<Arc<dyn ExogenousSource>>,
    assignments: Vec<ResolvedAssignment>,
    window: MonthWindow,
}

impl std::fmt::Debug for SurrogateMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurrogateMonth")
            .field("surrogate", &self.surrogate.identifier())
            .field("disaggregators", &self.disaggregators)
            .field("aggregator", &self.aggregator)
            .field("assignments", &self.assignments)
            .field("window", &self.window)
            .finish()
    }
}

impl SurrogateMonth {
    /// Orchestrator whose inputs are all disaggregated monthly histories.
    ///
    /// # Errors
    /// - [`SurrogateError::InputCountMismatch`] if the number of
    ///   disaggregators differs from `surrogate.n_features()`.
    /// - [`SurrogateError::UnassignedInput`] for a `None` disaggregator.
    /// - [`SurrogateError::NoDisaggregators`] / [`SurrogateError::WindowMismatch`]
    ///   when there is no common window.
    pub fn new(
        disaggregators: Vec<Option<MonthlyDisaggregator>>, aggregator: MonthlyAggregator,
        surrogate: Arc<dyn Surrogate>,
    ) -> SurrogateResult<Self> {
        let window = common_window(&disaggregators, surrogate.as_ref())?;
        if let Some(input) = disaggregators.iter().position(Option::is_none) {
            return Err(SurrogateError::UnassignedInput { input });
        }
        Ok(Self {
            disaggregators,
            aggregator,
            surrogate,
            exogenous: None,
            assignments: Vec::new(),
            window,
        })
    }

    /// Orchestrator with some inputs read from an exogenous daily source.
    ///
    /// Assignment names are resolved against the surrogate
    /// ([`Surrogate::input_index`]) and the source's columns.
    ///
    /// # Errors
    /// As [`SurrogateMonth::new`], plus
    /// - [`SurrogateError::UnknownInput`] for an input name the surrogate
    ///   does not resolve (or resolves beyond its input count).
    /// - [`SurrogateError::Series`] wrapping `UnknownColumn`.
    pub fn with_exogenous(
        disaggregators: Vec<Option<MonthlyDisaggregator>>, aggregator: MonthlyAggregator,
        surrogate: Arc<dyn Surrogate>, source: Arc<dyn ExogenousSource>,
        assignments: &[ExogAssignment],
    ) -> SurrogateResult<Self> {
        let window = common_window(&disaggregators, surrogate.as_ref())?;
        let mut resolved = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let input_index = surrogate
                .input_index(&assignment.input_name)
                .filter(|&i| i < disaggregators.len())
                .ok_or_else(|| SurrogateError::UnknownInput { name: assignment.input_name.clone() })?;
            let column_index = assignment.column_index(source.as_ref())?;
            resolved.push(ResolvedAssignment { input_index, column_index });
        }
        for (input, d) in disaggregators.iter().enumerate() {
            if d.is_none() && !resolved.iter().any(|r| r.input_index == input) {
                return Err(SurrogateError::UnassignedInput { input });
            }
        }
        Ok(Self {
            disaggregators,
            aggregator,
            surrogate,
            exogenous: Some(source),
            assignments: resolved,
            window,
        })
    }

    /// Copy of this orchestrator with a different aggregator.
    pub fn reconfigured(&self, aggregator: MonthlyAggregator) -> Self {
        Self { aggregator, ..self.clone() }
    }

    pub fn aggregator(&self) -> MonthlyAggregator {
        self.aggregator
    }

    pub fn surrogate(&self) -> &Arc<dyn Surrogate> {
        &self.surrogate
    }

    pub fn n_inputs(&self) -> usize {
        self.disaggregators.len()
    }

    pub fn window(&self) -> MonthWindow {
        self.window
    }

    /// Length of the daily buffer for `(year, month)`.
    pub fn buffer_n_day(&self, year: i32, month: u32) -> SurrogateResult<usize> {
        Ok(self.window.n_day(year, month)?)
    }

    /// Monthly statistic for every batch row and output column.
    ///
    /// Returns an array of shape `(batch, n_out)`.
    ///
    /// # Errors
    /// - Shape errors from input validation, before any surrogate call.
    /// - [`SurrogateError::Series`] from disaggregation, feature extraction,
    ///   exogenous lookup or aggregation.
    /// - [`SurrogateError::OutputRows`] / [`SurrogateError::NoOutputs`] if
    ///   the surrogate breaks its contract; its own errors are passed through.
    #[tracing::instrument(level = "debug", skip_all, fields(surrogate = self.surrogate.identifier(), year = year, month = month))]
    pub fn ann_month(
        &self, inputs: &[Array2<f64>], year: i32, month: u32,
    ) -> SurrogateResult<Array2<f64>> {
        let batch = validate_monthly_inputs(inputs, self.n_inputs())?;
        let n_day = self.window.n_day(year, month)?;
        let index_start = self.window.offset_first_month(year, month)?;
        let dim = days_in_month(year, month)? as usize;

        let daily = self.daily_inputs(inputs, batch, year, month, n_day)?;

        let transform = self.surrogate.daily_to_features();
        let feature_len = transform.feature_len();
        let mut features = Vec::with_capacity(daily.len());
        for per_batch in &daily {
            let mut mat = Array2::<f64>::zeros((batch * dim, feature_len));
            for (b, series) in per_batch.iter().enumerate() {
                for d in 0..dim {
                    let row = transform.features_at(series, index_start + d)?;
                    for (cell, value) in mat.row_mut(b * dim + d).iter_mut().zip(row) {
                        *cell = value;
                    }
                }
            }
            features.push(mat);
        }

        trace!(batch, dim, feature_len, "calling surrogate");
        let output = self.surrogate.estimate(&features)?;
        if output.nrows() != batch * dim {
            return Err(SurrogateError::OutputRows { expected: batch * dim, found: output.nrows() });
        }
        let n_out = output.ncols();
        if n_out == 0 {
            return Err(SurrogateError::NoOutputs);
        }

        let mut monthly = Array2::<f64>::zeros((batch, n_out));
        for b in 0..batch {
            for out in 0..n_out {
                let days: Vec<f64> = output.slice(s![b * dim..(b + 1) * dim, out]).to_vec();
                monthly[[b, out]] = self.aggregator.aggregate(&days, 0, 1, dim)?;
            }
        }
        debug!(batch, n_out, "monthly statistic computed");
        Ok(monthly)
    }

    /// Evaluate an `n0 × n1` grid of the two control inputs.
    ///
    /// Batch row 0 of every input is replicated `n0·n1` times; batch row
    /// `i·n1 + j` has lag 0 of input 0 set to `x0[i]` and of input 1 set to
    /// `x1[j]`. One [`SurrogateMonth::ann_month`] call is made.
    ///
    /// # Errors
    /// - [`SurrogateError::InvalidGrid`] for zero points or fewer than two
    ///   inputs.
    /// - [`SurrogateError::MissingCurrentMonth`] if a control input has no
    ///   lag 0.
    /// - Any error from [`SurrogateMonth::ann_month`].
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(level = "debug", skip_all, fields(surrogate = self.surrogate.identifier(), year = year, month = month, n0 = n0, n1 = n1))]
    pub fn evaluate_on_grid(
        &self, inputs: &[Array2<f64>], year: i32, month: u32, lo0: f64, hi0: f64, n0: usize,
        lo1: f64, hi1: f64, n1: usize,
    ) -> SurrogateResult<GridResult> {
        if n0 == 0 || n1 == 0 {
            return Err(SurrogateError::InvalidGrid { reason: "grid needs at least one point per axis" });
        }
        if inputs.len() < 2 {
            return Err(SurrogateError::InvalidGrid { reason: "grid needs two control inputs" });
        }
        validate_monthly_inputs(inputs, self.n_inputs())?;
        validate_control_inputs(inputs, self.n_inputs())?;
        let x0 = even_grid(lo0, hi0, n0);
        let x1 = even_grid(lo1, hi1, n1);

        let mut expanded: MonthlyInputs = replicate_first_row(inputs, n0 * n1);
        for (i, &v0) in x0.iter().enumerate() {
            for (j, &v1) in x1.iter().enumerate() {
                let b = i * n1 + j;
                expanded[0][[b, 0]] = v0;
                expanded[1][[b, 0]] = v1;
            }
        }

        let monthly = self.ann_month(&expanded, year, month)?;
        let n_out = monthly.len_of(Axis(1));
        let result = Array3::from_shape_fn((n0, n1, n_out), |(i, j, out)| monthly[[i * n1 + j, out]]);
        Ok(GridResult { x0, x1, inputs: expanded, result, year, month })
    }

    /// Daily series per input and batch row: `[input][batch][day]`.
    fn daily_inputs(
        &self, inputs: &[Array2<f64>], batch: usize, year: i32, month: u32, n_day: usize,
    ) -> SurrogateResult<Vec<Vec<Vec<f64>>>> {
        let mut daily = Vec::with_capacity(inputs.len());
        for (input, x) in inputs.iter().enumerate() {
            let assignment = self.assignments.iter().find(|r| r.input_index == input);
            let per_batch = match (assignment, &self.exogenous, &self.disaggregators[input]) {
                (Some(r), Some(source), _) => {
                    let start = self.window.start_date(year, month)?;
                    let series = source.daily_slice(r.column_index, start, n_day)?;
                    vec![series; batch]
                }
                (_, _, Some(disaggregator)) => {
                    let mut rows = Vec::with_capacity(batch);
                    for row in x.rows() {
                        rows.push(disaggregator.apply(year, month, &row.to_vec())?);
                    }
                    rows
                }
                _ => return Err(SurrogateError::UnassignedInput { input }),
            };
            daily.push(per_batch);
        }
        Ok(daily)
    }
}

fn common_window(
    disaggregators: &[Option<MonthlyDisaggregator>], surrogate: &dyn Surrogate,
) -> SurrogateResult<MonthWindow> {
    if disaggregators.len() != surrogate.n_features() {
        return Err(SurrogateError::InputCountMismatch {
            expected: surrogate.n_features(),
            found: disaggregators.len(),
        });
    }
    let mut present = disaggregators.iter().enumerate().filter_map(|(i, d)| d.map(|d| (i, d)));
    let (_, first) = present.next().ok_or(SurrogateError::NoDisaggregators)?;
    for (input, d) in present {
        if d.n_month() != first.n_month() {
            return Err(SurrogateError::WindowMismatch {
                input,
                expected: first.n_month(),
                found: d.n_month(),
            });
        }
    }
    Ok(first.window())
}
