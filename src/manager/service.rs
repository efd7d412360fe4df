//! The optimization model's call surface.
//!
//! [`SalinityManager`] owns the registry of surrogate months and the memo
//! tables, and answers the three queries a monthly planning model makes:
//! the monthly salinity estimate ([`SalinityManager::ann_ec`]), one
//! coefficient of a linearized salinity constraint
//! ([`SalinityManager::line_gen`]) and the flow required to meet a target
//! ([`SalinityManager::required_flow`]).
//!
//! Each query first looks up an [`EvaluationKey`] built from the current
//! month's input values; surrogate work happens only on a miss, outside
//! any lock.
use std::{borrow::Cow, sync::Arc};

use ndarray::Array2;
use tracing::debug;

use crate::{
    control::{
        inverse::InverseSurrogateMonth,
        linear::{formulate_constraint, ConstraintCoefs, LinearConstraint, D_X_INDEX, D_Y_INDEX},
    },
    manager::{
        cache::EvaluationCache,
        errors::{ManagerError, ManagerResult},
        feasibility::Feasibility,
        key::{EvaluationKey, CONTEXT_ANNEC, CONTEXT_CONSTRAINT, CONTEXT_LINEGEN, CONTEXT_REQFLOW, LOC_UNSPEC},
        options::ManagerOptions,
        registry::{location_code, SurrogateRegistry},
    },
    surrogate::{errors::SurrogateError, month::SurrogateMonth, types::GridResult},
    timeseries::aggregate::MonthlyAggregator,
    utils::{latest_values, with_controls},
};

/// Tolerance for treating a rank parameter as an integer.
pub const INTEGER_TOLERANCE: f64 = 1e-4;

#[derive(Debug)]
pub struct SalinityManager {
    registry: SurrogateRegistry,
    cache: EvaluationCache,
    opts: ManagerOptions,
}

impl Default for SalinityManager {
    fn default() -> Self {
        Self::new(ManagerOptions::default())
    }
}

impl SalinityManager {
    pub fn new(opts: ManagerOptions) -> Self {
        Self {
            registry: SurrogateRegistry::new(),
            cache: EvaluationCache::new(opts.cache_capacity),
            opts,
        }
    }

    pub fn options(&self) -> &ManagerOptions {
        &self.opts
    }

    pub fn registry(&self) -> &SurrogateRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &EvaluationCache {
        &self.cache
    }

    /// See [`SurrogateRegistry::register`].
    pub fn register(&self, location: i32, ave_type: i32, month: Arc<SurrogateMonth>) -> ManagerResult<()> {
        self.registry.register(location, ave_type, month)
    }

    /// See [`SurrogateRegistry::set_output_index`].
    pub fn set_output_index(&self, location: i32, index: usize) -> ManagerResult<()> {
        self.registry.set_output_index(location, index)
    }

    /// Monthly estimate at `location` for batch row 0.
    ///
    /// `ave_param` replaces the rank or threshold of the registered
    /// aggregator for this call only. The full `(batch, n_out)` output is
    /// cached, shared by every location reading the same surrogate.
    ///
    /// # Errors
    /// - [`ManagerError::NotRegistered`] / [`ManagerError::NoOutputIndex`].
    /// - [`ManagerError::Surrogate`] from the evaluation or an unusable
    ///   `ave_param`.
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(level = "debug", skip_all, fields(location = location, ave_type = ave_type, year = year, month = month))]
    pub fn ann_ec(
        &self, inputs: &[Array2<f64>], location: i32, ave_type: i32, month: u32, year: i32,
        ave_param: Option<f64>,
    ) -> ManagerResult<f64> {
        let registered = self.registry.get(location, ave_type)?;
        let out = self.registry.output_index(location)?;
        let key = EvaluationKey::new(
            registered.surrogate().identifier(),
            latest_values(inputs),
            0,
            0,
            CONTEXT_ANNEC,
            year,
            month,
            self.opts.cycle,
            ave_type,
        )
        .with_ave_param(ave_param);

        let monthly = match self.cache.output(&key)? {
            Some(cached) => {
                debug!(station = location_code(location), "monthly estimate cache hit");
                cached
            }
            None => {
                debug!(station = location_code(location), "monthly estimate cache miss");
                let configured = match ave_param {
                    Some(param) => {
                        let aggregator = registered.aggregator().with_param(param).map_err(SurrogateError::from)?;
                        Cow::Owned(registered.reconfigured(aggregator))
                    }
                    None => Cow::Borrowed(registered.as_ref()),
                };
                let monthly = configured.ann_month(inputs, year, month)?;
                self.cache.put_output(key, monthly.clone())?;
                monthly
            }
        };
        output_at(&monthly, out)
    }

    /// One coefficient of the linear constraint
    /// `coef_x·x + coef_y·y ≤ rhs` keeping salinity at `location` below
    /// `target`, linearized around `(x0, y0)`.
    ///
    /// `component` selects rhs (0), the first control's coefficient (1) or
    /// the second's (2). The coarse grid classifies the month first:
    /// always feasible gives `(0, −1, 1)`, never feasible gives
    /// `(−(hi0 − lo1), −1, 1)`. Otherwise the constraint comes from the
    /// gradient at the nominal point or, if that excludes the corner
    /// `(hi0, lo1)`, at the first feasible grid node with `x ≥ x0` and
    /// `y ≤ y0` whose gradient has the expected signs.
    ///
    /// # Errors
    /// - [`ManagerError::InvalidComponent`] for `component > 2`.
    /// - Registry and surrogate errors as for [`SalinityManager::ann_ec`].
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(level = "debug", skip_all, fields(location = location, component = component, year = year, month = month, target = target))]
    pub fn line_gen(
        &self, inputs: &[Array2<f64>], location: i32, component: usize, ave_type: i32, month: u32,
        year: i32, x0: f64, y0: f64, target: f64,
    ) -> ManagerResult<f64> {
        if component > 2 {
            return Err(ManagerError::InvalidComponent { component });
        }
        let registered = self.registry.get(location, ave_type)?;
        let out = self.registry.output_index(location)?;
        let features = latest_values(inputs);
        let identifier = registered.surrogate().identifier();
        let constraint_key = EvaluationKey::new(
            identifier,
            features.clone(),
            location,
            0,
            CONTEXT_CONSTRAINT,
            year,
            month,
            self.opts.cycle,
            ave_type,
        )
        .with_ave_param(Some(target));

        if let Some(cached) = self.cache.constraint(&constraint_key)? {
            debug!(station = location_code(location), "constraint cache hit");
            return select(cached, component);
        }
        debug!(station = location_code(location), "constraint cache miss");

        let shared_key = EvaluationKey::new(
            identifier,
            features,
            LOC_UNSPEC,
            0,
            CONTEXT_LINEGEN,
            year,
            month,
            self.opts.cycle,
            ave_type,
        );
        let grid = self.coarse_grid(&registered, &shared_key, inputs, year, month)?;
        let constraint = match Feasibility::assess(&grid, out, target)? {
            Feasibility::AlwaysFeasible => {
                debug!(station = location_code(location), "always feasible");
                self.always_feasible()
            }
            Feasibility::NeverFeasible => {
                debug!(station = location_code(location), "never feasible");
                self.never_feasible()
            }
            Feasibility::Mixed => {
                debug!(station = location_code(location), "feasible on part of the grid");
                self.linearized(&registered, &shared_key, &grid, inputs, out, year, month, x0, y0, target)?
            }
        };
        self.cache.put_constraint(constraint_key, constraint)?;
        select(constraint, component)
    }

    /// Value of control input 0 in `[lo, hi]` at which the statistic at
    /// `location` equals `target`.
    ///
    /// `nth` is the rank for n-th smallest aggregation and must be within
    /// [`INTEGER_TOLERANCE`] of an integer; count-below aggregation uses
    /// `target` as its threshold. Roots beyond the bounds are reported as
    /// `±sentinel`. The current-month value of input 0 is ignored, so it
    /// is zeroed in the cache key.
    ///
    /// # Errors
    /// - [`ManagerError::NonIntegerParameter`] for a fractional `nth`.
    /// - [`ManagerError::Surrogate`] wrapping a bracketing failure or any
    ///   evaluation error.
    /// - Registry errors as for [`SalinityManager::ann_ec`].
    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(level = "debug", skip_all, fields(location = location, ave_type = ave_type, year = year, month = month, target = target))]
    pub fn required_flow(
        &self, target: f64, inputs: &[Array2<f64>], lo: f64, hi: f64, location: i32, ave_type: i32,
        month: u32, year: i32, nth: Option<f64>,
    ) -> ManagerResult<f64> {
        let rank = match nth {
            Some(value) if (value - value.round()).abs() < INTEGER_TOLERANCE => value.round() as i32,
            Some(value) => return Err(ManagerError::NonIntegerParameter { value }),
            None => 0,
        };
        let rank = if ave_type == MonthlyAggregator::NTH_SMALLEST_CODE { rank } else { 0 };

        let registered = self.registry.get(location, ave_type)?;
        let mut features = latest_values(inputs);
        if let Some(first) = features.first_mut() {
            *first = 0.0;
        }
        let key = EvaluationKey::new(
            registered.surrogate().identifier(),
            features,
            location,
            rank,
            CONTEXT_REQFLOW,
            year,
            month,
            self.opts.cycle,
            ave_type,
        )
        .with_ave_param(Some(target));

        if let Some(flow) = self.cache.required_flow(&key)? {
            debug!(station = location_code(location), flow, "required flow cache hit");
            return Ok(flow);
        }

        let aggregator = match registered.aggregator() {
            MonthlyAggregator::NthSmallest { .. } => registered.aggregator().with_param(rank as f64),
            MonthlyAggregator::CountBelow { .. } => registered.aggregator().with_param(target),
            other => Ok(other),
        }
        .map_err(SurrogateError::from)?;
        let configured = registered.reconfigured(aggregator);
        let out = self.registry.output_index(location)?;
        let flow = InverseSurrogateMonth::with_options(&configured, self.opts.brent)
            .with_sentinel(self.opts.sentinel)
            .required_value(target, inputs, 0, lo, hi, year, month, out)?;
        debug!(station = location_code(location), flow, "required flow computed");
        self.cache.put_required_flow(key, flow)?;
        Ok(flow)
    }

    fn always_feasible(&self) -> ConstraintCoefs {
        ConstraintCoefs::new(0.0, -1.0, 1.0)
    }

    fn never_feasible(&self) -> ConstraintCoefs {
        let grid = &self.opts.grid;
        ConstraintCoefs::new(-(grid.hi0 - grid.lo1), -1.0, 1.0)
    }

    fn coarse_grid(
        &self, month_model: &SurrogateMonth, key: &EvaluationKey, inputs: &[Array2<f64>], year: i32,
        month: u32,
    ) -> ManagerResult<GridResult> {
        if let Some(grid) = self.cache.grid(key)? {
            debug!("grid cache hit");
            return Ok(grid);
        }
        let spec = self.opts.grid;
        let grid = month_model.evaluate_on_grid(inputs, year, month, spec.lo0, spec.hi0, spec.n0, spec.lo1, spec.hi1, spec.n1)?;
        self.cache.put_grid(key.clone(), grid.clone())?;
        Ok(grid)
    }

    #[allow(clippy::too_many_arguments)]
    fn linearized(
        &self, month_model: &SurrogateMonth, key: &EvaluationKey, grid: &GridResult, inputs: &[Array2<f64>],
        out: usize, year: i32, month: u32, x0: f64, y0: f64, target: f64,
    ) -> ManagerResult<ConstraintCoefs> {
        let linear = LinearConstraint::new(month_model);
        let gradient = match self.cache.gradient(key)? {
            Some(cached) => cached,
            None => {
                let gradient = linear.gradient(inputs, year, month)?;
                self.cache.put_gradient(key.clone(), gradient.clone())?;
                gradient
            }
        };
        let row = gradient_row(&gradient, out)?;
        let constraint = formulate_constraint(row.view(), x0, y0, target);
        let spec = self.opts.grid;
        if constraint.admits(spec.hi0, spec.lo1) {
            return Ok(constraint);
        }

        debug!("nominal linearization excludes the feasible corner; searching grid");
        let Some((x, y)) = Feasibility::alternative_point(grid, out, target, x0, y0)? else {
            debug!("no alternative point");
            return Ok(self.never_feasible());
        };
        let shifted = with_controls(inputs, x, y);
        let gradient = linear.gradient(&shifted, year, month)?;
        let row = gradient_row(&gradient, out)?;
        if row[D_X_INDEX] < 0.0 && row[D_Y_INDEX] > 0.0 {
            debug!(x, y, "linearized at alternative point");
            Ok(formulate_constraint(row.view(), x, y, target))
        } else {
            debug!(x, y, "gradient at alternative point has unexpected signs");
            Ok(self.never_feasible())
        }
    }
}

fn select(constraint: ConstraintCoefs, component: usize) -> ManagerResult<f64> {
    constraint.component(component).ok_or(ManagerError::InvalidComponent { component })
}

fn output_at(monthly: &Array2<f64>, out: usize) -> ManagerResult<f64> {
    monthly
        .get((0, out))
        .copied()
        .ok_or_else(|| SurrogateError::OutputIndexOutOfRange { index: out, n_out: monthly.ncols() }.into())
}

fn gradient_row(gradient: &Array2<f64>, out: usize) -> ManagerResult<ndarray::Array1<f64>> {
    if out >= gradient.nrows() {
        return Err(SurrogateError::OutputIndexOutOfRange { index: out, n_out: gradient.nrows() }.into());
    }
    Ok(gradient.row(out).to_owned())
}
