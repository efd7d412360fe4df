//! Execution helper that runs [`BrentZero`] on one sign-changing bracket and
//! returns a crate-friendly [`RootOutcome`].
use crate::optimization::{
    errors::OptResult,
    line_search::{
        adapter::LineAdapter,
        solver::BrentZero,
        traits::{BrentOptions, LineSearch, LineSearchable, RootOutcome},
    },
};
use argmin::core::{Executor, State};

/// Run Brent's method on `[lo, hi]` of `line`.
///
/// Wires up the user problem via [`LineAdapter`], configures `max_iters` and
/// a `target_cost` equal to `opts.function_accuracy`, attaches a terminal
/// slog observer when `obs_slog` is enabled and `opts.verbose` is set, and
/// converts the final state into a [`RootOutcome`].
///
/// `prior_evaluations` is added to argmin's cost counter so the outcome
/// reports every evaluation made for this search.
///
/// # Errors
/// - [`OptError::NoBracketingValues`](crate::optimization::errors::OptError::NoBracketingValues)
///   if `f_lo` and `f_hi` share a sign.
/// - [`OptError::NotConverged`](crate::optimization::errors::OptError::NotConverged)
///   if `opts.max_iter` is exhausted.
/// - Any error raised by the objective, unchanged.
#[allow(clippy::too_many_arguments)]
pub fn run_brent<P: LineSearchable + ?Sized>(
    problem: &P, line: &LineSearch, lo: f64, hi: f64, f_lo: f64, f_hi: f64, opts: &BrentOptions,
    prior_evaluations: u64,
) -> OptResult<RootOutcome> {
    let solver = BrentZero::new(lo, hi, f_lo, f_hi, opts)?;
    let adapter = LineAdapter::new(problem, line);
    let mut optimizer = Executor::new(adapter, solver);
    optimizer = optimizer.configure(|state| {
        state.max_iters(opts.max_iter as u64).target_cost(opts.function_accuracy)
    });
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let evaluations =
        prior_evaluations + result.get_func_counts().get("cost_count").copied().unwrap_or(0);
    let termination = result.get_termination_status().clone();
    let residual = result.get_best_cost();
    RootOutcome::from_solver(result.take_best_param(), residual, termination, iterations, evaluations)
}
