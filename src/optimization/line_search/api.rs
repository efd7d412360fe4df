//! High-level entry point: find a zero of a function along a line.
//!
//! [`find_root`] reproduces the bracket probing used by the salinity
//! control code before Brent's method is run:
//!
//! 1. Evaluate the midpoint; return it if `|f| <= function_accuracy`.
//! 2. Evaluate `min`; return it if close enough. If `f(mid)·f(min) < 0`,
//!    run Brent on `[min, mid]`.
//! 3. Evaluate `max`; return it if close enough. If `f(mid)·f(max) < 0`,
//!    run Brent on `[mid, max]`.
//! 4. Otherwise fail with [`OptError::NoBracketingValues`].
//!
//! The midpoint is probed first because callers usually pass a bracket
//! centered on a previous solution.
use tracing::{debug, trace};

use crate::optimization::{
    errors::{OptError, OptResult},
    line_search::{
        run::run_brent,
        traits::{BrentOptions, LineSearch, LineSearchable, RootOutcome},
    },
};

/// Find `z` in `[line.min(), line.max()]` with `f(z) ≈ 0`.
///
/// # Errors
/// - [`OptError::NoBracketingValues`] when neither half of the bracket
///   changes sign.
/// - [`OptError::NotConverged`] when Brent runs out of iterations.
/// - Any error raised by `problem.eval`, unchanged.
#[tracing::instrument(level = "trace", skip_all, fields(min = line.min(), max = line.max()))]
pub fn find_root<P: LineSearchable + ?Sized>(
    problem: &P, line: &LineSearch, opts: &BrentOptions,
) -> OptResult<RootOutcome> {
    let (min, max) = (line.min(), line.max());
    let mid = 0.5 * (min + max);
    let close = |v: f64| v.abs() <= opts.function_accuracy;

    let f_mid = line.objective(problem, mid)?;
    if close(f_mid) {
        debug!(z = mid, "root at bracket midpoint");
        return Ok(RootOutcome::from_precheck(mid, f_mid, 1));
    }
    let f_min = line.objective(problem, min)?;
    if close(f_min) {
        debug!(z = min, "root at bracket minimum");
        return Ok(RootOutcome::from_precheck(min, f_min, 2));
    }
    if f_mid * f_min < 0.0 {
        trace!(f_min, f_mid, "sign change in lower half");
        return run_brent(problem, line, min, mid, f_min, f_mid, opts, 2);
    }
    let f_max = line.objective(problem, max)?;
    if close(f_max) {
        debug!(z = max, "root at bracket maximum");
        return Ok(RootOutcome::from_precheck(max, f_max, 3));
    }
    if f_mid * f_max < 0.0 {
        trace!(f_mid, f_max, "sign change in upper half");
        return run_brent(problem, line, mid, max, f_mid, f_max, opts, 3);
    }
    debug!(f_min, f_mid, f_max, "no bracketing values");
    Err(OptError::NoBracketingValues { f_min, f_mid, f_max })
}
