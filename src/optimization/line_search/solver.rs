//! Brent's method for a sign-changing bracket, written as an `argmin`
//! [`Solver`].
//!
//! Each `next_iter` performs one step of the classic algorithm: an inverse
//! quadratic (or secant) step when it stays well inside the bracket and
//! shrinks fast enough, bisection otherwise. The solver keeps the full
//! bracket `a, b, c` with their values; `b` is always the best estimate and
//! is what the executor sees as `param`, with `|f(b)|` as `cost`.
//!
//! Convergence is declared when the half bracket `|c - b| / 2` is within
//! `2·eps·|b| + t` or `|f(b)| < t`, where `eps` and `t` are the relative and
//! absolute accuracies. The executor additionally stops on
//! `|f(b)| <= function_accuracy` through `target_cost`.
use crate::optimization::{
    errors::OptError,
    line_search::traits::BrentOptions,
};
use argmin::core::{
    CostFunction, Error, IterState, Problem, Solver, TerminationReason, TerminationStatus, KV,
};

/// Argmin state used by [`BrentZero`].
pub type BrentState = IterState<f64, (), (), (), (), f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct BrentZero {
    a: f64,
    fa: f64,
    b: f64,
    fb: f64,
    c: f64,
    fc: f64,
    d: f64,
    e: f64,
    absolute_accuracy: f64,
    relative_accuracy: f64,
    converged: bool,
}

impl BrentZero {
    /// Solver over `[lo, hi]` with known endpoint values of opposite sign.
    ///
    /// # Errors
    /// [`OptError::NoBracketingValues`] if `f_lo` and `f_hi` share a sign.
    pub fn new(lo: f64, hi: f64, f_lo: f64, f_hi: f64, opts: &BrentOptions) -> Result<Self, OptError> {
        if f_lo * f_hi > 0.0 {
            return Err(OptError::NoBracketingValues { f_min: f_lo, f_mid: f64::NAN, f_max: f_hi });
        }
        Ok(Self {
            a: lo,
            fa: f_lo,
            b: hi,
            fb: f_hi,
            c: lo,
            fc: f_lo,
            d: hi - lo,
            e: hi - lo,
            absolute_accuracy: opts.absolute_accuracy,
            relative_accuracy: opts.relative_accuracy,
            converged: false,
        })
    }

    fn tolerance(&self) -> f64 {
        2.0 * self.relative_accuracy * self.b.abs() + self.absolute_accuracy
    }

    /// Keep `b` as the best point and test convergence.
    fn settle(&mut self) -> bool {
        if self.fc.abs() < self.fb.abs() {
            self.a = self.b;
            self.b = self.c;
            self.c = self.a;
            self.fa = self.fb;
            self.fb = self.fc;
            self.fc = self.fa;
        }
        let m = 0.5 * (self.c - self.b);
        m.abs() <= self.tolerance() || self.fb.abs() < self.absolute_accuracy
    }

    /// Step length for the next trial point.
    fn step(&mut self) {
        let tol = self.tolerance();
        let m = 0.5 * (self.c - self.b);
        if self.e.abs() < tol || self.fa.abs() <= self.fb.abs() {
            self.d = m;
            self.e = m;
            return;
        }
        let s = self.fb / self.fa;
        let (mut p, mut q);
        if self.a == self.c {
            // secant
            p = 2.0 * m * s;
            q = 1.0 - s;
        } else {
            // inverse quadratic interpolation
            let q0 = self.fa / self.fc;
            let r = self.fb / self.fc;
            p = s * (2.0 * m * q0 * (q0 - r) - (self.b - self.a) * (r - 1.0));
            q = (q0 - 1.0) * (r - 1.0) * (s - 1.0);
        }
        if p > 0.0 {
            q = -q;
        } else {
            p = -p;
        }
        let previous = self.e;
        self.e = self.d;
        if p >= 1.5 * m * q - (tol * q).abs() || p >= (0.5 * previous * q).abs() {
            self.d = m;
            self.e = m;
        } else {
            self.d = p / q;
        }
    }
}

impl<O> Solver<O, BrentState> for BrentZero
where
    O: CostFunction<Param = f64, Output = f64>,
{
    const NAME: &'static str = "Brent zero";

    fn init(
        &mut self, _problem: &mut Problem<O>, state: BrentState,
    ) -> Result<(BrentState, Option<KV>), Error> {
        self.converged = self.settle();
        Ok((state.param(self.b).cost(self.fb.abs()), None))
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, state: BrentState,
    ) -> Result<(BrentState, Option<KV>), Error> {
        let tol = self.tolerance();
        let m = 0.5 * (self.c - self.b);
        self.step();
        self.a = self.b;
        self.fa = self.fb;
        if self.d.abs() > tol {
            self.b += self.d;
        } else if m > 0.0 {
            self.b += tol;
        } else {
            self.b -= tol;
        }
        self.fb = problem.cost(&self.b)?;
        if (self.fb > 0.0 && self.fc > 0.0) || (self.fb <= 0.0 && self.fc <= 0.0) {
            self.c = self.a;
            self.fc = self.fa;
            self.d = self.b - self.a;
            self.e = self.d;
        }
        self.converged = self.settle();
        Ok((state.param(self.b).cost(self.fb.abs()), None))
    }

    fn terminate(&mut self, _state: &BrentState) -> TerminationStatus {
        if self.converged {
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
        } else {
            TerminationStatus::NotTerminated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use argmin::core::{Executor, State};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Convergence of the bare solver on smooth scalar functions.
    // - Rejection of endpoints without a sign change.
    // -------------------------------------------------------------------------

    struct Cubic;

    impl CostFunction for Cubic {
        type Param = f64;
        type Output = f64;

        fn cost(&self, x: &f64) -> Result<f64, Error> {
            Ok(x * x * x - 2.0 * x - 5.0)
        }
    }

    #[test]
    // Purpose
    // -------
    // Brent's classic test cubic converges to its real root.
    //
    // Given
    // -----
    // - f(x) = x³ - 2x - 5 on [2, 3]; f(2) = -1, f(3) = 16.
    //
    // Expect
    // ------
    // - x ≈ 2.0945514815 within 1e-6, terminated by the solver's own test.
    fn converges_on_classic_cubic() {
        // Arrange
        let opts = BrentOptions::default();
        let solver = BrentZero::new(2.0, 3.0, -1.0, 16.0, &opts).expect("bracket");

        // Act
        let result = Executor::new(Cubic, solver)
            .configure(|state| state.max_iters(100))
            .run()
            .expect("run");
        let state = result.state();

        // Assert
        assert_abs_diff_eq!(*state.get_param().expect("param"), 2.094_551_481_5, epsilon = 1e-6);
        assert_eq!(
            *state.get_termination_status(),
            TerminationStatus::Terminated(TerminationReason::SolverConverged)
        );
    }

    #[test]
    // Purpose
    // -------
    // Endpoints with the same sign are refused at construction.
    //
    // Given
    // -----
    // - f(lo) = 1, f(hi) = 2.
    //
    // Expect
    // ------
    // - `NoBracketingValues`.
    fn same_sign_endpoints_are_rejected() {
        // Act
        let err = BrentZero::new(0.0, 1.0, 1.0, 2.0, &BrentOptions::default()).unwrap_err();

        // Assert
        assert!(matches!(err, OptError::NoBracketingValues { .. }));
    }
}
