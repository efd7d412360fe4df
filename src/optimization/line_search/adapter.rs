//! Adapter that exposes a [`LineSearchable`] restricted to a [`LineSearch`]
//! as a one-dimensional `argmin` problem.
//!
//! The parameter is the scalar `z`; the output is the *signed* objective
//! `f(z)`. The Brent solver needs the sign for bracketing and records
//! `|f(z)|` as the state cost itself.
use crate::optimization::line_search::traits::{LineSearch, LineSearchable};
use argmin::core::{CostFunction, Error};

/// Bridges a user [`LineSearchable`] to `argmin`'s `CostFunction`.
pub struct LineAdapter<'a, P: LineSearchable + ?Sized> {
    pub problem: &'a P,
    pub line: &'a LineSearch,
}

impl<'a, P: LineSearchable + ?Sized> LineAdapter<'a, P> {
    pub fn new(problem: &'a P, line: &'a LineSearch) -> Self {
        Self { problem, line }
    }
}

impl<'a, P: LineSearchable + ?Sized> CostFunction for LineAdapter<'a, P> {
    type Param = f64;
    type Output = f64;

    /// Evaluate `f(z)`.
    ///
    /// # Errors
    /// Propagates the user's `OptError` boxed as `argmin::core::Error`; the
    /// crate's `From<Error>` recovers it unchanged.
    fn cost(&self, z: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.line.objective(self.problem, *z)?)
    }
}
