//! Classification of a coarse control grid against a salinity target.
use crate::surrogate::{errors::SurrogateResult, types::GridResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    /// No grid value exceeds the target.
    AlwaysFeasible,
    /// No grid value is below the target.
    NeverFeasible,
    /// Some grid values on each side of the target.
    Mixed,
}

impl Feasibility {
    /// Classify output column `out` of `grid` against `target`.
    ///
    /// Scanning stops at the first pair of values on opposite sides. Values
    /// equal to the target count for both sides, so a grid exactly at the
    /// target is always feasible.
    ///
    /// # Errors
    /// [`crate::surrogate::errors::SurrogateError::OutputIndexOutOfRange`]
    /// for a bad `out`.
    pub fn assess(grid: &GridResult, out: usize, target: f64) -> SurrogateResult<Self> {
        let values = grid.location(out)?;
        let (mut all_below, mut all_above) = (true, true);
        for &v in values.iter() {
            if v > target {
                all_below = false;
            } else if v < target {
                all_above = false;
            }
            if !(all_below || all_above) {
                return Ok(Feasibility::Mixed);
            }
        }
        Ok(if all_below {
            Feasibility::AlwaysFeasible
        } else {
            Feasibility::NeverFeasible
        })
    }

    /// First grid point, scanning `x0` then `x1` in ascending order, whose
    /// value meets `target` with `x ≥ x_ref` and `y ≤ y_ref`.
    pub fn alternative_point(
        grid: &GridResult, out: usize, target: f64, x_ref: f64, y_ref: f64,
    ) -> SurrogateResult<Option<(f64, f64)>> {
        let values = grid.location(out)?;
        for (i, &x) in grid.x0.iter().enumerate() {
            for (j, &y) in grid.x1.iter().enumerate() {
                if values[[i, j]] <= target && x >= x_ref && y <= y_ref {
                    return Ok(Some((x, y)));
                }
            }
        }
        Ok(None)
    }
}
