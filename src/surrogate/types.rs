//! Shared data types of the surrogate layer.
use std::fmt::Write as _;

use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::surrogate::errors::{SurrogateError, SurrogateResult};

/// Reverse-chronological monthly history, shape `(batch, lag)`; lag 0 is
/// the current month.
pub type MonthlyHistory = Array2<f64>;

/// One [`MonthlyHistory`] per surrogate input variable.
pub type MonthlyInputs = Vec<MonthlyHistory>;

/// Surrogate output evaluated on an even 2-D grid of the two control inputs.
///
/// `result[[i, j, out]]` is the monthly statistic at `(x0[i], x1[j])` for
/// output column `out`. `inputs` holds the expanded monthly inputs, batch
/// row `i * x1.len() + j` carrying grid point `(i, j)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GridResult {
    pub x0: Vec<f64>,
    pub x1: Vec<f64>,
    pub inputs: MonthlyInputs,
    pub result: Array3<f64>,
    pub year: i32,
    pub month: u32,
}

impl GridResult {
    pub fn n0(&self) -> usize {
        self.x0.len()
    }

    pub fn n1(&self) -> usize {
        self.x1.len()
    }

    pub fn n_out(&self) -> usize {
        self.result.len_of(Axis(2))
    }

    /// Grid values for one output column, shape `(n0, n1)`.
    pub fn location(&self, out: usize) -> SurrogateResult<ArrayView2<'_, f64>> {
        if out >= self.n_out() {
            return Err(SurrogateError::OutputIndexOutOfRange { index: out, n_out: self.n_out() });
        }
        Ok(self.result.index_axis(Axis(2), out))
    }

    /// Human-readable table of one output column: a header row of `x1`
    /// values, then one row per `x0` value.
    pub fn location_table(&self, out: usize) -> SurrogateResult<String> {
        let values = self.location(out)?;
        let mut table = format!("{}-{:02} output {out}\n{:>12}", self.year, self.month, "x0 \\ x1");
        for x1 in &self.x1 {
            let _ = write!(table, "{x1:>12.2}");
        }
        for (i, x0) in self.x0.iter().enumerate() {
            let _ = write!(table, "\n{x0:>12.2}");
            for v in values.row(i) {
                let _ = write!(table, "{v:>12.4}");
            }
        }
        Ok(table)
    }
}
