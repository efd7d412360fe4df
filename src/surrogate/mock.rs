//! Analytic stand-in for a trained salinity surrogate.
//!
//! [`MockSurrogate`] blends three smooth response surfaces of the current
//! day's Sacramento inflow ("sac") and exports ("exp"), weighted by three
//! mixing inputs:
//!
//! - *standard*: salinity falls with inflow and rises with exports;
//! - *convex*: a bowl-shaped variant of the same trend;
//! - *inverse*: both inputs push salinity up.
//!
//! Each surface is rescaled to roughly `[150, 2000]`. The five inputs are
//! `sac`, `exp`, `mix_std`, `mix_convex` and `mix_inverse`; features are a
//! reversed plain window, so column 0 of every feature matrix is the
//! current day. Output has a single column.
use ndarray::Array2;

use crate::{
    surrogate::{
        errors::{SurrogateError, SurrogateResult},
        traits::Surrogate,
    },
    timeseries::features::DailyToSurrogate,
};

const SAC_MIN: f64 = 5000.0;
const SAC_MAX: f64 = 25000.0;
const EXP_MIN: f64 = 500.0;
const EXP_MAX: f64 = 14000.0;

const INPUT_NAMES: [&str; 5] = ["sac", "exp", "mix_std", "mix_convex", "mix_inverse"];

#[derive(Debug, Clone, PartialEq)]
pub struct MockSurrogate {
    identifier: String,
    transform: DailyToSurrogate,
}

impl MockSurrogate {
    /// Mock reading `len_hist` days of history per feature vector.
    ///
    /// # Errors
    /// [`SurrogateError::Series`] if `len_hist == 0`.
    pub fn new(len_hist: usize) -> SurrogateResult<Self> {
        Ok(Self {
            identifier: format!("mock_surrogate_{len_hist}"),
            transform: DailyToSurrogate::window(len_hist, true)?,
        })
    }

    /// Response at one day for mixing weights `[std, convex, inverse]`.
    ///
    /// Surfaces with a non-positive weight are skipped.
    pub fn kernel(sac: f64, exp: f64, mix: [f64; 3]) -> f64 {
        let [std, convex, inv] = mix;
        let mut out = 0.0;
        if std > 0.0 {
            let x = rescale(sac, SAC_MIN, SAC_MAX, -1.5, 2.0);
            let y = rescale(exp, EXP_MIN, EXP_MAX, -2.0, 2.0);
            let z1 = (-x * x - y * y).exp();
            let z2 = x - y + (-(x - 1.0).powi(2) - (y - 1.0).powi(2)).exp();
            out += std * rescale(-(z1 + z2) * 2.0, -8.0, 7.0, 150.0, 2000.0);
        }
        if convex > 0.0 {
            let x = rescale(sac, SAC_MIN, SAC_MAX, -1.0, 0.0);
            let y = rescale(exp, EXP_MIN, EXP_MAX, -1.0, 1.7);
            let z1 = (-x * x - y * y).exp();
            let z2 = (x - y) * (0.5 - 0.25 * x - 0.08 * x * y)
                + 5.0 * (-(x - 1.0).powi(2) / 5.0 - (y - 1.0).powi(2) / 8.0).exp();
            out += convex * rescale(-(z1 + z2) * 2.0, -9.28, 0.52, 150.0, 2000.0);
        }
        if inv > 0.0 {
            let x = rescale(sac, SAC_MIN, SAC_MAX, -3.0, 3.0);
            let y = rescale(exp, EXP_MIN, EXP_MAX, -2.0, 2.0);
            let z1 = (-x * x - y * y).exp();
            let z2 = x + y + 0.3 * (-(x - 1.0).powi(2) - (y - 1.0).powi(2)).exp();
            out += inv * rescale((z1 + z2) * 2.0, -10.0, 10.0, 150.0, 2000.0);
        }
        out
    }
}

/// Linear map of `[vmin, vmax]` onto `[smin, smax]`.
fn rescale(val: f64, vmin: f64, vmax: f64, smin: f64, smax: f64) -> f64 {
    smin + (smax - smin) * (val - vmin) / (vmax - vmin)
}

impl Surrogate for MockSurrogate {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn n_features(&self) -> usize {
        INPUT_NAMES.len()
    }

    fn input_index(&self, name: &str) -> Option<usize> {
        INPUT_NAMES.iter().position(|n| *n == name)
    }

    fn daily_to_features(&self) -> &DailyToSurrogate {
        &self.transform
    }

    fn estimate(&self, features: &[Array2<f64>]) -> SurrogateResult<Array2<f64>> {
        if features.len() != INPUT_NAMES.len() {
            return Err(SurrogateError::InputCountMismatch {
                expected: INPUT_NAMES.len(),
                found: features.len(),
            });
        }
        let rows = features[0].nrows();
        let cols = self.transform.feature_len();
        for (input, f) in features.iter().enumerate() {
            if f.dim() != (rows, cols) {
                return Err(SurrogateError::FeatureShape {
                    input,
                    expected: (rows, cols),
                    found: f.dim(),
                });
            }
        }
        Ok(Array2::from_shape_fn((rows, 1), |(r, _)| {
            let mix = [features[2][[r, 0]], features[3][[r, 0]], features[4][[r, 0]]];
            Self::kernel(features[0][[r, 0]], features[1][[r, 0]], mix)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Hand-computed kernel values of the three surfaces.
    // - Monotonicity of the standard surface used by control tests.
    // - Shape checks in `estimate`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Kernel values match independent evaluations of the formulas.
    //
    // Given
    // -----
    // - (5000, 500) on the standard surface; (15000, 7250) on convex,
    //   inverse and a 0.2/0.3/0.5 blend.
    //
    // Expect
    // ------
    // - ≈ 1012.857, 705.002, 1267.511, 1003.571.
    fn kernel_reference_values() {
        // Act & Assert
        assert_abs_diff_eq!(MockSurrogate::kernel(5000.0, 500.0, [1.0, 0.0, 0.0]), 1012.857_096, epsilon = 1e-5);
        assert_abs_diff_eq!(MockSurrogate::kernel(15000.0, 7250.0, [0.0, 1.0, 0.0]), 705.001_663, epsilon = 1e-5);
        assert_abs_diff_eq!(MockSurrogate::kernel(15000.0, 7250.0, [0.0, 0.0, 1.0]), 1267.511_108, epsilon = 1e-5);
        assert_abs_diff_eq!(MockSurrogate::kernel(15000.0, 7250.0, [0.2, 0.3, 0.5]), 1003.570_847, epsilon = 1e-5);
        assert_eq!(MockSurrogate::kernel(15000.0, 7250.0, [0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // The standard surface falls with inflow and rises with exports over
    // the feasibility grid.
    //
    // Given
    // -----
    // - sac in {4000, 10000, 16000, 22000}, exp in {800, 6800, 12800}.
    //
    // Expect
    // ------
    // - Strictly decreasing along sac, strictly increasing along exp.
    fn standard_surface_is_monotone_on_grid() {
        // Arrange
        let sac = [4000.0, 10000.0, 16000.0, 22000.0];
        let exp = [800.0, 6800.0, 12800.0];
        let k = |s: f64, e: f64| MockSurrogate::kernel(s, e, [1.0, 0.0, 0.0]);

        // Act & Assert
        for e in exp {
            for w in sac.windows(2) {
                assert!(k(w[0], e) > k(w[1], e));
            }
        }
        for s in sac {
            for w in exp.windows(2) {
                assert!(k(s, w[0]) < k(s, w[1]));
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // `estimate` checks feature shapes and evaluates the current day.
    //
    // Given
    // -----
    // - Window of 3 days; one well-formed batch of 2 rows and one with a
    //   2-column matrix.
    //
    // Expect
    // ------
    // - Output (2, 1) equal to the kernel at column 0; `FeatureShape` for
    //   the malformed input.
    fn estimate_checks_shapes() {
        // Arrange
        let mock = MockSurrogate::new(3).expect("mock");
        let mut features = vec![
            Array2::from_elem((2, 3), 15000.0),
            Array2::from_elem((2, 3), 7250.0),
            Array2::from_elem((2, 3), 0.2),
            Array2::from_elem((2, 3), 0.3),
            Array2::from_elem((2, 3), 0.5),
        ];

        // Act
        let out = mock.estimate(&features).expect("estimate");
        features[4] = Array2::zeros((2, 2));
        let err = mock.estimate(&features).unwrap_err();

        // Assert
        assert_eq!(out.dim(), (2, 1));
        assert_abs_diff_eq!(out[[1, 0]], 1003.570_847, epsilon = 1e-5);
        assert_eq!(err, SurrogateError::FeatureShape { input: 4, expected: (2, 3), found: (2, 2) });
        assert_eq!(mock.input_index("mix_convex"), Some(3));
    }
}
