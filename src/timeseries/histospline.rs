//! Mass-conservative histospline for monthly → daily disaggregation.
//!
//! Purpose
//! -------
//! Turn a sequence of monthly means on irregular (calendar) intervals into a
//! smooth daily profile whose integral over every month equals the monthly
//! value times the month length. This is the defining property of the
//! spline disaggregator and is preserved exactly up to floating rounding.
//!
//! Key behaviors
//! -------------
//! - Fit a C¹ cubic Hermite interpolant to the *cumulative* mass `M(x)` at
//!   the month knots. Because `M` is matched exactly at every knot, any
//!   daily sampling of the form `M(d + 1) − M(d)` conserves each month's
//!   total.
//! - Knot derivatives (densities):
//!   - left boundary = first knot value,
//!   - right boundary = last knot value (the trailing repeat of the current
//!     month),
//!   - interior knots = width-weighted average of the adjacent monthly means.
//! - Apply a Fritsch–Carlson limiter to the floor-shifted mass
//!   `G(x) = M(x) − floor·x`, so the density never dips below `floor` while
//!   the monthly means stay above it.
//!
//! Invariants & assumptions
//! ------------------------
//! - Knots are strictly increasing integer day offsets starting at 0, as
//!   produced by [`MonthWindow::irregular_series`](crate::timeseries::calendar::MonthWindow::irregular_series).
//! - `values.len() == knots.len()`: one mean per month plus the trailing
//!   boundary value.
//!
//! Conventions
//! -----------
//! - Daily output index `d` covers the half-open interval `[d, d + 1)`.
//! - The output has exactly one value per calendar day in the window.
use crate::timeseries::{
    calendar::IrregularSeries,
    errors::{SeriesError, SeriesResult},
};

/// Default density floor used by the spline disaggregator.
pub const DEFAULT_FLOOR: f64 = -1e-8;

/// Fitted histospline over a monthly window.
#[derive(Debug, Clone, PartialEq)]
pub struct Histospline {
    knots: Vec<f64>,
    /// Floor-shifted cumulative mass `G` at each knot.
    shifted_mass: Vec<f64>,
    /// Derivative of `G` at each knot (density minus floor).
    slopes: Vec<f64>,
    floor: f64,
}

impl Histospline {
    /// Fit the spline to an irregular monthly series.
    ///
    /// # Errors
    /// - [`SeriesError::InvalidTransform`] if `floor` is not finite or the
    ///   knots are not strictly increasing.
    /// - [`SeriesError::EmptyWindow`] if the series holds no months.
    pub fn fit(series: &IrregularSeries, floor: f64) -> SeriesResult<Self> {
        if !floor.is_finite() {
            return Err(SeriesError::InvalidTransform { reason: "spline floor must be finite" });
        }
        let n = series.n_month();
        if n == 0 || series.values.len() != n + 1 {
            return Err(SeriesError::EmptyWindow);
        }
        let knots = series.knots.clone();
        let widths: Vec<f64> = knots.windows(2).map(|w| w[1] - w[0]).collect();
        if widths.iter().any(|&w| w <= 0.0) {
            return Err(SeriesError::InvalidTransform { reason: "knots must be strictly increasing" });
        }

        // Secant slopes of G on each month.
        let delta: Vec<f64> = series.values[..n].iter().map(|v| v - floor).collect();

        let mut shifted_mass = Vec::with_capacity(n + 1);
        shifted_mass.push(0.0);
        for i in 0..n {
            let last = shifted_mass[i];
            shifted_mass.push(last + delta[i] * widths[i]);
        }

        let mut slopes = vec![0.0; n + 1];
        slopes[0] = series.values[0] - floor;
        slopes[n] = series.values[n] - floor;
        for k in 1..n {
            slopes[k] =
                (widths[k - 1] * delta[k - 1] + widths[k] * delta[k]) / (widths[k - 1] + widths[k]);
        }
        limit_slopes(&delta, &mut slopes);

        Ok(Self { knots, shifted_mass, slopes, floor })
    }

    /// Total length of the window in days.
    pub fn span(&self) -> f64 {
        self.knots.last().copied().unwrap_or(0.0)
    }

    /// Cumulative mass `M(x)` from the start of the window; clamped to the
    /// window.
    pub fn cumulative(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, self.span());
        let k = self.segment(x);
        self.eval_shifted(k, x) + self.floor * x
    }

    /// Density (instantaneous daily rate) at `x`.
    pub fn density(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, self.span());
        let k = self.segment(x);
        let h = self.knots[k + 1] - self.knots[k];
        let t = (x - self.knots[k]) / h;
        let (g0, g1) = (self.shifted_mass[k], self.shifted_mass[k + 1]);
        let (d0, d1) = (self.slopes[k], self.slopes[k + 1]);
        let dh00 = 6.0 * t * t - 6.0 * t;
        let dh10 = 3.0 * t * t - 4.0 * t + 1.0;
        let dh01 = -dh00;
        let dh11 = 3.0 * t * t - 2.0 * t;
        (dh00 * g0 + dh01 * g1) / h + dh10 * d0 + dh11 * d1 + self.floor
    }

    /// One value per whole day of the window: `M(d + 1) − M(d)`.
    pub fn daily_means(&self) -> Vec<f64> {
        let n_day = self.span() as usize;
        let mut out = Vec::with_capacity(n_day);
        let mut prev = 0.0;
        for d in 1..=n_day {
            let next = self.cumulative(d as f64);
            out.push(next - prev);
            prev = next;
        }
        out
    }

    fn segment(&self, x: f64) -> usize {
        let last = self.knots.len() - 2;
        match self.knots.iter().position(|&k| k > x) {
            Some(0) => 0,
            Some(i) => (i - 1).min(last),
            None => last,
        }
    }

    fn eval_shifted(&self, k: usize, x: f64) -> f64 {
        let h = self.knots[k + 1] - self.knots[k];
        let t = (x - self.knots[k]) / h;
        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;
        h00 * self.shifted_mass[k]
            + h10 * h * self.slopes[k]
            + h01 * self.shifted_mass[k + 1]
            + h11 * h * self.slopes[k + 1]
    }
}

/// Fritsch–Carlson limiter: keeps each Hermite segment monotone in the
/// direction of its secant slope.
fn limit_slopes(delta: &[f64], slopes: &mut [f64]) {
    for (i, &di) in delta.iter().enumerate() {
        if di == 0.0 {
            slopes[i] = 0.0;
            slopes[i + 1] = 0.0;
            continue;
        }
        if slopes[i] * di < 0.0 {
            slopes[i] = 0.0;
        }
        if slopes[i + 1] * di < 0.0 {
            slopes[i + 1] = 0.0;
        }
        let alpha = slopes[i] / di;
        let beta = slopes[i + 1] / di;
        let radius = alpha * alpha + beta * beta;
        if radius > 9.0 {
            let tau = 3.0 / radius.sqrt();
            slopes[i] = tau * alpha * di;
            slopes[i + 1] = tau * beta * di;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeseries::calendar::MonthWindow;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Exact reproduction of a constant history.
    // - Month-by-month mass conservation for a varying history.
    // - The density floor for a history with a large spike next to a
    //   near-zero month.
    // -------------------------------------------------------------------------

    fn fit(year: i32, month: u32, data_rev: &[f64]) -> Histospline {
        let window = MonthWindow::new(data_rev.len()).expect("window");
        let series = window.irregular_series(year, month, data_rev).expect("series");
        Histospline::fit(&series, DEFAULT_FLOOR).expect("fit")
    }

    #[test]
    // Purpose
    // -------
    // A flat monthly history should disaggregate to a flat daily series.
    //
    // Given
    // -----
    // - Five months of 250.0 ending at (2023, 6).
    //
    // Expect
    // ------
    // - 151 daily values, all 250.0.
    fn constant_history_is_reproduced() {
        // Arrange
        let spline = fit(2023, 6, &[250.0; 5]);

        // Act
        let daily = spline.daily_means();

        // Assert
        assert_eq!(daily.len(), 151);
        for v in daily {
            assert_abs_diff_eq!(v, 250.0, epsilon = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // Each calendar month of the daily output integrates to its monthly
    // value times the month length.
    //
    // Given
    // -----
    // - A varying five-month history ending at (2024, 3).
    //
    // Expect
    // ------
    // - Month sums match within 1e-8 relative tolerance.
    fn months_conserve_mass() {
        // Arrange
        let data_rev = [12000.0, 18000.0, 9000.0, 4000.0, 6500.0];
        let spline = fit(2024, 3, &data_rev);
        let window = MonthWindow::new(5).expect("window");
        let days = window.days_per_month(2024, 3).expect("days");

        // Act
        let daily = spline.daily_means();

        // Assert
        let mut start = 0usize;
        for lag in (0..5).rev() {
            let len = days[lag] as usize;
            let sum: f64 = daily[start..start + len].iter().sum();
            assert_abs_diff_eq!(sum, data_rev[lag] * len as f64, epsilon = 1e-6);
            start += len;
        }
        assert_eq!(start, daily.len());
    }

    #[test]
    // Purpose
    // -------
    // The limiter keeps the daily profile above the floor next to a spike.
    //
    // Given
    // -----
    // - History with a 5000 spike between months of 0.0.
    //
    // Expect
    // ------
    // - Every daily value ≥ floor (within rounding).
    fn spike_does_not_undershoot_floor() {
        // Arrange
        let spline = fit(2022, 8, &[0.0, 0.0, 5000.0, 0.0, 0.0]);

        // Act
        let daily = spline.daily_means();

        // Assert
        for v in daily {
            assert!(v >= DEFAULT_FLOOR - 1e-9, "value {v} below floor");
        }
    }

    #[test]
    // Purpose
    // -------
    // The boundary density matches the first knot value.
    //
    // Given
    // -----
    // - History whose oldest month is 100.0.
    //
    // Expect
    // ------
    // - `density(0) == 100`.
    fn left_boundary_density_uses_first_value() {
        // Arrange
        let spline = fit(2021, 5, &[300.0, 200.0, 100.0]);

        // Act
        let d0 = spline.density(0.0);

        // Assert
        assert_abs_diff_eq!(d0, 100.0, epsilon = 1e-9);
    }
}
