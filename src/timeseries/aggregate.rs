//! Daily → monthly aggregation statistics.
//!
//! Purpose
//! -------
//! Reduce a daily surrogate output to one monthly scalar. Each statistic is
//! a variant of [`MonthlyAggregator`]; parameterized statistics (rank,
//! threshold) carry their parameter inside the variant, so an aggregator
//! value is immutable and can be shared across threads. Callers that need a
//! different parameter build a new value with [`MonthlyAggregator::with_param`].
//!
//! Window conventions
//! ------------------
//! `aggregate(daily, first_month_index, start_day, end_day)` nominally
//! covers `[first_month_index + start_day − 1, first_month_index + end_day)`.
//! - `Max14d` uses that nominal window.
//! - `Mean`, `Max`, `NthSmallest` and `CountBelow` always use `[0, end_day)`,
//!   i.e. they ignore `first_month_index` and `start_day`. Callers hand these
//!   a month-local buffer.
//! - `Max14d` skips days whose 14-day backward window would start before
//!   `first_month_index`; if no day qualifies the result is [`NO_MAX`].
//!
//! Codes
//! -----
//! Optimization-model aggregation codes: mean = 1, max = 4,
//! max 14-day running mean = 66, n-th smallest = 77, count below = 99.
use crate::timeseries::errors::{SeriesError, SeriesResult};

/// Initial value of the running maximum; returned when nothing qualifies.
pub const NO_MAX: f64 = -9999.0;

/// Slack added to the count-below threshold to absorb rounding.
pub const COUNT_EPSILON: f64 = 1e-13;

/// Length of the backward running mean used by [`MonthlyAggregator::Max14d`].
pub const RUNNING_MEAN_DAYS: usize = 14;

/// Monthly statistic computed from a daily series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonthlyAggregator {
    Mean,
    Max,
    Max14d,
    NthSmallest { n: usize },
    CountBelow { threshold: f64 },
}

impl MonthlyAggregator {
    pub const MEAN_CODE: i32 = 1;
    pub const MAX_CODE: i32 = 4;
    pub const MAX_14D_CODE: i32 = 66;
    pub const NTH_SMALLEST_CODE: i32 = 77;
    pub const COUNT_BELOW_CODE: i32 = 99;

    /// Optimization-model code for this statistic.
    pub fn code(&self) -> i32 {
        match self {
            MonthlyAggregator::Mean => Self::MEAN_CODE,
            MonthlyAggregator::Max => Self::MAX_CODE,
            MonthlyAggregator::Max14d => Self::MAX_14D_CODE,
            MonthlyAggregator::NthSmallest { .. } => Self::NTH_SMALLEST_CODE,
            MonthlyAggregator::CountBelow { .. } => Self::COUNT_BELOW_CODE,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MonthlyAggregator::Mean => "monthly average",
            MonthlyAggregator::Max => "maximum daily value",
            MonthlyAggregator::Max14d => "maximum 14-day running average",
            MonthlyAggregator::NthSmallest { .. } => "n-th smallest daily value",
            MonthlyAggregator::CountBelow { .. } => "number of days below threshold",
        }
    }

    /// Build the statistic for an optimization-model code.
    ///
    /// `param` is the rank for `NthSmallest` and the threshold for
    /// `CountBelow`; other statistics ignore it.
    ///
    /// # Errors
    /// - [`SeriesError::UnknownAggregationCode`] for unknown codes.
    /// - [`SeriesError::InvalidAggregationParam`] when `param` is unusable.
    pub fn from_code(code: i32, param: f64) -> SeriesResult<Self> {
        let base = match code {
            Self::MEAN_CODE => MonthlyAggregator::Mean,
            Self::MAX_CODE => MonthlyAggregator::Max,
            Self::MAX_14D_CODE => MonthlyAggregator::Max14d,
            Self::NTH_SMALLEST_CODE => MonthlyAggregator::NthSmallest { n: 1 },
            Self::COUNT_BELOW_CODE => MonthlyAggregator::CountBelow { threshold: 0.0 },
            _ => return Err(SeriesError::UnknownAggregationCode { code }),
        };
        base.with_param(param)
    }

    /// Return a copy with its parameter replaced.
    ///
    /// Only `NthSmallest` (rank, rounded to the nearest integer ≥ 1) and
    /// `CountBelow` (threshold) have a parameter; others are returned as is.
    pub fn with_param(self, param: f64) -> SeriesResult<Self> {
        match self {
            MonthlyAggregator::NthSmallest { .. } => {
                if !param.is_finite() || param.round() < 1.0 {
                    return Err(SeriesError::InvalidAggregationParam {
                        value: param,
                        reason: "rank must be a finite integer >= 1",
                    });
                }
                Ok(MonthlyAggregator::NthSmallest { n: param.round() as usize })
            }
            MonthlyAggregator::CountBelow { .. } => {
                if !param.is_finite() {
                    return Err(SeriesError::InvalidAggregationParam {
                        value: param,
                        reason: "threshold must be finite",
                    });
                }
                Ok(MonthlyAggregator::CountBelow { threshold: param })
            }
            other => Ok(other),
        }
    }

    /// Reduce `daily` to a monthly scalar.
    ///
    /// # Errors
    /// - [`SeriesError::WindowOutOfRange`] if the window exceeds `daily`.
    /// - [`SeriesError::EmptyAggregationWindow`] for empty windows.
    /// - [`SeriesError::RankOutOfRange`] if the rank exceeds the window.
    pub fn aggregate(
        &self, daily: &[f64], first_month_index: usize, start_day: usize, end_day: usize,
    ) -> SeriesResult<f64> {
        match *self {
            MonthlyAggregator::Mean => {
                let window = leading_window(daily, end_day)?;
                Ok(window.iter().sum::<f64>() / window.len() as f64)
            }
            MonthlyAggregator::Max => {
                let window = leading_window(daily, end_day)?;
                Ok(window.iter().fold(NO_MAX, |m, &v| if v > m { v } else { m }))
            }
            MonthlyAggregator::Max14d => {
                let (start, stop) = nominal_window(daily, first_month_index, start_day, end_day)?;
                let first_full = first_month_index + RUNNING_MEAN_DAYS - 1;
                let mut max = NO_MAX;
                for i in start.max(first_full)..stop {
                    let lo = i + 1 - RUNNING_MEAN_DAYS;
                    let mean = daily[lo..=i].iter().sum::<f64>() / RUNNING_MEAN_DAYS as f64;
                    if mean > max {
                        max = mean;
                    }
                }
                Ok(max)
            }
            MonthlyAggregator::NthSmallest { n } => {
                let window = leading_window(daily, end_day)?;
                if n == 0 || n > window.len() {
                    return Err(SeriesError::RankOutOfRange { rank: n, len: window.len() });
                }
                let mut ordered = window.to_vec();
                ordered.sort_by(f64::total_cmp);
                Ok(ordered[n - 1])
            }
            MonthlyAggregator::CountBelow { threshold } => {
                let window = leading_window(daily, end_day)?;
                Ok(window.iter().filter(|&&v| v <= threshold + COUNT_EPSILON).count() as f64)
            }
        }
    }
}

fn leading_window(daily: &[f64], end_day: usize) -> SeriesResult<&[f64]> {
    if end_day == 0 {
        return Err(SeriesError::EmptyAggregationWindow { start: 0, stop: 0 });
    }
    if end_day > daily.len() {
        return Err(SeriesError::WindowOutOfRange {
            start: 0,
            stop: end_day as isize,
            len: daily.len(),
        });
    }
    Ok(&daily[..end_day])
}

fn nominal_window(
    daily: &[f64], first_month_index: usize, start_day: usize, end_day: usize,
) -> SeriesResult<(usize, usize)> {
    let start = first_month_index as isize + start_day as isize - 1;
    let stop = first_month_index as isize + end_day as isize;
    if start < 0 || stop as usize > daily.len() {
        return Err(SeriesError::WindowOutOfRange { start, stop, len: daily.len() });
    }
    if stop <= start {
        return Err(SeriesError::EmptyAggregationWindow {
            start: start as usize,
            stop: stop.max(0) as usize,
        });
    }
    Ok((start as usize, stop as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeseries::disaggregate::MonthlyDisaggregator;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Count-below and n-th smallest on a small fixed series.
    // - The forced `[0, end)` window of the mean versus the nominal window of
    //   the max.
    // - The bounded 14-day running mean.
    // - Repeat-disaggregation round trip through the mean.
    // - Code lookup and parameter replacement.
    // -------------------------------------------------------------------------

    const DATA2: [f64; 10] = [62.0, 66.0, 72.0, 85.0, 91.0, 90.0, 88.0, 84.0, 86.0, 91.0];

    #[test]
    // Purpose
    // -------
    // Count-below includes values equal to the threshold.
    //
    // Given
    // -----
    // - DATA2 and threshold 86.
    //
    // Expect
    // ------
    // - Six days counted.
    fn count_below_includes_threshold() {
        // Arrange
        let agg = MonthlyAggregator::CountBelow { threshold: 86.0 };

        // Act
        let count = agg.aggregate(&DATA2, 0, 1, DATA2.len()).expect("aggregate");

        // Assert
        assert_eq!(count, 6.0);
    }

    #[test]
    // Purpose
    // -------
    // The n-th smallest uses a 1-based rank over the sorted window.
    //
    // Given
    // -----
    // - DATA2 and rank 5.
    //
    // Expect
    // ------
    // - 85.0; rank 11 is rejected.
    fn nth_smallest_uses_one_based_rank() {
        // Arrange
        let agg = MonthlyAggregator::from_code(77, 5.0).expect("code");

        // Act
        let fifth = agg.aggregate(&DATA2, 0, 1, DATA2.len()).expect("aggregate");
        let err = MonthlyAggregator::NthSmallest { n: 11 }
            .aggregate(&DATA2, 0, 1, DATA2.len())
            .unwrap_err();

        // Assert
        assert_eq!(fifth, 85.0);
        assert_eq!(err, SeriesError::RankOutOfRange { rank: 11, len: 10 });
    }

    #[test]
    // Purpose
    // -------
    // Mean, max and count ignore the month offset and start day.
    //
    // Given
    // -----
    // - daily = 1..=10, first_month_index = 5, start_day = 1, end_day = 4.
    // - daily = [1, 2, 3, 100, 200], first_month_index = 2, start_day = 1,
    //   end_day = 2.
    //
    // Expect
    // ------
    // - Mean of [1, 2, 3, 4] = 2.5; max of [1, 2, 3, 4] = 4; count ≤ 3 = 3.
    // - Max of [1, 2] = 2, not the offset window's 100.
    fn mean_max_and_count_force_leading_window() {
        // Arrange
        let daily: Vec<f64> = (1..=10).map(f64::from).collect();
        let spiky = [1.0, 2.0, 3.0, 100.0, 200.0];

        // Act
        let mean = MonthlyAggregator::Mean.aggregate(&daily, 5, 1, 4).expect("mean");
        let max = MonthlyAggregator::Max.aggregate(&daily, 5, 1, 4).expect("max");
        let count = MonthlyAggregator::CountBelow { threshold: 3.0 }.aggregate(&daily, 5, 1, 4).expect("count");
        let spiky_max = MonthlyAggregator::Max.aggregate(&spiky, 2, 1, 2).expect("max");

        // Assert
        assert_abs_diff_eq!(mean, 2.5, epsilon = 1e-12);
        assert_eq!(max, 4.0);
        assert_eq!(count, 3.0);
        assert_eq!(spiky_max, 2.0);
    }

    #[test]
    // Purpose
    // -------
    // The 14-day running mean only counts days whose window stays inside the
    // month.
    //
    // Given
    // -----
    // - Ramp daily[i] = i for i in 0..118, window (85, 1, 20).
    //
    // Expect
    // ------
    // - Qualifying days 98..=104; max mean = mean(91..=104) = 97.5.
    fn max_14d_bounds_window_to_month() {
        // Arrange
        let daily: Vec<f64> = (0..118).map(f64::from).collect();

        // Act
        let value = MonthlyAggregator::Max14d.aggregate(&daily, 85, 1, 20).expect("max14");
        let none = MonthlyAggregator::Max14d.aggregate(&daily, 0, 1, 10).expect("max14");

        // Assert
        assert_abs_diff_eq!(value, 97.5, epsilon = 1e-12);
        assert_eq!(none, NO_MAX);
    }

    #[test]
    // Purpose
    // -------
    // Mean of a repeat-disaggregated month recovers the monthly value.
    //
    // Given
    // -----
    // - Repeat over five months ending (2024, 2), row [17.25, 3, 4, 5, 6].
    //
    // Expect
    // ------
    // - Mean over the current month's 29 days = 17.25.
    fn repeat_round_trip_through_mean() {
        // Arrange
        let disagg = MonthlyDisaggregator::repeat(5).expect("valid");
        let daily = disagg.apply(2024, 2, &[17.25, 3.0, 4.0, 5.0, 6.0]).expect("apply");
        let offset = disagg.offset_first_month(2024, 2).expect("offset");

        // Act
        let mean = MonthlyAggregator::Mean.aggregate(&daily[offset..], 0, 1, 29).expect("mean");

        // Assert
        assert_abs_diff_eq!(mean, 17.25, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Codes map to variants and unknown codes are rejected.
    //
    // Given
    // -----
    // - Codes 1, 66, 99 (threshold 2.5) and 42.
    //
    // Expect
    // ------
    // - Matching variants; `UnknownAggregationCode` for 42.
    fn codes_round_trip() {
        // Act / Assert
        assert_eq!(MonthlyAggregator::from_code(1, f64::NAN).expect("mean"), MonthlyAggregator::Mean);
        assert_eq!(MonthlyAggregator::from_code(66, 0.0).expect("max14").code(), 66);
        assert_eq!(
            MonthlyAggregator::from_code(99, 2.5).expect("count"),
            MonthlyAggregator::CountBelow { threshold: 2.5 }
        );
        assert_eq!(
            MonthlyAggregator::from_code(42, 0.0).unwrap_err(),
            SeriesError::UnknownAggregationCode { code: 42 }
        );
    }
}
