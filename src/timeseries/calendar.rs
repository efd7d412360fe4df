//! Calendar arithmetic shared by every monthly/daily reshaping routine.
//!
//! A [`MonthWindow`] describes the `n_month` most recent months ending at a
//! given (year, month), current month inclusive. Monthly histories arrive
//! reverse-chronologically (lag 0 = current month) while daily buffers run
//! forward in time with day 0 = first day of the oldest month in the window,
//! so most helpers here translate between those two orders.
//!
//! All month arithmetic goes through `chrono` so leap years and year
//! boundaries are handled by the calendar rather than by hand-written tables.
use chrono::{Datelike, Months, NaiveDate};

use crate::timeseries::errors::{SeriesError, SeriesResult};

/// First day of `(year, month)`.
///
/// # Errors
/// - [`SeriesError::InvalidMonth`] if `month` is not in `1..=12`.
/// - [`SeriesError::InvalidDate`] if chrono cannot represent the date.
pub fn month_start(year: i32, month: u32) -> SeriesResult<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(SeriesError::InvalidMonth { month });
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(SeriesError::InvalidDate { year, month, day: 1 })
}

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Number of calendar days in `(year, month)`.
pub fn days_in_month(year: i32, month: u32) -> SeriesResult<u32> {
    let first = month_start(year, month)?;
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or(SeriesError::InvalidDate { year, month, day: 1 })?;
    Ok(next.signed_duration_since(first).num_days() as u32)
}

/// The month `k` months before `(year, month)`, as `(year, month)`.
pub fn months_back(year: i32, month: u32, k: u32) -> SeriesResult<(i32, u32)> {
    let first = month_start(year, month)?;
    let back = first
        .checked_sub_months(Months::new(k))
        .ok_or(SeriesError::InvalidDate { year, month, day: 1 })?;
    Ok((back.year(), back.month()))
}

/// Month boundaries and forward-ordered values of a monthly history.
///
/// - `knots` has `n_month + 1` entries: cumulative day offsets of each month
///   start plus the end of the current month.
/// - `values` has `n_month + 1` entries: the monthly values oldest first,
///   followed by a repeat of the current month's value (open right boundary).
#[derive(Debug, Clone, PartialEq)]
pub struct IrregularSeries {
    pub knots: Vec<f64>,
    pub values: Vec<f64>,
}

impl IrregularSeries {
    /// Number of months represented (one less than the knot count).
    pub fn n_month(&self) -> usize {
        self.knots.len().saturating_sub(1)
    }

    /// Length in days of month `i` (forward order).
    pub fn month_len(&self, i: usize) -> usize {
        (self.knots[i + 1] - self.knots[i]) as usize
    }
}

/// The `n_month` most recent months ending at a target month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthWindow {
    n_month: usize,
}

impl MonthWindow {
    /// Build a window spanning `n_month` months, current month inclusive.
    ///
    /// # Errors
    /// [`SeriesError::EmptyWindow`] if `n_month == 0`.
    pub fn new(n_month: usize) -> SeriesResult<Self> {
        if n_month == 0 {
            return Err(SeriesError::EmptyWindow);
        }
        Ok(Self { n_month })
    }

    pub fn n_month(&self) -> usize {
        self.n_month
    }

    /// Days per month, most recent first (index 0 = `(year, month)`).
    pub fn days_per_month(&self, year: i32, month: u32) -> SeriesResult<Vec<u32>> {
        (0..self.n_month)
            .map(|lag| {
                let (y, m) = months_back(year, month, lag as u32)?;
                days_in_month(y, m)
            })
            .collect()
    }

    /// Total number of days spanned by the window.
    pub fn n_day(&self, year: i32, month: u32) -> SeriesResult<usize> {
        Ok(self.days_per_month(year, month)?.iter().map(|&d| d as usize).sum())
    }

    /// Index of day 1 of the current month inside the window's daily buffer.
    pub fn offset_first_month(&self, year: i32, month: u32) -> SeriesResult<usize> {
        Ok(self.days_per_month(year, month)?.iter().skip(1).map(|&d| d as usize).sum())
    }

    /// Oldest month covered by the window.
    pub fn start_month(&self, year: i32, month: u32) -> SeriesResult<(i32, u32)> {
        months_back(year, month, (self.n_month - 1) as u32)
    }

    /// First calendar day covered by the window.
    pub fn start_date(&self, year: i32, month: u32) -> SeriesResult<NaiveDate> {
        let (y, m) = self.start_month(year, month)?;
        month_start(y, m)
    }

    /// Check that a reverse-chronological row covers the window with finite values.
    pub fn check_history(&self, data_rev: &[f64]) -> SeriesResult<()> {
        if data_rev.len() < self.n_month {
            return Err(SeriesError::HistoryTooShort {
                needed: self.n_month,
                found: data_rev.len(),
            });
        }
        if let Some((index, &value)) =
            data_rev.iter().take(self.n_month).enumerate().find(|(_, v)| !v.is_finite())
        {
            return Err(SeriesError::NonFiniteMonthly { index, value });
        }
        Ok(())
    }

    /// Convert a reverse-chronological monthly row into an [`IrregularSeries`].
    ///
    /// # Errors
    /// - [`SeriesError::HistoryTooShort`] if the row has fewer than `n_month`
    ///   entries.
    /// - [`SeriesError::NonFiniteMonthly`] for NaN/infinite values inside the
    ///   window.
    pub fn irregular_series(
        &self, year: i32, month: u32, data_rev: &[f64],
    ) -> SeriesResult<IrregularSeries> {
        self.check_history(data_rev)?;
        let days = self.days_per_month(year, month)?;
        let n = self.n_month;

        let mut knots = Vec::with_capacity(n + 1);
        let mut values = Vec::with_capacity(n + 1);
        knots.push(0.0);
        for i in 0..n {
            let rev = n - 1 - i;
            let last = knots[i];
            knots.push(last + f64::from(days[rev]));
            values.push(data_rev[rev]);
        }
        values.push(data_rev[0]);
        Ok(IrregularSeries { knots, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Leap-year and month-length rules across century boundaries.
    // - Reverse-chronological month lengths, window length and the offset of
    //   the current month, including windows that cross a year boundary.
    // - Knot/value layout of `irregular_series`.
    // - Rejection of short or non-finite histories.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check the Gregorian leap-year rule on the usual corner cases.
    //
    // Given
    // -----
    // - Years 1900, 2000, 2023, 2024.
    //
    // Expect
    // ------
    // - Only 2000 and 2024 are leap years; February lengths follow.
    fn leap_years_follow_gregorian_rule() {
        // Act / Assert
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(2023));
        assert!(is_leap_year(2024));
        assert_eq!(days_in_month(2024, 2).expect("valid month"), 29);
        assert_eq!(days_in_month(1900, 2).expect("valid month"), 28);
        assert_eq!(days_in_month(2023, 12).expect("valid month"), 31);
    }

    #[test]
    // Purpose
    // -------
    // Verify window lengths and the offset of the current month for a
    // five-month window ending in March of a leap year.
    //
    // Given
    // -----
    // - `MonthWindow::new(5)` evaluated at (2024, 3).
    //
    // Expect
    // ------
    // - Month lengths [31, 29, 31, 31, 30], 152 days, offset 121.
    fn window_lengths_for_leap_year_march() {
        // Arrange
        let window = MonthWindow::new(5).expect("window should be valid");

        // Act
        let days = window.days_per_month(2024, 3).expect("days");
        let n_day = window.n_day(2024, 3).expect("n_day");
        let offset = window.offset_first_month(2024, 3).expect("offset");

        // Assert
        assert_eq!(days, vec![31, 29, 31, 31, 30]);
        assert_eq!(n_day, 152);
        assert_eq!(offset, 121);
    }

    #[test]
    // Purpose
    // -------
    // Ensure windows crossing a year boundary start in the previous year.
    //
    // Given
    // -----
    // - A three-month window ending in January 2021.
    //
    // Expect
    // ------
    // - Start month is November 2020, start date 2020-11-01.
    fn window_start_crosses_year_boundary() {
        // Arrange
        let window = MonthWindow::new(3).expect("window should be valid");

        // Act
        let start = window.start_month(2021, 1).expect("start month");
        let date = window.start_date(2021, 1).expect("start date");

        // Assert
        assert_eq!(start, (2020, 11));
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 11, 1).expect("date"));
    }

    #[test]
    // Purpose
    // -------
    // Check the knot/value layout of the irregular series.
    //
    // Given
    // -----
    // - A five-month window at (2024, 3) and a reverse-chronological row
    //   [5, 4, 3, 2, 1, 99] (extra lag ignored).
    //
    // Expect
    // ------
    // - Knots [0, 30, 61, 92, 121, 152]; values [1, 2, 3, 4, 5, 5].
    fn irregular_series_reverses_and_repeats_current_value() {
        // Arrange
        let window = MonthWindow::new(5).expect("window should be valid");
        let data_rev = [5.0, 4.0, 3.0, 2.0, 1.0, 99.0];

        // Act
        let ts = window.irregular_series(2024, 3, &data_rev).expect("series");

        // Assert
        assert_eq!(ts.knots, vec![0.0, 30.0, 61.0, 92.0, 121.0, 152.0]);
        assert_eq!(ts.values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 5.0]);
        assert_eq!(ts.n_month(), 5);
        assert_eq!(ts.month_len(3), 29);
    }

    #[test]
    // Purpose
    // -------
    // Requests that reach before the first available month are rejected.
    //
    // Given
    // -----
    // - A five-month window and a three-entry row.
    //
    // Expect
    // ------
    // - `HistoryTooShort { needed: 5, found: 3 }`.
    fn short_history_is_rejected() {
        // Arrange
        let window = MonthWindow::new(5).expect("window should be valid");

        // Act
        let err = window.irregular_series(2024, 3, &[1.0, 2.0, 3.0]).unwrap_err();

        // Assert
        assert_eq!(err, SeriesError::HistoryTooShort { needed: 5, found: 3 });
    }

    #[test]
    // Purpose
    // -------
    // Invalid months and empty windows are configuration errors.
    //
    // Given
    // -----
    // - Month 13 and a zero-month window.
    //
    // Expect
    // ------
    // - `InvalidMonth` and `EmptyWindow` respectively.
    fn invalid_month_and_empty_window_are_errors() {
        // Act / Assert
        assert_eq!(days_in_month(2024, 13).unwrap_err(), SeriesError::InvalidMonth { month: 13 });
        assert_eq!(MonthWindow::new(0).unwrap_err(), SeriesError::EmptyWindow);
    }
}
