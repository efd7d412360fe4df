//! timeseries::errors — error surface for calendar, disaggregation and
//! aggregation helpers.
//!
//! Purpose
//! -------
//! Collect every failure that can arise while reshaping monthly histories
//! into daily series (and back) into a single enum, [`SeriesError`], with a
//! matching result alias [`SeriesResult`]. Higher layers (`surrogate`,
//! `control`, `manager`) wrap this enum rather than re-declaring variants.
//!
//! Key behaviors
//! -------------
//! - Distinguish calendar mistakes (bad month, empty window) from data
//!   mistakes (history too short, operating-day counts out of range) and
//!   from exogenous-source range errors.
//! - Provide human-readable `Display` messages that embed the offending
//!   values so logs are useful without extra context.
//!
//! Conventions
//! -----------
//! - Variants carry small `Copy` payloads or `String`s; the enum is cheap to
//!   clone and comparable with `PartialEq` for tests.
//! - Requests that would reach before the first available month or day are
//!   rejected with an error; nothing is wrapped or clamped silently.

/// Result alias for time-series reshaping operations.
pub type SeriesResult<T> = Result<T, SeriesError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesError {
    // ---- Calendar ----
    /// Month must be in 1..=12.
    InvalidMonth { month: u32 },

    /// Year/month combination that chrono cannot represent.
    InvalidDate { year: i32, month: u32, day: u32 },

    /// A window must cover at least one month.
    EmptyWindow,

    // ---- Monthly histories ----
    /// Reverse-chronological row shorter than the disaggregation window.
    HistoryTooShort { needed: usize, found: usize },

    /// Operating-day count outside `[0, days_in_month]`.
    InvalidOperatingDays { value: f64, days_in_month: u32 },

    /// Monthly value is NaN or infinite.
    NonFiniteMonthly { index: usize, value: f64 },

    // ---- Daily windows ----
    /// Requested index range reaches outside the daily buffer.
    WindowOutOfRange { start: isize, stop: isize, len: usize },

    /// Aggregation window holds no days.
    EmptyAggregationWindow { start: usize, stop: usize },

    /// Rank for an order statistic must lie in `1..=len`.
    RankOutOfRange { rank: usize, len: usize },

    /// Feature transform parameters must be positive.
    InvalidTransform { reason: &'static str },

    /// Aggregation-type code with no matching statistic.
    UnknownAggregationCode { code: i32 },

    /// Aggregation parameter (threshold or rank) is not usable.
    InvalidAggregationParam { value: f64, reason: &'static str },

    // ---- Exogenous data ----
    /// Unknown column name in an exogenous table.
    UnknownColumn { name: String },

    /// Column index outside the exogenous table.
    ColumnOutOfRange { index: usize, n_columns: usize },

    /// Slice request outside the loaded exogenous series.
    ExogenousOutOfRange { start: String, n_day: usize, loaded_from: String, loaded_len: usize },

    /// Columns of an exogenous table have different lengths.
    RaggedColumns { expected: usize, found: usize, column: usize },
}

impl std::error::Error for SeriesError {}

impl std::fmt::Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Calendar ----
            SeriesError::InvalidMonth { month } => {
                write!(f, "Invalid month {month}: must be in 1..=12")
            }
            SeriesError::InvalidDate { year, month, day } => {
                write!(f, "Invalid calendar date {year:04}-{month:02}-{day:02}")
            }
            SeriesError::EmptyWindow => {
                write!(f, "Disaggregation window must span at least one month")
            }

            // ---- Monthly histories ----
            SeriesError::HistoryTooShort { needed, found } => {
                write!(
                    f,
                    "Monthly history too short: window needs {needed} months, row has {found}"
                )
            }
            SeriesError::InvalidOperatingDays { value, days_in_month } => {
                write!(f, "Operating days {value} outside [0, {days_in_month}]")
            }
            SeriesError::NonFiniteMonthly { index, value } => {
                write!(f, "Non-finite monthly value at lag {index}: {value}")
            }

            // ---- Daily windows ----
            SeriesError::WindowOutOfRange { start, stop, len } => {
                write!(f, "Daily window [{start}, {stop}) outside buffer of length {len}")
            }
            SeriesError::EmptyAggregationWindow { start, stop } => {
                write!(f, "Aggregation window [{start}, {stop}) is empty")
            }
            SeriesError::RankOutOfRange { rank, len } => {
                write!(f, "Rank {rank} outside 1..={len}")
            }
            SeriesError::InvalidTransform { reason } => {
                write!(f, "Invalid daily-to-feature transform: {reason}")
            }
            SeriesError::UnknownAggregationCode { code } => {
                write!(f, "Unknown aggregation code {code}")
            }
            SeriesError::InvalidAggregationParam { value, reason } => {
                write!(f, "Invalid aggregation parameter {value}: {reason}")
            }

            // ---- Exogenous data ----
            SeriesError::UnknownColumn { name } => {
                write!(f, "Unknown exogenous column '{name}'")
            }
            SeriesError::ColumnOutOfRange { index, n_columns } => {
                write!(f, "Exogenous column index {index} outside table with {n_columns} columns")
            }
            SeriesError::ExogenousOutOfRange { start, n_day, loaded_from, loaded_len } => {
                write!(
                    f,
                    "Exogenous slice of {n_day} days from {start} outside loaded series \
                     ({loaded_len} days from {loaded_from})"
                )
            }
            SeriesError::RaggedColumns { expected, found, column } => {
                write!(f, "Exogenous column {column} has {found} rows, expected {expected}")
            }
        }
    }
}
