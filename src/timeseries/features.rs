//! Daily-series → surrogate feature transforms.
//!
//! A surrogate does not consume the raw daily buffer; it consumes a fixed
//! length feature vector built from the days ending at a "current" index.
//! The transform is dictated by the surrogate (see
//! [`Surrogate::daily_to_features`](crate::surrogate::traits::Surrogate::daily_to_features)).
//!
//! - [`DailyToSurrogate::Blocked`]: `n_daily` single days, most recent first,
//!   followed by `n_block` means of `block_len` days reaching further back,
//!   most recent block first. The classic layout is 7 days + 10 blocks of 11.
//! - [`DailyToSurrogate::Window`]: a plain window of `len` days ending at the
//!   current index, either reversed (current day first) or forward.
//!
//! Windows that reach before index 0 of the buffer are errors.
use crate::timeseries::errors::{SeriesError, SeriesResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DailyToSurrogate {
    Blocked { n_daily: usize, n_block: usize, block_len: usize },
    Window { len: usize, reverse: bool },
}

impl DailyToSurrogate {
    /// Individual days followed by block means.
    ///
    /// # Errors
    /// [`SeriesError::InvalidTransform`] if the vector would be empty or a
    /// block has zero length.
    pub fn blocked(n_daily: usize, n_block: usize, block_len: usize) -> SeriesResult<Self> {
        if n_daily + n_block == 0 {
            return Err(SeriesError::InvalidTransform { reason: "feature vector would be empty" });
        }
        if n_block > 0 && block_len == 0 {
            return Err(SeriesError::InvalidTransform { reason: "block length must be positive" });
        }
        Ok(DailyToSurrogate::Blocked { n_daily, n_block, block_len })
    }

    /// Plain window of `len` days ending at the current index.
    pub fn window(len: usize, reverse: bool) -> SeriesResult<Self> {
        if len == 0 {
            return Err(SeriesError::InvalidTransform { reason: "window length must be positive" });
        }
        Ok(DailyToSurrogate::Window { len, reverse })
    }

    /// Length of the produced feature vector.
    pub fn feature_len(&self) -> usize {
        match *self {
            DailyToSurrogate::Blocked { n_daily, n_block, .. } => n_daily + n_block,
            DailyToSurrogate::Window { len, .. } => len,
        }
    }

    /// Number of days before the current index that the transform reads.
    pub fn required_history(&self) -> usize {
        match *self {
            DailyToSurrogate::Blocked { n_daily, n_block, block_len } => {
                (n_daily + n_block * block_len).saturating_sub(1)
            }
            DailyToSurrogate::Window { len, .. } => len - 1,
        }
    }

    /// Feature vector for the day at `current`.
    ///
    /// # Errors
    /// [`SeriesError::WindowOutOfRange`] if the transform would read before
    /// index 0 or at/after the end of `daily`.
    pub fn features_at(&self, daily: &[f64], current: usize) -> SeriesResult<Vec<f64>> {
        let lookback = self.required_history();
        if current < lookback || current >= daily.len() {
            return Err(SeriesError::WindowOutOfRange {
                start: current as isize - lookback as isize,
                stop: current as isize + 1,
                len: daily.len(),
            });
        }
        let out = match *self {
            DailyToSurrogate::Blocked { n_daily, n_block, block_len } => {
                let mut out = Vec::with_capacity(n_daily + n_block);
                out.extend((0..n_daily).map(|lag| daily[current - lag]));
                for block in 0..n_block {
                    let start = current + 1 - n_daily - block_len * (block + 1);
                    let sum: f64 = daily[start..start + block_len].iter().sum();
                    out.push(sum / block_len as f64);
                }
                out
            }
            DailyToSurrogate::Window { len, reverse: true } => {
                (0..len).map(|lag| daily[current - lag]).collect()
            }
            DailyToSurrogate::Window { len, reverse: false } => {
                daily[current + 1 - len..=current].to_vec()
            }
        };
        Ok(out)
    }
}
