use crate::{
    control::inverse::OUT_OF_RANGE_SENTINEL,
    manager::errors::{ManagerError, ManagerResult},
    optimization::line_search::BrentOptions,
};

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Coarse grid of the two control inputs used to classify feasibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub lo0: f64,
    pub hi0: f64,
    pub n0: usize,
    pub lo1: f64,
    pub hi1: f64,
    pub n1: usize,
}

impl GridSpec {
    /// # Errors
    /// [`ManagerError::InvalidOptions`] unless both axes are finite with
    /// `lo < hi` and have at least one point.
    pub fn new(lo0: f64, hi0: f64, n0: usize, lo1: f64, hi1: f64, n1: usize) -> ManagerResult<Self> {
        for (lo, hi) in [(lo0, hi0), (lo1, hi1)] {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(ManagerError::InvalidOptions { reason: "grid bounds must be finite" });
            }
            if lo >= hi {
                return Err(ManagerError::InvalidOptions { reason: "grid lower bound must be below upper bound" });
            }
        }
        if n0 == 0 || n1 == 0 {
            return Err(ManagerError::InvalidOptions { reason: "grid needs at least one point per axis" });
        }
        Ok(Self { lo0, hi0, n0, lo1, hi1, n1 })
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self { lo0: 4000.0, hi0: 22000.0, n0: 4, lo1: 800.0, hi1: 12800.0, n1: 3 }
    }
}

/// Configuration of a [`crate::manager::service::SalinityManager`].
///
/// - `grid`: coarse feasibility grid for `line_gen`.
/// - `cache_capacity`: entries per memo table.
/// - `sentinel`: magnitude reported by `required_flow` for roots outside
///   the search bounds.
/// - `cycle`: model cycle recorded in cache keys.
/// - `brent`: root-finder settings for `required_flow`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManagerOptions {
    pub grid: GridSpec,
    pub cache_capacity: usize,
    pub sentinel: f64,
    pub cycle: i32,
    pub brent: BrentOptions,
}

impl ManagerOptions {
    /// # Errors
    /// [`ManagerError::InvalidOptions`] for a zero capacity or a sentinel
    /// that is not finite and positive.
    pub fn new(
        grid: GridSpec, cache_capacity: usize, sentinel: f64, cycle: i32, brent: BrentOptions,
    ) -> ManagerResult<Self> {
        if cache_capacity == 0 {
            return Err(ManagerError::InvalidOptions { reason: "cache capacity must be positive" });
        }
        if !sentinel.is_finite() || sentinel <= 0.0 {
            return Err(ManagerError::InvalidOptions { reason: "sentinel must be finite and positive" });
        }
        Ok(Self { grid, cache_capacity, sentinel, cycle, brent })
    }
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            sentinel: OUT_OF_RANGE_SENTINEL,
            cycle: 0,
            brent: BrentOptions::default(),
        }
    }
}
