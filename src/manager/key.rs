//! Cache keys for manager evaluations.
//!
//! An [`EvaluationKey`] identifies one surrogate evaluation by the surrogate,
//! the current-month feature values, calendar position, averaging type and
//! a small set of context integers. Floating-point fields compare and hash
//! by bit pattern, so equal inputs always hit and `NaN` placeholders match
//! themselves.
use std::hash::{Hash, Hasher};

/// Context code for cached line constraints.
pub const CONTEXT_CONSTRAINT: i32 = 2192;
/// Context code for grid and gradient evaluations behind `line_gen`.
pub const CONTEXT_LINEGEN: i32 = 1392;
/// Context code reserved for standalone grid evaluations.
pub const CONTEXT_GRID: i32 = 1592;
/// Context code reserved for standalone gradient evaluations.
pub const CONTEXT_GRADIENT: i32 = 1792;
/// Context code for monthly estimates.
pub const CONTEXT_ANNEC: i32 = 1993;
/// Context code for required-flow inversions.
pub const CONTEXT_REQFLOW: i32 = 2093;
/// Context code for tests.
pub const CONTEXT_TEST: i32 = 3093;

/// Location slot for evaluations shared by every output location.
pub const LOC_UNSPEC: i32 = -1;

#[derive(Debug, Clone)]
pub struct EvaluationKey {
    pub surrogate: String,
    pub features: Vec<f64>,
    pub int0: i32,
    pub int1: i32,
    pub context: i32,
    pub year: i32,
    pub month: u32,
    pub cycle: i32,
    pub ave_type: i32,
    pub ave_param: Option<f64>,
}

impl EvaluationKey {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        surrogate: &str, features: Vec<f64>, int0: i32, int1: i32, context: i32, year: i32,
        month: u32, cycle: i32, ave_type: i32,
    ) -> Self {
        Self {
            surrogate: surrogate.to_string(),
            features,
            int0,
            int1,
            context,
            year,
            month,
            cycle,
            ave_type,
            ave_param: None,
        }
    }

    pub fn with_ave_param(mut self, ave_param: Option<f64>) -> Self {
        self.ave_param = ave_param;
        self
    }

    fn float_bits(&self) -> impl Iterator<Item = u64> + '_ {
        self.features.iter().map(|v| v.to_bits())
    }
}

impl PartialEq for EvaluationKey {
    fn eq(&self, other: &Self) -> bool {
        self.surrogate == other.surrogate
            && self.int0 == other.int0
            && self.int1 == other.int1
            && self.context == other.context
            && self.year == other.year
            && self.month == other.month
            && self.cycle == other.cycle
            && self.ave_type == other.ave_type
            && self.ave_param.map(f64::to_bits) == other.ave_param.map(f64::to_bits)
            && self.features.len() == other.features.len()
            && self.float_bits().eq(other.float_bits())
    }
}

impl Eq for EvaluationKey {}

impl Hash for EvaluationKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.surrogate.hash(state);
        self.features.len().hash(state);
        for bits in self.float_bits() {
            bits.hash(state);
        }
        (self.int0, self.int1, self.context, self.year, self.month, self.cycle, self.ave_type).hash(state);
        self.ave_param.map(f64::to_bits).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Bitwise equality of floating-point fields.
    // - Sensitivity to every discriminating field.
    // -------------------------------------------------------------------------

    fn key(features: Vec<f64>) -> EvaluationKey {
        EvaluationKey::new("s", features, 1, 0, CONTEXT_ANNEC, 1990, 2, 0, 1)
    }

    #[test]
    // Purpose
    // -------
    // Keys built from equal values are equal and collapse in a set;
    // NaN matches NaN, while 0.0 and -0.0 differ.
    //
    // Given
    // -----
    // - Feature vectors [1, NaN], [1, NaN], [0.0] and [-0.0].
    //
    // Expect
    // ------
    // - Three distinct keys.
    fn bitwise_float_equality() {
        // Arrange
        let keys = [key(vec![1.0, f64::NAN]), key(vec![1.0, f64::NAN]), key(vec![0.0]), key(vec![-0.0])];

        // Act
        let set: HashSet<_> = keys.iter().cloned().collect();

        // Assert
        assert_eq!(keys[0], keys[1]);
        assert_ne!(keys[2], keys[3]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Context, calendar and averaging parameter all discriminate keys.
    //
    // Given
    // -----
    // - A base key and variants differing in one field each.
    //
    // Expect
    // ------
    // - Every variant differs from the base.
    fn every_field_discriminates() {
        // Arrange
        let base = key(vec![5.0]);
        let mut other_context = base.clone();
        other_context.context = CONTEXT_LINEGEN;
        let mut other_month = base.clone();
        other_month.month = 3;
        let with_param = base.clone().with_ave_param(Some(7.0));

        // Act & Assert
        assert_ne!(base, other_context);
        assert_ne!(base, other_month);
        assert_ne!(base, with_param);
        assert_eq!(with_param, base.clone().with_ave_param(Some(7.0)));
    }
}
