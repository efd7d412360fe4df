//! Integration tests for the monthly surrogate pipeline and manager.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path from monthly histories, through
//!   disaggregation, one batched surrogate call and aggregation, to the
//!   planning-model queries served by `SalinityManager`.
//! - Use surrogates with closed-form answers so results can be checked
//!   exactly rather than for plausibility only.
//!
//! Coverage
//! --------
//! - `surrogate::month::SurrogateMonth`:
//!   - `ann_month` and `evaluate_on_grid` with spline disaggregation.
//! - `control::linear::LinearConstraint`:
//!   - Batched gradient against `finitediff` and wider central differences.
//! - `manager::service::SalinityManager`:
//!   - Cache idempotence across repeated and cross-location queries.
//!   - Constraint generation for mixed months, including the fallback when
//!     the alternative point has unexpected gradient signs.
//!   - Required flow by inversion.
//! - `manager::registry::SurrogateRegistry` registration policy.
//!
//! Exclusions
//! ----------
//! - Calendar, disaggregation and aggregation edge cases, which are
//!   covered by unit tests in `timeseries`.
//! - Root-finder internals; see `optimization::line_search`.
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use approx::assert_abs_diff_eq;
use finitediff::FiniteDiff;
use ndarray::{array, Array1, Array2};
use salinity_surrogate::{
    control::linear::{LinearConstraint, D_X_INDEX, D_Y_INDEX, VALUE_INDEX},
    manager::{errors::ManagerError, service::SalinityManager},
    surrogate::{
        errors::{SurrogateError, SurrogateResult},
        mock::MockSurrogate,
        month::SurrogateMonth,
        traits::Surrogate,
        types::MonthlyInputs,
    },
    timeseries::{
        aggregate::MonthlyAggregator, disaggregate::MonthlyDisaggregator,
        features::DailyToSurrogate,
    },
};

const EMM: i32 = 3;
const JER: i32 = 1;
const MEAN: i32 = MonthlyAggregator::MEAN_CODE;

/// Purpose
/// -------
/// Two-output surrogate that is affine in the current day's inflow and
/// exports, counting how often it is called.
///
/// Outputs
/// -------
/// - Column 0: `2000 − 0.05·sac + 0.08·exp`.
/// - Column 1: `800 − 0.02·sac + 0.03·exp`.
///
/// Invariants
/// ----------
/// - Because spline disaggregation conserves each month's mass, the
///   monthly mean of either output equals the plane evaluated at the
///   monthly inputs.
struct Plane {
    transform: DailyToSurrogate,
    calls: Arc<AtomicUsize>,
}

const PLANE: [[f64; 3]; 2] = [[2000.0, -0.05, 0.08], [800.0, -0.02, 0.03]];

fn plane(out: usize, sac: f64, exp: f64) -> f64 {
    let [c, a, b] = PLANE[out];
    c + a * sac + b * exp
}

impl Surrogate for Plane {
    fn identifier(&self) -> &str {
        "plane"
    }

    fn n_features(&self) -> usize {
        2
    }

    fn daily_to_features(&self) -> &DailyToSurrogate {
        &self.transform
    }

    fn estimate(&self, features: &[Array2<f64>]) -> SurrogateResult<Array2<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if features.len() != 2 {
            return Err(SurrogateError::InputCountMismatch { expected: 2, found: features.len() });
        }
        Ok(Array2::from_shape_fn((features[0].nrows(), 2), |(r, out)| {
            plane(out, features[0][[r, 0]], features[1][[r, 0]])
        }))
    }
}

/// Purpose
/// -------
/// Build a spline-disaggregated, mean-aggregated month around [`Plane`]
/// over a 4-month window, returning the call counter alongside.
fn plane_month() -> (Arc<SurrogateMonth>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let surrogate = Arc::new(Plane {
        transform: DailyToSurrogate::window(1, true).expect("window of one day should be valid"),
        calls: calls.clone(),
    });
    let spline = MonthlyDisaggregator::spline(4).expect("4-month spline should be valid");
    let month = SurrogateMonth::new(vec![Some(spline), Some(spline)], MonthlyAggregator::Mean, surrogate)
        .expect("plane month should build");
    (Arc::new(month), calls)
}

/// Purpose
/// -------
/// Monthly histories for [`Plane`]: one batch row with current inflow
/// `sac` and exports `exp` after three months of steady history.
fn plane_inputs(sac: f64, exp: f64) -> MonthlyInputs {
    vec![array![[sac, 12000.0, 11000.0, 10000.0]], array![[exp, 6000.0, 6500.0, 7000.0]]]
}

/// Purpose
/// -------
/// Mock month with repeat disaggregation, so each month's daily values
/// equal its monthly value and the monthly mean equals the kernel.
fn mock_month() -> Arc<SurrogateMonth> {
    let mock = Arc::new(MockSurrogate::new(3).expect("mock should build"));
    let repeat = MonthlyDisaggregator::repeat(2).expect("repeat should be valid");
    Arc::new(
        SurrogateMonth::new(vec![Some(repeat); 5], MonthlyAggregator::Mean, mock)
            .expect("mock month should build"),
    )
}

fn mock_inputs(sac: f64, exp: f64, mix: [f64; 3]) -> MonthlyInputs {
    vec![
        array![[sac, sac]],
        array![[exp, exp]],
        array![[mix[0], mix[0]]],
        array![[mix[1], mix[1]]],
        array![[mix[2], mix[2]]],
    ]
}

#[test]
// Purpose
// -------
// A batched monthly evaluation reproduces the plane at every batch row
// with a single surrogate call.
//
// Given
// -----
// - Two batch rows with current months (15000, 5000) and (9000, 3000),
//   February 1992 (leap year).
//
// Expect
// ------
// - Output shape (2, 2) with plane values; exactly one `estimate` call.
fn batched_monthly_mean_matches_plane() {
    // Arrange
    let (month, calls) = plane_month();
    let mut inputs = plane_inputs(15000.0, 5000.0);
    inputs[0] = array![[15000.0, 12000.0, 11000.0, 10000.0], [9000.0, 12000.0, 11000.0, 10000.0]];
    inputs[1] = array![[5000.0, 6000.0, 6500.0, 7000.0], [3000.0, 6000.0, 6500.0, 7000.0]];

    // Act
    let out = month.ann_month(&inputs, 1992, 2).expect("ann_month should succeed");

    // Assert
    assert_eq!(out.dim(), (2, 2));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    for (row, (sac, exp)) in [(15000.0, 5000.0), (9000.0, 3000.0)].into_iter().enumerate() {
        for col in 0..2 {
            assert_abs_diff_eq!(out[[row, col]], plane(col, sac, exp), epsilon = 1e-6);
        }
    }
}

#[test]
// Purpose
// -------
// Grid evaluation lays values out as `(n0, n1, n_out)` on even grids.
//
// Given
// -----
// - Plane month; grid 4×3 on [4000, 22000]×[800, 12800].
//
// Expect
// ------
// - Shape (4, 3, 2); every node equals the plane; one surrogate call.
fn grid_shape_and_values() {
    // Arrange
    let (month, calls) = plane_month();
    let inputs = plane_inputs(15000.0, 5000.0);

    // Act
    let grid = month
        .evaluate_on_grid(&inputs, 1990, 6, 4000.0, 22000.0, 4, 800.0, 12800.0, 3)
        .expect("grid should evaluate");

    // Assert
    assert_eq!(grid.result.dim(), (4, 3, 2));
    assert_eq!(grid.x0, vec![4000.0, 10000.0, 16000.0, 22000.0]);
    assert_eq!(grid.x1, vec![800.0, 6800.0, 12800.0]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    for (i, &x) in grid.x0.iter().enumerate() {
        for (j, &y) in grid.x1.iter().enumerate() {
            for out in 0..2 {
                assert_abs_diff_eq!(grid.result[[i, j, out]], plane(out, x, y), epsilon = 1e-6);
            }
        }
    }
    assert!(grid.location_table(1).expect("table").contains("12800.00"));
}

#[test]
// Purpose
// -------
// The batched ±1 gradient agrees with `finitediff` on the analytic
// kernel and with wider ±10 / ±60 central differences of the monthly
// statistic.
//
// Given
// -----
// - Mock month (repeat, mean) at (15000, 7250) with a 0.2/0.3/0.5 blend.
//
// Expect
// ------
// - Value equals the kernel; derivatives within 1e-4 of `central_diff`
//   and within 1% of the ±10 and ±60 differences.
fn gradient_consistency() {
    // Arrange
    let month = mock_month();
    let mix = [0.2, 0.3, 0.5];
    let inputs = mock_inputs(15000.0, 7250.0, mix);
    let kernel = |p: &Array1<f64>| MockSurrogate::kernel(p[0], p[1], mix);
    let monthly = |sac: f64, exp: f64| {
        month.ann_month(&mock_inputs(sac, exp, mix), 1990, 2).expect("ann_month should succeed")[[0, 0]]
    };

    // Act
    let grad = LinearConstraint::new(&month).gradient(&inputs, 1990, 2).expect("gradient should succeed");
    let fd = array![15000.0, 7250.0].central_diff(&kernel);

    // Assert
    assert_eq!(grad.dim(), (1, 3));
    assert_abs_diff_eq!(grad[[0, VALUE_INDEX]], MockSurrogate::kernel(15000.0, 7250.0, mix), epsilon = 1e-9);
    assert_abs_diff_eq!(grad[[0, D_X_INDEX]], fd[0], epsilon = 1e-4);
    assert_abs_diff_eq!(grad[[0, D_Y_INDEX]], fd[1], epsilon = 1e-4);
    for h in [10.0, 60.0] {
        let dx = (monthly(15000.0 + h, 7250.0) - monthly(15000.0 - h, 7250.0)) / (2.0 * h);
        let dy = (monthly(15000.0, 7250.0 + h) - monthly(15000.0, 7250.0 - h)) / (2.0 * h);
        assert_abs_diff_eq!(grad[[0, D_X_INDEX]], dx, epsilon = 1e-2 * dx.abs());
        assert_abs_diff_eq!(grad[[0, D_Y_INDEX]], dy, epsilon = 1e-2 * dy.abs());
    }
}

#[test]
// Purpose
// -------
// Repeated and cross-location manager queries are served from the cache
// without further surrogate calls, and constraints on a plane are exact.
//
// Given
// -----
// - Plane month registered once for EMM (output 0) and JER (output 1).
// - Current month (15000, 5000); targets 1500 (EMM) and 700 (JER), both
//   strictly inside the grid's range.
//
// Expect
// ------
// - `ann_ec` for both locations costs one call in total.
// - EMM's constraint is (1500 − 2000, −0.05, 0.08) and costs two calls
//   (grid and gradient); JER reuses both.
fn manager_cache_idempotence() {
    // Arrange
    let (month, calls) = plane_month();
    let manager = SalinityManager::default();
    manager.register(EMM, MEAN, month.clone()).expect("register EMM");
    manager.register(JER, MEAN, month).expect("register JER");
    manager.set_output_index(EMM, 0).expect("index EMM");
    manager.set_output_index(JER, 1).expect("index JER");
    let inputs = plane_inputs(15000.0, 5000.0);

    // Act
    let emm = manager.ann_ec(&inputs, EMM, MEAN, 2, 1990, None).expect("ann_ec EMM");
    let emm_again = manager.ann_ec(&inputs, EMM, MEAN, 2, 1990, None).expect("ann_ec EMM again");
    let jer = manager.ann_ec(&inputs, JER, MEAN, 2, 1990, None).expect("ann_ec JER");
    let after_ann_ec = calls.load(Ordering::SeqCst);

    let coefs: Vec<f64> = (0..3)
        .map(|c| manager.line_gen(&inputs, EMM, c, MEAN, 2, 1990, 15000.0, 5000.0, 1500.0).expect("EMM"))
        .collect();
    let after_emm = calls.load(Ordering::SeqCst);
    let jer_rhs = manager.line_gen(&inputs, JER, 0, MEAN, 2, 1990, 15000.0, 5000.0, 700.0).expect("JER");

    // Assert
    assert_abs_diff_eq!(emm, plane(0, 15000.0, 5000.0), epsilon = 1e-6);
    assert_eq!(emm, emm_again);
    assert_abs_diff_eq!(jer, plane(1, 15000.0, 5000.0), epsilon = 1e-6);
    assert_eq!(after_ann_ec, 1);
    assert_eq!(after_emm, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_abs_diff_eq!(coefs[0], -500.0, epsilon = 1e-4);
    assert_abs_diff_eq!(coefs[1], -0.05, epsilon = 1e-8);
    assert_abs_diff_eq!(coefs[2], 0.08, epsilon = 1e-8);
    assert_abs_diff_eq!(jer_rhs, -100.0, epsilon = 1e-4);
}

#[test]
// Purpose
// -------
// When the nominal linearization excludes the high-inflow, low-export
// corner and the alternative grid point's gradient has the wrong signs,
// the never-feasible constraint is returned.
//
// Given
// -----
// - Mock month on the "inverse" surface (salinity rises with both flows).
// - Nominal (10000, 6800) with salinity ≈ 792; target 900. The grid is
//   mixed, the nominal linearization predicts ≈ 1327 at (22000, 800), and
//   the first alternative node is (10000, 800) with dS/dx > 0.
//
// Expect
// ------
// - (−(22000 − 800), −1, 1).
fn alternative_point_with_wrong_signs_is_never_feasible() {
    // Arrange
    let manager = SalinityManager::default();
    manager.register(EMM, MEAN, mock_month()).expect("register");
    manager.set_output_index(EMM, 0).expect("index");
    let inputs = mock_inputs(10000.0, 6800.0, [0.0, 0.0, 1.0]);

    // Act
    let coefs: Vec<f64> = (0..3)
        .map(|c| manager.line_gen(&inputs, EMM, c, MEAN, 2, 1990, 10000.0, 6800.0, 900.0).expect("coef"))
        .collect();

    // Assert
    assert_eq!(coefs, vec![-21200.0, -1.0, 1.0]);
}

#[test]
// Purpose
// -------
// Required flow inverts the plane exactly through spline disaggregation.
//
// Given
// -----
// - EMM output `2000 − 0.05·sac + 0.08·exp`, exports 5000, target 1000,
//   bounds [4000, 40000]; the stale current inflow in the inputs is
//   ignored.
//
// Expect
// ------
// - Flow ≈ 28000; a call with a different stale inflow hits the cache.
fn required_flow_inverts_plane() {
    // Arrange
    let (month, calls) = plane_month();
    let manager = SalinityManager::default();
    manager.register(EMM, MEAN, month).expect("register");
    manager.set_output_index(EMM, 0).expect("index");

    // Act
    let flow = manager
        .required_flow(1000.0, &plane_inputs(1.0, 5000.0), 4000.0, 40000.0, EMM, MEAN, 2, 1990, None)
        .expect("required flow");
    let before = calls.load(Ordering::SeqCst);
    let again = manager
        .required_flow(1000.0, &plane_inputs(99.0, 5000.0), 4000.0, 40000.0, EMM, MEAN, 2, 1990, None)
        .expect("cached required flow");

    // Assert
    assert_abs_diff_eq!(flow, 28000.0, epsilon = 0.6);
    assert_eq!(flow, again);
    assert_eq!(calls.load(Ordering::SeqCst), before);
}

#[test]
// Purpose
// -------
// Registration follows identity semantics and unknown keys are reported.
//
// Given
// -----
// - One month registered for EMM; a second, distinct month.
//
// Expect
// ------
// - Re-registering the same month is accepted; the distinct one is
//   `AlreadyRegistered`; querying JER is `NotRegistered`.
fn registry_policy_through_manager() {
    // Arrange
    let manager = SalinityManager::default();
    let (first, _) = plane_month();
    let (second, _) = plane_month();

    // Act
    manager.register(EMM, MEAN, first.clone()).expect("first registration");
    let same = manager.register(EMM, MEAN, first);
    let other = manager.register(EMM, MEAN, second);
    let missing = manager.ann_ec(&plane_inputs(1.0, 1.0), JER, MEAN, 2, 1990, None);

    // Assert
    assert!(same.is_ok());
    assert_eq!(other.unwrap_err(), ManagerError::AlreadyRegistered { location: EMM, ave_type: MEAN });
    assert_eq!(missing.unwrap_err(), ManagerError::NotRegistered { location: JER, ave_type: MEAN });
}
