//! Actual curvature estimation
//!
//! Two sources are available: the vehicle model evaluated at the measured
//! steering angle, and the yaw rate divided by speed. The yaw rate is more
//! direct but is useless at very low speed, so the estimates are blended on
//! speed.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths::interp;

use super::{LocEstimate, RoadParams, VehicleState};
use crate::vehicle_model::VehicleModel;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Speed breakpoints over which the estimate moves from the vehicle model to
/// the yaw rate.
///
/// Units: meters/second
pub const CURVATURE_BLEND_BP_MS: [f64; 2] = [2.0, 5.0];

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Estimate the curvature currently driven by the vehicle.
///
/// If `use_steering_angle` is set only the vehicle model is used.
///
/// The speed must be non-zero unless `use_steering_angle` is set. Lateral
/// control only calls this above the minimum steer speed.
pub fn estimate_curvature(
    vm: &dyn VehicleModel,
    vehicle: &VehicleState,
    road: &RoadParams,
    loc: &LocEstimate,
    use_steering_angle: bool
) -> f64 {
    let model_curv_m = model_curvature(vm, vehicle, road);

    if use_steering_angle {
        model_curv_m
    }
    else {
        let yaw_curv_m = loc.yaw_rate_rads / vehicle.v_ego_ms;
        blend_curvature(vehicle.v_ego_ms, model_curv_m, yaw_curv_m)
    }
}

/// Curvature from the vehicle model at the offset-corrected steering angle.
///
/// The model's sign is flipped into the convention used by lateral control.
pub fn model_curvature(vm: &dyn VehicleModel, vehicle: &VehicleState, road: &RoadParams) -> f64 {
    -vm.calc_curvature(
        (vehicle.steering_angle_deg - road.angle_offset_deg).to_radians(),
        vehicle.v_ego_ms,
        road.roll_rad
    )
}

/// Blend the model and yaw rate curvatures on speed.
pub fn blend_curvature(v_ego_ms: f64, model_curv_m: f64, yaw_curv_m: f64) -> f64 {
    interp(v_ego_ms, &CURVATURE_BLEND_BP_MS, &[model_curv_m, yaw_curv_m])
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::vehicle_model::{Params, SingleTrackModel};

    fn vm() -> SingleTrackModel {
        SingleTrackModel::new(Params {
            steer_ratio: 15.0,
            wheelbase_m: 2.7,
            slip_factor: 0.0,
        })
    }

    fn vehicle(v_ego_ms: f64, steering_angle_deg: f64) -> VehicleState {
        VehicleState {
            v_ego_ms,
            steering_angle_deg,
            ..Default::default()
        }
    }

    #[test]
    fn test_model_curvature_sign_and_offset() {
        let vm = vm();
        let road = RoadParams { angle_offset_deg: 2.0, roll_rad: 0.0 };

        let curv = model_curvature(&vm, &vehicle(10.0, 12.0), &road);
        let expected = -(10f64.to_radians()) / (15.0 * 2.7);
        assert!((curv - expected).abs() < 1e-12);

        // At the offset angle there is no curvature
        assert_eq!(model_curvature(&vm, &vehicle(10.0, 2.0), &road), 0.0);
    }

    #[test]
    fn test_steering_angle_only() {
        let vm = vm();
        let road = RoadParams::default();
        let loc = LocEstimate { yaw_rate_rads: 0.5 };
        let veh = vehicle(20.0, 5.0);

        assert_eq!(
            estimate_curvature(&vm, &veh, &road, &loc, true),
            model_curvature(&vm, &veh, &road)
        );
    }

    #[test]
    fn test_blend_boundaries() {
        let vm = vm();
        let road = RoadParams::default();
        let loc = LocEstimate { yaw_rate_rads: 0.1 };

        // At 2 m/s exactly the model curvature
        let veh = vehicle(2.0, 30.0);
        assert_eq!(
            estimate_curvature(&vm, &veh, &road, &loc, false),
            model_curvature(&vm, &veh, &road)
        );

        // At 5 m/s exactly the yaw rate curvature
        let veh = vehicle(5.0, 30.0);
        assert_eq!(estimate_curvature(&vm, &veh, &road, &loc, false), 0.1 / 5.0);

        // Above that the model is ignored
        let veh = vehicle(25.0, 30.0);
        assert_eq!(estimate_curvature(&vm, &veh, &road, &loc, false), 0.1 / 25.0);
    }

    #[test]
    fn test_blend_linear_and_monotonic() {
        let model = -0.02;
        let yaw = 0.04;

        assert!((blend_curvature(3.5, model, yaw) - 0.01).abs() < 1e-12);

        let mut last = blend_curvature(2.0, model, yaw);
        for k in 1..=30 {
            let v = 2.0 + 0.1 * k as f64;
            let c = blend_curvature(v, model, yaw);
            assert!(c >= last, "blend decreased at {} m/s", v);
            last = c;
        }
        assert_eq!(blend_curvature(5.0, model, yaw), yaw);
    }
}
