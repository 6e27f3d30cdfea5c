//! Lateral acceleration error and feedforward
//!
//! Torque applied to the steering rack correlates with the lateral
//! acceleration achieved by the vehicle, so the controller works in the
//! lateral acceleration domain. At low speed lateral acceleration barely
//! changes with curvature, so a speed dependent multiple of the curvature is
//! added to both the setpoint and the measurement to keep the loop from
//! losing authority near standstill.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use util::maths::interp;

use super::{DesiredPath, VehicleState};
use crate::vehicle_model::ACCELERATION_DUE_TO_GRAVITY;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Speed breakpoints for the low speed factor.
///
/// Units: meters/second
pub const LOW_SPEED_FACTOR_BP_MS: [f64; 2] = [0.0, 15.0];

/// Low speed factor values at `LOW_SPEED_FACTOR_BP_MS`.
///
/// Units: meters^2/second^2
pub const LOW_SPEED_FACTOR_V: [f64; 2] = [500.0, 0.0];

/// Below this speed the integrator is always frozen.
///
/// Units: meters/second
pub const FREEZE_INTEGRATOR_SPEED_MS: f64 = 5.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Error and feedforward formed for one cycle.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct AccelError {
    /// `setpoint - measurement`
    pub error: f64,

    /// Desired lateral acceleration less the component due to road roll.
    pub feedforward: f64,

    pub setpoint: f64,
    pub measurement: f64,

    /// Units: meters/second^2
    pub desired_lat_accel: f64,

    /// Units: meters/second^3
    pub desired_lat_jerk: f64,

    /// Units: meters/second^2
    pub actual_lat_accel: f64,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Weight given to curvature in the error at the given speed.
pub fn low_speed_factor(v_ego_ms: f64) -> f64 {
    interp(v_ego_ms, &LOW_SPEED_FACTOR_BP_MS, &LOW_SPEED_FACTOR_V)
}

/// Form the error and feedforward from the desired and actual curvatures.
pub fn form_error(
    desired: &DesiredPath,
    actual_curv_m: f64,
    v_ego_ms: f64,
    roll_rad: f64
) -> AccelError {
    let v_sq = v_ego_ms.powi(2);

    let desired_lat_accel = desired.curvature_m * v_sq;
    let desired_lat_jerk = desired.curvature_rate_ms * v_sq;
    let actual_lat_accel = actual_curv_m * v_sq;

    let lsf = low_speed_factor(v_ego_ms);
    let setpoint = desired_lat_accel + lsf * desired.curvature_m;
    let measurement = actual_lat_accel + lsf * actual_curv_m;

    AccelError {
        error: setpoint - measurement,
        feedforward: desired_lat_accel - roll_rad * ACCELERATION_DUE_TO_GRAVITY,
        setpoint,
        measurement,
        desired_lat_accel,
        desired_lat_jerk,
        actual_lat_accel,
    }
}

/// Whether the integrator shall hold this cycle.
///
/// The loop has no authority over the actuator while the driver is steering
/// or the actuator is rate limited, and the integral is not trusted at low
/// speed.
pub fn freeze_integrator(vehicle: &VehicleState) -> bool {
    vehicle.steering_rate_limited
        || vehicle.steering_pressed
        || vehicle.v_ego_ms < FREEZE_INTEGRATOR_SPEED_MS
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
