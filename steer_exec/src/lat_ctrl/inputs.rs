//! Per-cycle inputs to lateral control

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Measured state of the vehicle.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct VehicleState {
    /// Forward speed of the vehicle.
    ///
    /// Units: meters/second
    pub v_ego_ms: f64,

    /// Steering wheel angle.
    ///
    /// Units: degrees
    pub steering_angle_deg: f64,

    /// True when the driver is applying torque to the steering wheel.
    pub steering_pressed: bool,

    /// True when the actuator rate limit was hit on the last command.
    pub steering_rate_limited: bool,
}

/// Output of localisation needed by lateral control.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct LocEstimate {
    /// Calibrated yaw rate of the vehicle, positive to the left.
    ///
    /// Units: radians/second
    pub yaw_rate_rads: f64,
}

/// Slowly varying road and calibration estimates.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
pub struct RoadParams {
    /// Steering angle sensor offset.
    ///
    /// Units: degrees
    pub angle_offset_deg: f64,

    /// Road roll (bank), positive when the road slopes down to the right.
    ///
    /// Units: radians
    pub roll_rad: f64,
}

/// The path lateral control shall follow on this cycle.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct DesiredPath {
    /// Units: 1/meters
    pub curvature_m: f64,

    /// Units: 1/meters/second
    pub curvature_rate_ms: f64,
}
