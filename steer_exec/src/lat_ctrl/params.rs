//! Parameters structure for LatCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for torque based lateral control.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {

    // ---- TIMING ----

    /// Period of the control cycle, used as the integration step.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    // ---- ACTIVATION ----

    /// Below this speed lateral control is inactive and commands no torque.
    ///
    /// Units: meters/second
    pub min_steer_speed_ms: f64,

    // ---- ACTUATOR ----

    /// Maximum normalised torque command.
    pub steer_max: f64,

    // ---- INITIAL TUNING ----

    /// Lateral acceleration achieved at maximum torque, from which all
    /// controller gains are derived.
    ///
    /// Units: meters/second^2
    pub max_lat_accel_ms2: f64,

    /// Friction compensation bias.
    ///
    /// Units: normalised torque
    pub friction: f64,

    /// If true the actual curvature is estimated from the steering angle only,
    /// otherwise it is blended with the yaw rate.
    pub use_steering_angle: bool
}

impl Default for Params {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.01,
            min_steer_speed_ms: 0.3,
            steer_max: 1.0,
            max_lat_accel_ms2: 2.5,
            friction: 0.1,
            use_steering_angle: true
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_shipped_params() {
        let params: Params = util::params::from_str(
            include_str!("../../../params/lat_ctrl_torque.toml")
        ).unwrap();

        assert_eq!(params.cycle_period_s, 0.01);
        assert_eq!(params.steer_max, 1.0);
        assert_eq!(params.max_lat_accel_ms2, 2.5);
        assert!(params.use_steering_angle);
    }

    #[test]
    fn test_missing_field() {
        assert!(util::params::from_str::<Params>("cycle_period_s = 0.01").is_err());
    }
}
