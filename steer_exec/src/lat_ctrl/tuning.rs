//! Controller tuning
//!
//! All three controller gains are derived from a single maximum lateral
//! acceleration figure, so a `TuningConfig` can only be built through
//! `TuningConfig::new` and is never modified afterwards. Changing the tuning
//! means building a new value and swapping it in.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use super::PidController;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Proportional gain numerator, divided by the max lateral acceleration.
pub const K_P_FACTOR: f64 = 2.0;

/// Integral gain numerator, divided by the max lateral acceleration.
pub const K_I_FACTOR: f64 = 1.0;

/// Feedforward gain numerator, divided by the max lateral acceleration.
pub const K_F_FACTOR: f64 = 0.5;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A consistent set of tuning values for the torque controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TuningConfig {
    k_p: f64,
    k_i: f64,
    k_f: f64,
    friction: f64,
    max_lat_accel_ms2: f64,
    use_steering_angle: bool
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Tuning values that cannot be used.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TuningError {
    #[error("Max lateral acceleration must be finite and positive, got {0}")]
    InvalidMaxLatAccel(f64),

    #[error("Friction must be finite and non-negative, got {0}")]
    InvalidFriction(f64)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TuningConfig {
    /// Build the tuning for the given maximum lateral acceleration (in m/s^2)
    /// and friction (in normalised torque).
    pub fn new(
        max_lat_accel_ms2: f64,
        friction: f64,
        use_steering_angle: bool
    ) -> Result<Self, TuningError> {
        if !max_lat_accel_ms2.is_finite() || max_lat_accel_ms2 <= 0.0 {
            return Err(TuningError::InvalidMaxLatAccel(max_lat_accel_ms2))
        }
        if !friction.is_finite() || friction < 0.0 {
            return Err(TuningError::InvalidFriction(friction))
        }

        Ok(Self {
            k_p: K_P_FACTOR / max_lat_accel_ms2,
            k_i: K_I_FACTOR / max_lat_accel_ms2,
            k_f: K_F_FACTOR / max_lat_accel_ms2,
            friction,
            max_lat_accel_ms2,
            use_steering_angle
        })
    }

    /// Build a fresh controller from this tuning.
    ///
    /// Output limits are `[-steer_max, steer_max]`.
    pub fn build_pid(&self, steer_max: f64, cycle_period_s: f64) -> PidController {
        PidController::new(
            self.k_p,
            self.k_i,
            self.k_f,
            steer_max,
            -steer_max,
            cycle_period_s
        )
    }

    pub fn k_p(&self) -> f64 {
        self.k_p
    }

    pub fn k_i(&self) -> f64 {
        self.k_i
    }

    pub fn k_f(&self) -> f64 {
        self.k_f
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    pub fn max_lat_accel_ms2(&self) -> f64 {
        self.max_lat_accel_ms2
    }

    pub fn use_steering_angle(&self) -> bool {
        self.use_steering_angle
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_gains_derived_together() {
        let t = TuningConfig::new(2.5, 0.1, false).unwrap();

        assert_eq!(t.k_p(), 0.8);
        assert_eq!(t.k_i(), 0.4);
        assert_eq!(t.k_f(), 0.2);
        assert_eq!(t.friction(), 0.1);
        assert_eq!(t.max_lat_accel_ms2(), 2.5);
        assert!(!t.use_steering_angle());
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(TuningConfig::new(0.0, 0.1, false), Err(TuningError::InvalidMaxLatAccel(0.0)));
        assert_eq!(TuningConfig::new(-1.0, 0.1, false), Err(TuningError::InvalidMaxLatAccel(-1.0)));
        assert!(TuningConfig::new(std::f64::INFINITY, 0.1, false).is_err());
        assert!(TuningConfig::new(std::f64::NAN, 0.1, false).is_err());
        assert_eq!(TuningConfig::new(2.0, -0.1, false), Err(TuningError::InvalidFriction(-0.1)));
        assert!(TuningConfig::new(2.0, std::f64::NAN, false).is_err());
    }

    #[test]
    fn test_build_pid() {
        let t = TuningConfig::new(2.0, 0.0, true).unwrap();
        let pid = t.build_pid(1.0, 0.01);

        assert_eq!(pid.gains_at(0.0), (1.0, 0.5));
        assert_eq!(pid.k_f(), 0.25);
        assert_eq!(pid.limits(), (-1.0, 1.0));
        assert_eq!(pid.i(), 0.0);
    }
}
