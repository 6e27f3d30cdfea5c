//! # Steering simulation
//!
//! A simple closed loop plant for exercising lateral control without a
//! vehicle. The steering angle responds to the commanded torque as a first
//! order system with a self aligning term, and the yaw rate follows from the
//! vehicle model.
//!
//! Sign conventions match lateral control: a positive output torque turns the
//! steering wheel towards positive angles, and the reported yaw rate is
//! positive in the direction of positive lateral control curvature.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use crate::lat_ctrl::{DesiredPath, LocEstimate, RoadParams, VehicleState};
use crate::vehicle_model::{SingleTrackModel, VehicleModel};
use util::maths::clamp;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the steering plant.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PlantParams {
    /// Steering wheel rate produced by full torque.
    ///
    /// Units: degrees/second
    pub torque_to_rate_degs: f64,

    /// Rate at which the wheel returns to centre, as a fraction of the current
    /// angle per second.
    ///
    /// Units: 1/seconds
    pub self_align_per_s: f64,

    /// Maximum rate of the steering wheel.
    ///
    /// Units: degrees/second
    pub max_rate_degs: f64,

    /// Speed the vehicle accelerates to from standstill.
    ///
    /// Units: meters/second
    pub cruise_speed_ms: f64,

    /// Units: meters/second^2
    pub accel_ms2: f64
}

/// First order steering plant on a vehicle.
#[derive(Debug, Clone)]
pub struct SteerPlant {
    params: PlantParams,

    vm: SingleTrackModel,

    /// Physical steering wheel angle, excluding any sensor offset.
    ///
    /// Units: degrees
    angle_deg: f64,

    /// Units: meters/second
    v_ego_ms: f64,

    /// True if the rate limit was hit on the last step
    rate_limited: bool
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Desired curvature as a function of time.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurvatureProfile {
    /// Units: 1/meters
    Constant {
        curvature_m: f64
    },

    /// Sinusoid starting at zero curvature.
    Sine {
        /// Units: 1/meters
        amplitude_m: f64,

        /// Units: seconds
        period_s: f64
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SteerPlant {
    /// Create a plant at standstill with the wheel centred.
    pub fn new(params: PlantParams, vm: SingleTrackModel) -> Self {
        Self {
            params,
            vm,
            angle_deg: 0.0,
            v_ego_ms: 0.0,
            rate_limited: false
        }
    }

    /// The vehicle model driving the plant.
    pub fn vm(&self) -> &SingleTrackModel {
        &self.vm
    }

    /// Advance the plant by `dt_s` under the given normalised torque.
    pub fn step(&mut self, torque: f64, dt_s: f64) {
        let rate_degs = self.params.torque_to_rate_degs * torque
            - self.params.self_align_per_s * self.angle_deg;

        let max = self.params.max_rate_degs;
        self.rate_limited = rate_degs.abs() > max;
        self.angle_deg += clamp(&rate_degs, &-max, &max) * dt_s;

        self.v_ego_ms = (self.v_ego_ms + self.params.accel_ms2 * dt_s)
            .min(self.params.cruise_speed_ms);
    }

    /// The measured vehicle state, with the sensor offset in `road` applied
    /// to the steering angle.
    pub fn vehicle_state(&self, road: &RoadParams) -> VehicleState {
        VehicleState {
            v_ego_ms: self.v_ego_ms,
            steering_angle_deg: self.angle_deg + road.angle_offset_deg,
            steering_pressed: false,
            steering_rate_limited: self.rate_limited
        }
    }

    /// The localisation estimate of the current motion.
    pub fn loc_estimate(&self, road: &RoadParams) -> LocEstimate {
        LocEstimate {
            yaw_rate_rads: self.curvature_m(road) * self.v_ego_ms
        }
    }

    /// Curvature currently being driven, in the lateral control convention.
    pub fn curvature_m(&self, road: &RoadParams) -> f64 {
        -self.vm.calc_curvature(self.angle_deg.to_radians(), self.v_ego_ms, road.roll_rad)
    }
}

impl CurvatureProfile {
    /// The desired path at the given time.
    pub fn at(&self, time_s: f64) -> DesiredPath {
        match *self {
            CurvatureProfile::Constant { curvature_m } => DesiredPath {
                curvature_m,
                curvature_rate_ms: 0.0
            },
            CurvatureProfile::Sine { amplitude_m, period_s } => {
                let w = 2.0 * std::f64::consts::PI / period_s;
                DesiredPath {
                    curvature_m: amplitude_m * (w * time_s).sin(),
                    curvature_rate_ms: amplitude_m * w * (w * time_s).cos()
                }
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
