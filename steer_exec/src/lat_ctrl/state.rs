//! Torque lateral control state
//!
//! `LatCtrlTorque` runs the whole control law once per cycle:
//!
//!  1. Step live tuning, swapping in a new tuning if one is due.
//!  1. Check activation: below the minimum steer speed, or when not active,
//!     no torque is commanded and nothing else runs.
//!  1. Estimate the actual curvature.
//!  1. Form the lateral acceleration error and feedforward.
//!  1. Update the PID controller.
//!  1. Add friction compensation and saturate.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace, warn};
use serde::Serialize;

// Internal
use super::*;
use crate::vehicle_model::VehicleModel;
use util::{maths::clamp, params, store::ParamStore};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The output is reported as saturated when strictly within this margin of
/// the limit.
pub const SATURATION_TOLERANCE: f64 = 1e-3;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Torque based lateral control
pub struct LatCtrlTorque<S> {
    params: Params,

    /// Current tuning, only ever replaced whole
    tuning: TuningConfig,

    /// Number of tunings applied since construction
    tuning_version: u64,

    /// Controller built from `tuning`
    pid: PidController,

    tuner: LiveTuner,

    /// Store providing live tuning values
    store: S,

    report: StatusReport
}

/// Input data to LatCtrl.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct InputData {
    /// True if the host allows lateral control this cycle
    pub active: bool,

    pub vehicle: VehicleState,
    pub road: RoadParams,
    pub desired: DesiredPath,
    pub loc: LocEstimate
}

/// Output demands from LatCtrl.
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq)]
pub struct OutputData {
    /// Normalised steering torque, positive to the left.
    pub torque: f64,

    /// Steering angle demand, always zero as only torque is commanded.
    ///
    /// Units: degrees
    pub angle_deg: f64
}

/// Status report for LatCtrl processing.
///
/// Built fresh on every cycle. When inactive all fields other than `active`
/// hold their default values.
#[derive(Debug, Default, Clone, Copy, Serialize, PartialEq)]
pub struct StatusReport {
    pub active: bool,

    /// Lateral acceleration domain error
    pub error: f64,

    pub p: f64,
    pub i: f64,
    pub d: f64,
    pub f: f64,

    /// Commanded torque, same sign convention as `OutputData::torque`
    pub output: f64,

    /// True if the torque is at its limit
    pub saturated: bool
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<S: ParamStore> LatCtrlTorque<S> {
    /// Initialise the controller.
    ///
    /// Expected init data is a path to the parameter file.
    pub fn init(params_path: &str, store: S) -> Result<Self, LatCtrlError> {
        let params = params::load(params_path)
            .map_err(LatCtrlError::ParamLoadError)?;

        Self::new(params, store)
    }

    /// Create a new controller from parameters.
    pub fn new(params: Params, store: S) -> Result<Self, LatCtrlError> {
        if !(params.cycle_period_s > 0.0) {
            return Err(LatCtrlError::InvalidParams(format!(
                "cycle_period_s must be positive, got {}", params.cycle_period_s
            )))
        }
        if !(params.steer_max > 0.0) {
            return Err(LatCtrlError::InvalidParams(format!(
                "steer_max must be positive, got {}", params.steer_max
            )))
        }
        // A zero speed would divide by zero in the curvature estimate
        if !(params.min_steer_speed_ms > 0.0) {
            return Err(LatCtrlError::InvalidParams(format!(
                "min_steer_speed_ms must be positive, got {}", params.min_steer_speed_ms
            )))
        }

        let tuning = TuningConfig::new(
            params.max_lat_accel_ms2,
            params.friction,
            params.use_steering_angle
        ).map_err(LatCtrlError::InvalidTuning)?;

        let pid = tuning.build_pid(params.steer_max, params.cycle_period_s);

        info!(
            "LatCtrlTorque initialised: max lat accel {} m/s^2, friction {}, steering angle only {}",
            tuning.max_lat_accel_ms2(),
            tuning.friction(),
            tuning.use_steering_angle()
        );

        Ok(Self {
            params,
            tuning,
            tuning_version: 0,
            pid,
            tuner: LiveTuner::new(),
            store,
            report: StatusReport::default()
        })
    }

    /// Replace the tuning and rebuild the controller from it.
    ///
    /// The controller is rebuilt whole, so its integral is cleared.
    pub fn apply_tuning(&mut self, tuning: TuningConfig) {
        self.pid = tuning.build_pid(self.params.steer_max, self.params.cycle_period_s);
        self.tuning = tuning;
        self.tuning_version += 1;

        info!(
            "Live tuning {} applied: max lat accel {} m/s^2 (k_p {:.4}, k_i {:.4}, k_f {:.4}), \
            friction {}, steering angle only {}",
            self.tuning_version,
            tuning.max_lat_accel_ms2(),
            tuning.k_p(),
            tuning.k_i(),
            tuning.k_f(),
            tuning.friction(),
            tuning.use_steering_angle()
        );
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn tuning(&self) -> &TuningConfig {
        &self.tuning
    }

    /// Number of tunings applied since construction.
    pub fn tuning_version(&self) -> u64 {
        self.tuning_version
    }

    pub fn pid(&self) -> &PidController {
        &self.pid
    }

    /// The last status report.
    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Step live tuning, keeping the current tuning if the stored one can't be
    /// used.
    fn live_tune(&mut self) {
        match self.tuner.step(&self.store) {
            Ok(Some(tuning)) => self.apply_tuning(tuning),
            Ok(None) => (),
            Err(e) => warn!("Live tuning not applied, keeping previous tuning: {}", e)
        }
    }
}

impl<S: ParamStore> LatControl for LatCtrlTorque<S> {
    fn update(
        &mut self,
        input: &InputData,
        vm: &dyn VehicleModel
    ) -> (OutputData, StatusReport) {
        // Clear the status report
        self.report = StatusReport::default();

        self.live_tune();

        let v_ego_ms = input.vehicle.v_ego_ms;

        if v_ego_ms < self.params.min_steer_speed_ms || !input.active {
            trace!("LatCtrlTorque inactive (active: {}, v_ego: {:.2} m/s)", input.active, v_ego_ms);

            return (
                OutputData {
                    torque: 0.0,
                    angle_deg: 0.0
                },
                self.report
            )
        }

        let actual_curv_m = estimate_curvature(
            vm,
            &input.vehicle,
            &input.road,
            &input.loc,
            self.tuning.use_steering_angle()
        );

        let err = form_error(&input.desired, actual_curv_m, v_ego_ms, input.road.roll_rad);

        let mut torque = self.pid.update(
            err.error,
            err.feedforward,
            v_ego_ms,
            freeze_integrator(&input.vehicle)
        );

        torque += friction_compensation(err.error, self.tuning.friction());
        torque = clamp(&torque, &-self.params.steer_max, &self.params.steer_max);

        // Internal convention is right positive, flip for output
        let output = OutputData {
            torque: -torque,
            angle_deg: 0.0
        };

        self.report = StatusReport {
            active: true,
            error: err.error,
            p: self.pid.p(),
            i: self.pid.i(),
            d: self.pid.d(),
            f: self.pid.f(),
            output: output.torque,
            saturated: is_saturated(torque, self.params.steer_max)
        };

        trace!(
            "LatCtrlTorque: curv {:.5} -> {:.5}, err {:.4}, torque {:.4}{}",
            actual_curv_m,
            input.desired.curvature_m,
            err.error,
            output.torque,
            if self.report.saturated { " (saturated)" } else { "" }
        );

        (output, self.report)
    }

    fn reset(&mut self) {
        self.pid.reset();
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// True if the torque is closer than `SATURATION_TOLERANCE` to `steer_max`.
///
/// A torque exactly `SATURATION_TOLERANCE` below the limit is not saturated.
/// A NaN torque is never saturated.
pub fn is_saturated(torque: f64, steer_max: f64) -> bool {
    steer_max - torque.abs() < SATURATION_TOLERANCE
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
