//! # Vehicle model
//!
//! Maps a road wheel steering angle onto the curvature of the path the vehicle
//! follows. Lateral control only needs `VehicleModel::calc_curvature`, the
//! `SingleTrackModel` is a steady-state single track (bicycle) model used by
//! the simulation and tests.
//!
//! Curvature returned by the model is positive for a positive steering angle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Gravitational acceleration.
///
/// Units: meters/second^2
pub const ACCELERATION_DUE_TO_GRAVITY: f64 = 9.8;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A kinematic model of the vehicle.
pub trait VehicleModel {
    /// Curvature of the path driven with steering wheel angle `sa_rad`, at
    /// speed `u_ms` on a road with roll `roll_rad`.
    ///
    /// Units: 1/meters
    fn calc_curvature(&self, sa_rad: f64, u_ms: f64, roll_rad: f64) -> f64;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the single track model.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Params {
    /// Ratio between the steering wheel angle and the road wheel angle.
    pub steer_ratio: f64,

    /// Distance between the front and rear axles.
    ///
    /// Units: meters
    pub wheelbase_m: f64,

    /// Slip factor (understeer gradient) of the vehicle. Zero gives a purely
    /// kinematic model.
    ///
    /// Units: seconds^2/meters^2
    pub slip_factor: f64,
}

/// Steady state single track vehicle model.
#[derive(Debug, Clone, Copy)]
pub struct SingleTrackModel {
    params: Params
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SingleTrackModel {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Curvature produced per radian of road wheel angle at speed `u_ms`.
    pub fn curvature_factor(&self, u_ms: f64) -> f64 {
        1.0 / (1.0 - self.params.slip_factor * u_ms.powi(2)) / self.params.wheelbase_m
    }

    /// Curvature induced by the road bank.
    pub fn roll_compensation(&self, roll_rad: f64, u_ms: f64) -> f64 {
        let sf = self.params.slip_factor;

        if sf.abs() < 1e-6 {
            0.0
        }
        else {
            (ACCELERATION_DUE_TO_GRAVITY * roll_rad) / ((1.0 / sf) - u_ms.powi(2))
        }
    }

    /// Steering wheel angle required to follow the curvature `curv_m`.
    ///
    /// Inverse of `calc_curvature`.
    pub fn get_steer_from_curvature(&self, curv_m: f64, u_ms: f64, roll_rad: f64) -> f64 {
        (curv_m - self.roll_compensation(roll_rad, u_ms)) * self.params.steer_ratio
            / self.curvature_factor(u_ms)
    }
}

impl VehicleModel for SingleTrackModel {
    fn calc_curvature(&self, sa_rad: f64, u_ms: f64, roll_rad: f64) -> f64 {
        self.curvature_factor(u_ms) * sa_rad / self.params.steer_ratio
            + self.roll_compensation(roll_rad, u_ms)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn model(slip_factor: f64) -> SingleTrackModel {
        SingleTrackModel::new(Params {
            steer_ratio: 15.0,
            wheelbase_m: 2.7,
            slip_factor,
        })
    }

    #[test]
    fn test_kinematic_curvature() {
        let vm = model(0.0);

        // Purely kinematic: curvature = sa / (sr * L), no speed or roll effect
        let curv = vm.calc_curvature(0.3, 20.0, 0.05);
        assert!((curv - 0.3 / (15.0 * 2.7)).abs() < 1e-12);
        assert_eq!(vm.roll_compensation(0.05, 20.0), 0.0);
    }

    #[test]
    fn test_steer_from_curvature_inverse() {
        let vm = model(-0.0005);

        for &(sa, u, roll) in [(0.1, 5.0, 0.0), (-0.4, 25.0, 0.03), (0.02, 30.0, -0.02)].iter() {
            let curv = vm.calc_curvature(sa, u, roll);
            let sa_back = vm.get_steer_from_curvature(curv, u, roll);
            assert!((sa - sa_back).abs() < 1e-9, "{} != {}", sa, sa_back);
        }
    }
}
