//! # Steering Executable Parameters
//!
//! This module provide parameters for the steering executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::{
    lat_ctrl::{LatCtrlKind, RoadParams},
    sim::{CurvatureProfile, PlantParams}
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SteerExecParams {

    /// Lateral control strategy to run
    pub lat_ctrl_kind: LatCtrlKind,

    /// Parameter file for lateral control, relative to the params directory
    pub lat_ctrl_params_file: String,

    /// Parameter file for the vehicle model, relative to the params directory
    pub vehicle_model_params_file: String,

    /// Target period of one cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,

    /// Length of the simulated drive.
    ///
    /// Units: seconds
    pub sim_duration_s: f64,

    /// If true each cycle is padded out to the cycle period, otherwise the
    /// simulation runs as fast as possible.
    pub realtime: bool,

    /// Directory of the live tuning store, relative to the software root
    pub store_dir: String,

    /// Road conditions for the whole drive
    pub road: RoadParams,

    pub plant: PlantParams,

    pub profile: CurvatureProfile
}
