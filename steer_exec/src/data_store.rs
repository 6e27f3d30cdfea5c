//! # Data Store

use log::info;
use serde::Serialize;

use crate::lat_ctrl;
use util::{
    archive::{Archived, Archiver},
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u64,

    /// Simulation elapsed time
    pub sim_time_s: f64,

    // LatCtrl
    pub lat_ctrl_input: lat_ctrl::InputData,
    pub lat_ctrl_output: lat_ctrl::OutputData,
    pub lat_ctrl_status_rpt: lat_ctrl::StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,

    /// Total number of cycle overruns
    pub num_cycle_overruns: u64,

    /// Number of cycles where lateral control was active
    pub num_active_cycles: u64,

    /// Number of cycles where the torque command was saturated
    pub num_saturated_cycles: u64,

    arch_lat_ctrl: Archiver
}

/// One row of the lateral control archive.
#[derive(Serialize)]
struct LatCtrlRecord {
    time_s: f64,
    cycle: u64,
    v_ego_ms: f64,
    steering_angle_deg: f64,
    yaw_rate_rads: f64,
    desired_curvature_m: f64,
    active: bool,
    error: f64,
    p: f64,
    i: f64,
    d: f64,
    f: f64,
    torque: f64,
    saturated: bool
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Open the archives in the session directory.
    pub fn init_archives(&mut self, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
        self.arch_lat_ctrl = Archiver::from_path(session, "lat_ctrl.csv")?;
        info!("LatCtrl archive opened");

        Ok(())
    }

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle.
    pub fn cycle_start(&mut self, sim_time_s: f64) {
        self.lat_ctrl_input = lat_ctrl::InputData::default();
        self.lat_ctrl_output = lat_ctrl::OutputData::default();
        self.lat_ctrl_status_rpt = lat_ctrl::StatusReport::default();

        self.sim_time_s = sim_time_s;
    }

    /// Perform actions required at the end of a cycle.
    pub fn cycle_end(&mut self) {
        if self.lat_ctrl_status_rpt.active {
            self.num_active_cycles += 1;
        }
        if self.lat_ctrl_status_rpt.saturated {
            self.num_saturated_cycles += 1;
        }

        self.num_cycles += 1;
    }
}

impl Archived for DataStore {
    fn write(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let input = &self.lat_ctrl_input;
        let rpt = &self.lat_ctrl_status_rpt;

        self.arch_lat_ctrl.serialise(&LatCtrlRecord {
            time_s: self.sim_time_s,
            cycle: self.num_cycles,
            v_ego_ms: input.vehicle.v_ego_ms,
            steering_angle_deg: input.vehicle.steering_angle_deg,
            yaw_rate_rads: input.loc.yaw_rate_rads,
            desired_curvature_m: input.desired.curvature_m,
            active: rpt.active,
            error: rpt.error,
            p: rpt.p,
            i: rpt.i,
            d: rpt.d,
            f: rpt.f,
            torque: self.lat_ctrl_output.torque,
            saturated: rpt.saturated
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_cycle_counters() {
        let mut ds = DataStore::default();

        ds.cycle_start(0.0);
        ds.lat_ctrl_status_rpt.active = true;
        ds.lat_ctrl_status_rpt.saturated = true;
        ds.cycle_end();

        ds.cycle_start(0.01);
        assert!(!ds.lat_ctrl_status_rpt.active);
        ds.cycle_end();

        assert_eq!(ds.num_cycles, 2);
        assert_eq!(ds.num_active_cycles, 1);
        assert_eq!(ds.num_saturated_cycles, 1);
        assert_eq!(ds.sim_time_s, 0.01);

        // Without a session the archive is closed and writing does nothing
        assert!(ds.write().is_ok());
    }
}
