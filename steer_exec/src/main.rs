//! Main steering executable entry point.
//!
//! # Architecture
//!
//! The executable drives lateral control in closed loop against the simulated
//! steering plant:
//!
//!     - Initialise the session, logging and all modules
//!     - Main loop:
//!         - Input acquisition from the plant and the curvature profile
//!         - Lateral control processing
//!         - Plant update with the torque demand
//!         - Archiving
//!         - Cycle management
//!
//! Live tuning values are read by lateral control from the file store in the
//! `store_dir` set in `steer_exec.toml`, so writing e.g. `1` into
//! `<store_dir>/CustomLateralTune` retunes the controller while running.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{Report, eyre::{WrapErr, eyre}};
use log::{info, warn};
use std::thread;
use std::time::{Duration, Instant};

// Internal
use steer_lib::{
    data_store::DataStore,
    lat_ctrl::{self, InputData, LatControl},
    params::SteerExecParams,
    sim::SteerPlant,
    vehicle_model::{self, SingleTrackModel}
};
use util::{
    archive::Archived,
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
    store::FileParamStore
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    // Initialise session
    let session = Session::new(
        "steer_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, LevelFilter::Info, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Steering Control Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: SteerExecParams = util::params::load(
        "steer_exec.toml"
    ).wrap_err("Could not load exec params")?;

    let vm_params: vehicle_model::Params = util::params::load(
        &exec_params.vehicle_model_params_file
    ).wrap_err("Could not load vehicle model params")?;

    if !(exec_params.cycle_period_s > 0.0) {
        return Err(eyre!(
            "Expected a positive cycle period, found {}", exec_params.cycle_period_s
        ));
    }

    info!("Exec parameters loaded");

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    ds.init_archives(&session)
        .map_err(|e| eyre!("Failed to initialise archives: {}", e))?;

    // ---- INITIALISE MODULES ----

    let store = FileParamStore::new(
        host::get_steer_sw_root()
            .wrap_err("Could not find the software root")?
            .join(&exec_params.store_dir)
    );
    info!("Live tuning store: {:?}", store.root());

    let mut lat_ctrl = lat_ctrl::build(
        exec_params.lat_ctrl_kind,
        &exec_params.lat_ctrl_params_file,
        store
    ).wrap_err("Failed to initialise LatCtrl")?;
    info!("LatCtrl ({:?}) init complete", exec_params.lat_ctrl_kind);

    let mut plant = SteerPlant::new(exec_params.plant, SingleTrackModel::new(vm_params));
    info!("SteerPlant init complete");

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s);
    let num_cycles = (exec_params.sim_duration_s / exec_params.cycle_period_s).round() as u64;
    let road = exec_params.road;

    info!(
        "Begining main loop, {} cycles of {} s{}\n",
        num_cycles,
        exec_params.cycle_period_s,
        if exec_params.realtime { " in realtime" } else { "" }
    );

    while ds.num_cycles < num_cycles {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(ds.num_cycles as f64 * exec_params.cycle_period_s);

        // ---- DATA INPUT ----

        ds.lat_ctrl_input = InputData {
            active: true,
            vehicle: plant.vehicle_state(&road),
            road,
            desired: exec_params.profile.at(ds.sim_time_s),
            loc: plant.loc_estimate(&road)
        };

        // ---- CONTROL ALGORITHM PROCESSING ----

        let (output, report) = lat_ctrl.update(&ds.lat_ctrl_input, plant.vm());
        ds.lat_ctrl_output = output;
        ds.lat_ctrl_status_rpt = report;

        // ---- PLANT ----

        plant.step(ds.lat_ctrl_output.torque, exec_params.cycle_period_s);

        // ---- WRITE ARCHIVES ----

        if let Err(e) = ds.write() {
            warn!("Could not write archives: {}", e);
        }

        ds.cycle_end();

        // ---- CYCLE MANAGEMENT ----

        if !exec_params.realtime {
            continue;
        }

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            },
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64()
                );
                ds.num_consec_cycle_overruns += 1;
                ds.num_cycle_overruns += 1;
            }
        }
    }

    // ---- SHUTDOWN ----

    info!(
        "Completed {} cycles: {} active, {} saturated, {} overruns",
        ds.num_cycles,
        ds.num_active_cycles,
        ds.num_saturated_cycles,
        ds.num_cycle_overruns
    );
    info!(
        "Final curvature {:.5} 1/m, desired {:.5} 1/m",
        plant.curvature_m(&road),
        ds.lat_ctrl_input.desired.curvature_m
    );

    info!("End of execution");

    Ok(())
}
