//! Lateral control module
//!
//! Converts a desired path curvature into a steering torque demand. Only the
//! torque based controller is provided, but callers drive lateral control
//! through the `LatControl` trait so that other strategies can be added.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod accel_error;
mod curvature;
mod friction;
mod inputs;
mod live_tune;
mod params;
mod pid;
mod state;
mod tuning;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
pub use accel_error::*;
pub use curvature::*;
pub use friction::*;
pub use inputs::*;
pub use live_tune::*;
pub use params::*;
pub use pid::*;
pub use state::*;
pub use tuning::*;

use crate::vehicle_model::VehicleModel;
use util::{params::LoadError, store::ParamStore};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A lateral controller, updated once per control cycle.
pub trait LatControl {
    /// Run one control cycle, returning the actuator demands and the status
    /// report for the cycle.
    fn update(
        &mut self,
        input: &InputData,
        vm: &dyn VehicleModel
    ) -> (OutputData, StatusReport);

    /// Clear any accumulated controller state.
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The available lateral control strategies.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatCtrlKind {
    Torque
}

/// Possible errors that can occur during LatCtrl initialisation.
#[derive(Debug, thiserror::Error)]
pub enum LatCtrlError {
    #[error("Could not load the LatCtrl parameters: {0}")]
    ParamLoadError(LoadError),

    #[error("Invalid LatCtrl parameters: {0}")]
    InvalidParams(String),

    #[error("Invalid initial tuning: {0}")]
    InvalidTuning(TuningError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Build the lateral controller of the given kind.
///
/// `params_path` is relative to the parameters directory, `store` provides
/// live tuning values.
pub fn build<S>(
    kind: LatCtrlKind,
    params_path: &str,
    store: S
) -> Result<Box<dyn LatControl>, LatCtrlError>
where
    S: ParamStore + 'static
{
    match kind {
        LatCtrlKind::Torque => Ok(Box::new(LatCtrlTorque::init(params_path, store)?))
    }
}
