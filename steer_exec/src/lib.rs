//! # Steering library.
//!
//! This library allows other crates in the workspace, and the benchmarks, to access items defined
//! inside the steering crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Lateral control module - converts a desired curvature into a steering torque demand
pub mod lat_ctrl;

/// Vehicle model - maps steering angle onto path curvature
pub mod vehicle_model;

/// Simulation - a steering plant to close the loop around lateral control
pub mod sim;

/// Global data store for the executable
pub mod data_store;

/// Parameters for the steering executable
pub mod params;
