//! # Live tuning
//!
//! Allows the torque controller to be retuned from the parameter store while
//! the software is running.
//!
//! Every `TUNE_POLL_PERIOD_CYCLES` cycles the `CustomLateralTune` flag is
//! read. While it is set, every `TUNE_APPLY_PERIOD_CYCLES` cycles the stored
//! tuning is read and a complete new `TuningConfig` is produced. Either all
//! stored values are valid and a new tuning is returned, or an error is
//! returned and the caller keeps its previous tuning.
//!
//! Stored numbers are scaled integers as written by the tuning UI: the max
//! lateral acceleration in tenths of m/s^2 and the friction in hundredths of
//! normalised torque.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use util::store::{ParamStore, StoreError};

use super::{TuningConfig, TuningError};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Store key enabling live tuning.
pub const KEY_CUSTOM_LATERAL_TUNE: &str = "CustomLateralTune";

/// Store key for the max lateral acceleration, in tenths of m/s^2.
pub const KEY_TORQUE_MAX_LAT_ACCEL: &str = "TorqueMaxLatAccel";

/// Store key for the friction, in hundredths of normalised torque.
pub const KEY_TORQUE_FRICTION: &str = "TorqueFriction";

/// Store key for the steering angle only curvature estimate.
pub const KEY_TORQUE_USE_STEERING_ANGLE: &str = "TorqueUseSteeringAngle";

/// Number of cycles between reads of the live tuning enable flag.
pub const TUNE_POLL_PERIOD_CYCLES: u32 = 100;

/// Number of cycles between applications of the stored tuning while live
/// tuning is enabled.
pub const TUNE_APPLY_PERIOD_CYCLES: u32 = 300;

/// Decimal places of the stored max lateral acceleration.
const MAX_LAT_ACCEL_DECIMALS: i32 = 1;

/// Decimal places of the stored friction.
const FRICTION_DECIMALS: i32 = 2;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Live tuning counters and enable state.
#[derive(Debug, Default, Clone)]
pub struct LiveTuner {
    /// Cycles since the enable flag was last read
    poll_counter: u32,

    /// Cycles since the tuning was last applied, counts only while enabled
    apply_counter: u32,

    /// Last value read from the enable flag
    enabled: bool
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Reasons a stored tuning could not be applied.
#[derive(Debug, thiserror::Error)]
pub enum LiveTuneError {
    #[error("Could not read the stored tuning: {0}")]
    StoreError(#[from] StoreError),

    #[error("Stored value {value:?} for {key} is not a number")]
    InvalidNumber {
        key: &'static str,
        value: String
    },

    #[error("Stored tuning is invalid: {0}")]
    InvalidTuning(#[from] TuningError)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LiveTuner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step the tuner by one cycle.
    ///
    /// Returns `Ok(Some(tuning))` on the cycles where a new tuning is due and
    /// was read successfully, `Ok(None)` on all other cycles. An error means a
    /// tuning was due but could not be read, the apply counter is still reset
    /// so the next attempt is a full period later.
    pub fn step<S>(&mut self, store: &S) -> Result<Option<TuningConfig>, LiveTuneError>
    where
        S: ParamStore + ?Sized
    {
        self.poll_counter += 1;
        if self.poll_counter >= TUNE_POLL_PERIOD_CYCLES {
            self.poll_counter = 0;

            let enabled = store.get_bool(KEY_CUSTOM_LATERAL_TUNE);
            if enabled != self.enabled {
                debug!("Live lateral tuning {}", if enabled { "enabled" } else { "disabled" });
            }
            self.enabled = enabled;
        }

        if !self.enabled {
            return Ok(None)
        }

        self.apply_counter += 1;
        if self.apply_counter < TUNE_APPLY_PERIOD_CYCLES {
            return Ok(None)
        }
        self.apply_counter = 0;

        read_tuning(store).map(Some)
    }

    /// True if live tuning was enabled at the last poll.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Read a complete tuning from the store.
pub fn read_tuning<S>(store: &S) -> Result<TuningConfig, LiveTuneError>
where
    S: ParamStore + ?Sized
{
    let max_lat_accel_ms2 = read_scaled(store, KEY_TORQUE_MAX_LAT_ACCEL, MAX_LAT_ACCEL_DECIMALS)?;
    let friction = read_scaled(store, KEY_TORQUE_FRICTION, FRICTION_DECIMALS)?;
    let use_steering_angle = store.get_bool(KEY_TORQUE_USE_STEERING_ANGLE);

    Ok(TuningConfig::new(max_lat_accel_ms2, friction, use_steering_angle)?)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Read a decimal number stored with `decimals` implied decimal places.
///
/// Dividing by the power of ten (rather than multiplying by its reciprocal)
/// keeps whole stored numbers exact, e.g. `"25"` reads as exactly `2.5`.
fn read_scaled<S>(store: &S, key: &'static str, decimals: i32) -> Result<f64, LiveTuneError>
where
    S: ParamStore + ?Sized
{
    let value = store.get(key)?;

    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n / 10f64.powi(decimals)),
        _ => Err(LiveTuneError::InvalidNumber { key, value })
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
