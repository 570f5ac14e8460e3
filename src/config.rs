//! # config.rs – Centralized Parameter Store
//!
//! This module holds the static program parameters used throughout the system,
//! plus [FleetConfig], the runtime settings the dispatcher and car services are started with.

use std::sync::Mutex;
use std::time::Duration;
use once_cell::sync::Lazy;

//
// ──────────────────────────────────────────────────────────────
//   1. NETWORK SETTINGS
// ──────────────────────────────────────────────────────────────
//

/// Host every endpoint binds to / connects to unless overridden
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Car `n` listens on `BASE_CAR_PORT + n`
pub const BASE_CAR_PORT: u16 = 9000;

//
// ──────────────────────────────────────────────────────────────
//   2. SYSTEM & ELEVATOR PARAMETERS
// ──────────────────────────────────────────────────────────────
//

/// Width of the goal bitset, and therefore the number of addressable floors
pub const NUM_FLOORS: u8 = 16;

/// Number of cars the dispatcher addresses when nothing else is given
pub const DEFAULT_FLEET_SIZE: u8 = 16;

/// Value reported for "no next goal" on the wire and in the status table
pub const NONE_GOAL: i32 = -1;

/// Capacity of a car's inbound mailbox
pub const MAILBOX_CAPACITY: usize = 10_000;

//
// ──────────────────────────────────────────────────────────────
//   3. TIMING & TIMEOUTS
// ──────────────────────────────────────────────────────────────
//

/// How long the dispatcher waits for every expected reply of one request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

//
// ──────────────────────────────────────────────────────────────
//   4. LOGGING CONFIGURATION
// ──────────────────────────────────────────────────────────────
//

/// Enable/disable printing of the fleet status table
pub static PRINT_STATUS_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of errors
pub static PRINT_ERR_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of warnings
pub static PRINT_WARN_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of success messages
pub static PRINT_OK_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of general info
pub static PRINT_INFO_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable dispatcher and car event prints
pub static PRINT_ELSE_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

//
// ──────────────────────────────────────────────────────────────
//   5. RUNTIME CONFIGURATION
// ──────────────────────────────────────────────────────────────
//

/// Settings shared by the dispatcher and the car services.
///
/// Car addresses are never discovered: car `id` is always reached at
/// `host:(base_port + id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetConfig {
    /// Host the car endpoints live on
    pub host: String,
    /// Port of car 0
    pub base_port: u16,
    /// Number of cars, ids are `0..fleet_size`
    pub fleet_size: u8,
    /// Upper bound on every dispatcher round trip
    pub request_timeout: Duration,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            base_port: BASE_CAR_PORT,
            fleet_size: DEFAULT_FLEET_SIZE,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}
