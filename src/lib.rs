#![warn(missing_docs)]
//! # This projects library
//!
//! This library runs a fleet of simulated elevator cars and the dispatcher that
//! hands hall calls to them.
//!
//! ## Overview
//! - **Config**: Handles configuration settings.
//! - **Error**: Error type shared by the library.
//! - **Init**: Start-up argument parsing.
//! - **Print**: Colored logging and the fleet status table.
//! - **Elevator Logic**: The per-car scheduling state machine and the task driving it.
//! - **World View**: The dispatcher's snapshot of the fleet.
//! - **Manager**: The dispatcher and its car selection.
//! - **Network**: Messages, encoding and TCP transport between dispatcher and cars.
//! - **CLI**: The operator console.

/// Global variables
pub mod config;

/// Library error type
pub mod error;

/// Help functions
pub mod ip_help_functions;

/// Initialize functions
pub mod init;

/// Print functions with color coding
pub mod print;

/// Dispatcher and car selection.
pub mod manager;

/// Communication between the dispatcher and the cars.
pub mod network;

/// The dispatcher's view of the fleet.
pub mod world_view;

/// Elevator control logic.
pub mod elevator_logic;

/// Operator console.
pub mod cli;
