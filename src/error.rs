//! Library error type.
//!
//! An unassignable pickup is not an error; it is queued in the backlog and
//! reported as [crate::manager::PickupOutcome::Queued].

use std::time::Duration;

use thiserror::Error;

use crate::world_view::Dirn;

/// Errors surfaced by the dispatcher and the transport underneath it.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("floor {floor} is outside 0..{num_floors}")]
    InvalidFloor { floor: u8, num_floors: u8 },

    #[error("{given} cars given, car ids only reach {max}")]
    TooManyCars { given: usize, max: u8 },

    #[error("car {id} is outside the fleet 0..{fleet_size}")]
    UnknownCar { id: u8, fleet_size: usize },

    #[error("direction {0:?} cannot be requested, use Up or Down")]
    InvalidDirection(Dirn),

    #[error("timed out after {after:?}: {received} of {expected} replies arrived")]
    Timeout { expected: usize, received: usize, after: Duration },

    #[error("{received} of {expected} replies arrived before every delivery had ended")]
    Unreachable { expected: usize, received: usize },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for the library.
pub type FleetResult<T> = Result<T, FleetError>;
