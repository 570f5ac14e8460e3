//! Messages between the dispatcher and the cars, and their binary encoding.
//!
//! Every request is answered with the car's [CarStatus]. The return address is
//! not part of the payload: in-process it is the reply channel of the
//! [crate::elevator_logic::Envelope], over TCP it is the connection the request
//! arrived on.

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::{FleetError, FleetResult};
use crate::world_view::{CarStatus, Dirn};

/// A request to one car.
#[allow(missing_docs)]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Report status, change nothing
    Status,
    /// Car call: stop at `goal`, start in `dirn` if idle
    Update { goal: u8, dirn: Dirn },
    /// Hall call at `floor` wanting to travel `dirn`
    Pickup { floor: u8, dirn: Dirn },
    /// Advance simulated time one unit
    Step,
}

impl Request {
    /// Checks the floor range and that a pickup names the passenger's direction.
    ///
    /// An `Update` may carry an `Idle` hint; an idle car then heads toward the goal.
    /// Both ends call this: the dispatcher before sending, the car before applying.
    pub fn validate(&self) -> FleetResult<()> {
        match *self {
            Request::Status | Request::Step => Ok(()),
            Request::Update { goal, .. } => check_floor(goal),
            Request::Pickup { floor, dirn } => {
                check_floor(floor)?;
                if dirn == Dirn::Idle {
                    return Err(FleetError::InvalidDirection(dirn));
                }
                Ok(())
            }
        }
    }
}

/// Rejects floors outside `0..config::NUM_FLOORS`
pub fn check_floor(floor: u8) -> FleetResult<()> {
    if floor < config::NUM_FLOORS {
        Ok(())
    } else {
        Err(FleetError::InvalidFloor { floor, num_floors: config::NUM_FLOORS })
    }
}

/// Serializes a [Request] with `bincode`.
pub fn serialize_request(request: &Request) -> FleetResult<Vec<u8>> {
    Ok(bincode::serialize(request)?)
}

/// Deserializes a [Request] from `data`.
pub fn deserialize_request(data: &[u8]) -> FleetResult<Request> {
    Ok(bincode::deserialize(data)?)
}

/// Serializes a [CarStatus] with `bincode`.
pub fn serialize_status(status: &CarStatus) -> FleetResult<Vec<u8>> {
    Ok(bincode::serialize(status)?)
}

/// Deserializes a [CarStatus] from `data`.
pub fn deserialize_status(data: &[u8]) -> FleetResult<CarStatus> {
    Ok(bincode::deserialize(data)?)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_bad_input() {
        assert!(Request::Status.validate().is_ok());
        assert!(Request::Pickup { floor: 3, dirn: Dirn::Up }.validate().is_ok());
        assert!(matches!(
            Request::Pickup { floor: 16, dirn: Dirn::Up }.validate(),
            Err(FleetError::InvalidFloor { floor: 16, .. })
        ));
        assert!(matches!(
            Request::Pickup { floor: 2, dirn: Dirn::Idle }.validate(),
            Err(FleetError::InvalidDirection(Dirn::Idle))
        ));
        assert!(Request::Update { goal: 2, dirn: Dirn::Idle }.validate().is_ok());
        assert!(matches!(
            Request::Update { goal: 16, dirn: Dirn::Idle }.validate(),
            Err(FleetError::InvalidFloor { floor: 16, .. })
        ));
    }

    #[test]
    fn pickup_survives_encoding() {
        let request = Request::Pickup { floor: 11, dirn: Dirn::Down };
        let bytes = serialize_request(&request).unwrap();
        assert_eq!(deserialize_request(&bytes).unwrap(), request);
    }

    #[test]
    fn garbage_is_a_codec_error() {
        assert!(matches!(deserialize_status(&[0xFF]), Err(FleetError::Codec(_))));
    }
}
