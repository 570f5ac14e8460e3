//! ## World view
//!
//! The dispatcher's cached picture of the fleet: one [CarStatus] per car id,
//! refreshed only when that car answers a request. Between round trips the
//! entries may be stale.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config;

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Direction a car is serving goals in.
pub enum Dirn {
    Down = -1,
    Idle = 0,
    Up = 1,
}

impl Dirn {
    /// Numeric form used on the command line and in the status table
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Inverse of [Dirn::code]. Returns `None` for anything but -1, 0 and 1.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Dirn::Down),
            0 => Some(Dirn::Idle),
            1 => Some(Dirn::Up),
            _ => None,
        }
    }

    /// Up becomes Down and the other way around. Idle stays Idle.
    pub fn toggled(self) -> Self {
        match self {
            Dirn::Up => Dirn::Down,
            Dirn::Down => Dirn::Up,
            Dirn::Idle => Dirn::Idle,
        }
    }
}

/// Status reply a car sends after every request.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarStatus {
    /// The car's id
    pub id: u8,
    /// Current floor
    pub floor: u8,
    /// Nearest goal ahead in the current direction, if any
    pub next_goal: Option<u8>,
    /// Current direction
    pub dirn: Dirn,
    /// True while the car holds an unresolved pickup commitment
    pub locked: bool,
}

impl CarStatus {
    /// `next_goal` as printed: the floor, or [config::NONE_GOAL]
    pub fn goal_code(&self) -> i32 {
        self.next_goal.map_or(config::NONE_GOAL, i32::from)
    }
}

/// Fleet-wide snapshot keyed by car id.
///
/// Iteration is always in ascending id order, which is what makes car
/// selection deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldView {
    cars: BTreeMap<u8, CarStatus>,
}

impl WorldView {
    /// Creates an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `status` as the latest known state of its car. Later replies overwrite earlier ones.
    pub fn merge(&mut self, status: CarStatus) {
        self.cars.insert(status.id, status);
    }

    /// Last known status of car `id`
    pub fn get(&self, id: u8) -> Option<&CarStatus> {
        self.cars.get(&id)
    }

    /// Every known car, lowest id first
    pub fn iter(&self) -> impl Iterator<Item = &CarStatus> {
        self.cars.values()
    }

    /// Number of cars that have replied at least once
    pub fn len(&self) -> usize {
        self.cars.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }
}
