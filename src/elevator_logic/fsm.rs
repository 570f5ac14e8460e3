//! Scheduling state machine of a single car.
//!
//! The car serves the nearest goal ahead in its direction of travel and only
//! reverses once nothing is left ahead (LOOK). A hall call accepted while idle
//! additionally locks the direction the passenger asked for, which the car
//! adopts on arriving at the caller's floor.
//!
//! Operations run one at a time; the car is owned by exactly one actor task.

use crate::print;
use crate::network::message::Request;
use crate::world_view::{CarStatus, Dirn};

use super::goals::GoalSet;

/// Direction commitment made to a waiting passenger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupLock {
    /// Floor the passenger waits at
    pub floor: u8,
    /// Direction the passenger wants to travel
    pub dirn: Dirn,
}

/// One elevator car.
#[derive(Debug, Clone)]
pub struct ElevatorCar {
    id: u8,
    floor: u8,
    goals: GoalSet,
    dirn: Dirn,
    lock: Option<PickupLock>,
}

impl ElevatorCar {
    /// A car at floor 0, idle, with no goals
    pub fn new(id: u8) -> Self {
        Self {
            id,
            floor: 0,
            goals: GoalSet::new(),
            dirn: Dirn::Idle,
            lock: None,
        }
    }

    #[allow(missing_docs)]
    pub fn id(&self) -> u8 {
        self.id
    }

    #[allow(missing_docs)]
    pub fn floor(&self) -> u8 {
        self.floor
    }

    #[allow(missing_docs)]
    pub fn dirn(&self) -> Dirn {
        self.dirn
    }

    #[allow(missing_docs)]
    pub fn goals(&self) -> GoalSet {
        self.goals
    }

    #[allow(missing_docs)]
    pub fn lock(&self) -> Option<PickupLock> {
        self.lock
    }

    #[allow(missing_docs)]
    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    /// Current status. `next_goal` is recomputed on every call.
    pub fn status(&self) -> CarStatus {
        CarStatus {
            id: self.id,
            floor: self.floor,
            next_goal: self.find_next_goal(),
            dirn: self.dirn,
            locked: self.is_locked(),
        }
    }

    /// Nearest goal strictly ahead in the current direction. Always `None` while idle.
    pub fn find_next_goal(&self) -> Option<u8> {
        match self.dirn {
            Dirn::Up => self.goals.nearest_above(self.floor),
            Dirn::Down => self.goals.nearest_below(self.floor),
            Dirn::Idle => None,
        }
    }

    /// Car call to `goal`. An idle car starts moving in `hint`.
    ///
    /// A goal on the current floor is served in place and never stored, since
    /// no sweep would ever clear it.
    pub fn update(&mut self, goal: u8, hint: Dirn) {
        if self.dirn == Dirn::Idle {
            self.dirn = match hint {
                Dirn::Idle => self.direction_towards(goal),
                hint => hint,
            };
        }
        if goal != self.floor {
            self.goals.set(goal);
        }
    }

    /// Hall call at `floor` for a passenger travelling `dirn`.
    ///
    /// Only an idle car takes the lock; a car already under way just gets
    /// one more stop and any existing lock stays as it is. An idle car that is
    /// already at `floor` turns to `dirn` at once, so the lock can never be
    /// left behind by a car call pulling it away.
    pub fn pickup(&mut self, floor: u8, dirn: Dirn) {
        if floor == self.floor {
            if self.dirn == Dirn::Idle {
                self.dirn = dirn;
            }
            return;
        }
        if self.dirn == Dirn::Idle {
            self.dirn = self.direction_towards(floor);
            self.lock = Some(PickupLock { floor, dirn });
        }
        self.goals.set(floor);
    }

    /// Advances one time unit.
    pub fn step(&mut self) {
        if self.dirn == Dirn::Idle {
            return;
        }

        if self.find_next_goal().is_some() {
            self.advance();
        } else if !self.goals.is_empty() {
            // Everything left is behind us, turn around without moving
            self.dirn = self.dirn.toggled();
        }

        if self.goals.is_empty() {
            self.dirn = Dirn::Idle;
        }

        if let Some(lock) = self.lock {
            if lock.floor == self.floor {
                self.dirn = lock.dirn;
                self.lock = None;
            }
        }
    }

    /// Applies `request` and returns the resulting status.
    ///
    /// Malformed requests leave the car untouched.
    pub fn handle(&mut self, request: Request) -> CarStatus {
        if let Err(e) = request.validate() {
            print::warn(format!("elevator {} ignored {:?}: {}", self.id, request, e));
            return self.status();
        }
        match request {
            Request::Status => {}
            Request::Update { goal, dirn } => self.update(goal, dirn),
            Request::Pickup { floor, dirn } => self.pickup(floor, dirn),
            Request::Step => self.step(),
        }
        self.status()
    }

    fn direction_towards(&self, floor: u8) -> Dirn {
        if floor >= self.floor { Dirn::Up } else { Dirn::Down }
    }

    fn advance(&mut self) {
        match self.dirn {
            Dirn::Up => self.floor += 1,
            Dirn::Down => self.floor -= 1,
            Dirn::Idle => return,
        }
        if self.goals.contains(self.floor) {
            self.goals.clear(self.floor);
        }
    }
}
