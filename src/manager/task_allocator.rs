//! ## Car selection for hall calls
//!
//! Pure functions over the dispatcher's [WorldView]; nothing here talks to a car.
//!
//! A car already travelling the requested direction, not locked to another hall
//! call, and not yet past the caller's floor wins, nearest first. Failing that,
//! any idle car takes it. Failing that, nobody does.

use crate::network::message::Request;
use crate::world_view::{CarStatus, Dirn, WorldView};

/// A hall call waiting for a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupRequest {
    /// Floor the passenger waits at
    pub floor: u8,
    /// Direction the passenger wants to travel
    pub dirn: Dirn,
}

impl PickupRequest {
    #[allow(missing_docs)]
    pub fn new(floor: u8, dirn: Dirn) -> Self {
        Self { floor, dirn }
    }

    /// The request sent to the chosen car
    pub fn to_request(self) -> Request {
        Request::Pickup { floor: self.floor, dirn: self.dirn }
    }
}

/// Picks the car that should serve `pickup`, or `None` if no car can right now.
///
/// Ties go to the lowest car id.
pub fn select_car(world_view: &WorldView, pickup: &PickupRequest) -> Option<u8> {
    nearest_heading_towards(world_view, pickup).or_else(|| first_idle(world_view))
}

/// True if `car` travels `pickup.dirn` and has not passed `pickup.floor` yet.
pub fn can_serve_on_the_way(car: &CarStatus, pickup: &PickupRequest) -> bool {
    if car.locked || car.dirn != pickup.dirn {
        return false;
    }
    match pickup.dirn {
        Dirn::Up => car.floor <= pickup.floor,
        Dirn::Down => car.floor >= pickup.floor,
        Dirn::Idle => false,
    }
}

fn nearest_heading_towards(world_view: &WorldView, pickup: &PickupRequest) -> Option<u8> {
    // min_by_key keeps the first of equal keys and the view iterates by id
    world_view
        .iter()
        .filter(|car| can_serve_on_the_way(car, pickup))
        .min_by_key(|car| car.floor.abs_diff(pickup.floor))
        .map(|car| car.id)
}

fn first_idle(world_view: &WorldView) -> Option<u8> {
    world_view
        .iter()
        .find(|car| car.dirn == Dirn::Idle)
        .map(|car| car.id)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn car(id: u8, floor: u8, dirn: Dirn) -> CarStatus {
        CarStatus { id, floor, next_goal: None, dirn, locked: false }
    }

    fn view(cars: &[CarStatus]) -> WorldView {
        let mut wv = WorldView::new();
        for c in cars {
            wv.merge(*c);
        }
        wv
    }

    #[test]
    fn moving_car_beats_closer_idle_car() {
        let wv = view(&[car(0, 5, Dirn::Idle), car(1, 2, Dirn::Up)]);
        assert_eq!(select_car(&wv, &PickupRequest::new(6, Dirn::Up)), Some(1));
    }

    #[test]
    fn idle_car_when_nobody_is_on_the_way() {
        let wv = view(&[car(0, 5, Dirn::Idle), car(1, 7, Dirn::Up)]);
        assert_eq!(select_car(&wv, &PickupRequest::new(6, Dirn::Up)), Some(0));
    }

    #[test]
    fn wrong_direction_never_qualifies() {
        let wv = view(&[car(0, 9, Dirn::Down), car(1, 1, Dirn::Down)]);
        assert_eq!(select_car(&wv, &PickupRequest::new(4, Dirn::Up)), None);
    }

    #[test]
    fn descending_car_must_be_above() {
        let wv = view(&[car(0, 3, Dirn::Down), car(1, 8, Dirn::Down)]);
        assert_eq!(select_car(&wv, &PickupRequest::new(5, Dirn::Down)), Some(1));
    }

    #[test]
    fn car_at_the_floor_qualifies() {
        let wv = view(&[car(0, 5, Dirn::Down)]);
        assert_eq!(select_car(&wv, &PickupRequest::new(5, Dirn::Down)), Some(0));
    }

    #[test]
    fn nearest_wins_and_ties_go_to_lowest_id() {
        let wv = view(&[car(4, 2, Dirn::Up), car(2, 0, Dirn::Up), car(1, 2, Dirn::Up)]);
        assert_eq!(select_car(&wv, &PickupRequest::new(3, Dirn::Up)), Some(1));
    }

    #[test]
    fn lowest_idle_id_is_the_fallback() {
        let wv = view(&[car(6, 0, Dirn::Idle), car(3, 15, Dirn::Idle), car(0, 4, Dirn::Up)]);
        assert_eq!(select_car(&wv, &PickupRequest::new(2, Dirn::Down)), Some(3));
    }

    #[test]
    fn locked_car_is_skipped() {
        let mut locked = car(0, 1, Dirn::Up);
        locked.locked = true;
        let wv = view(&[locked, car(1, 0, Dirn::Up)]);
        assert_eq!(select_car(&wv, &PickupRequest::new(4, Dirn::Up)), Some(1));

        let wv = view(&[locked]);
        assert_eq!(select_car(&wv, &PickupRequest::new(4, Dirn::Up)), None);
    }

    #[test]
    fn empty_view_selects_nothing() {
        assert_eq!(select_car(&WorldView::new(), &PickupRequest::new(0, Dirn::Up)), None);
    }
}
