//! ## Manager module
//!
//! The dispatcher: owns the fleet snapshot and the backlog of hall calls no car
//! could take, and fans requests out to the cars.
//!
//! Every operation sends to one or more cars and then waits until each of them
//! has answered or the request timeout runs out. Replies are merged into the
//! snapshot as they arrive, so a partial answer still refreshes what it can.
//!
//! The dispatcher is driven through `&mut self`; the snapshot and the backlog
//! are never shared with another task.

pub mod task_allocator;

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{timeout_at, Instant};

use crate::config::FleetConfig;
use crate::error::{FleetError, FleetResult};
use crate::ip_help_functions;
use crate::network::message::Request;
use crate::network::CarAddress;
use crate::print;
use crate::world_view::{CarStatus, Dirn, WorldView};

use task_allocator::PickupRequest;

/// Result of a hall call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupOutcome {
    /// A car accepted it; its reply
    Assigned(CarStatus),
    /// No car qualified; the call waits in the backlog
    Queued,
}

/// Central dispatcher for a fixed fleet.
#[derive(Debug)]
pub struct Dispatcher {
    cars: Vec<CarAddress>,
    world_view: WorldView,
    backlog: VecDeque<PickupRequest>,
    timeout: Duration,
}

impl Dispatcher {
    /// Dispatcher for `cars`, where `cars[id]` is the address of car `id`.
    ///
    /// Ids are `u8`, so more than 256 addresses is an error.
    pub fn new(cars: Vec<CarAddress>, timeout: Duration) -> FleetResult<Self> {
        if cars.len() > usize::from(u8::MAX) + 1 {
            return Err(FleetError::TooManyCars { given: cars.len(), max: u8::MAX });
        }
        Ok(Self {
            cars,
            world_view: WorldView::new(),
            backlog: VecDeque::new(),
            timeout,
        })
    }

    /// Dispatcher talking TCP to the car services described by `config`.
    pub fn connect(config: &FleetConfig) -> FleetResult<Self> {
        let cars = (0..config.fleet_size)
            .map(|id| ip_help_functions::car_socket_addr(&config.host, config.base_port, id).map(CarAddress::Remote))
            .collect::<FleetResult<Vec<_>>>()?;
        Self::new(cars, config.request_timeout)
    }

    /// Number of cars, ids are `0..fleet_size`
    pub fn fleet_size(&self) -> usize {
        self.cars.len()
    }

    /// Last known status of every car that has answered
    pub fn world_view(&self) -> &WorldView {
        &self.world_view
    }

    /// Hall calls waiting for a car, oldest first
    pub fn backlog(&self) -> impl Iterator<Item = &PickupRequest> {
        self.backlog.iter()
    }

    #[allow(missing_docs)]
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    /// Asks every car for its status.
    pub async fn broadcast_status(&mut self) -> FleetResult<()> {
        let everyone = self.all_ids();
        self.gather(&everyone, Request::Status).await?;
        Ok(())
    }

    /// Asks car `id` for its status.
    pub async fn query_status(&mut self, id: u8) -> FleetResult<CarStatus> {
        self.send_one(id, Request::Status).await
    }

    /// Car call: tells car `id` to stop at `goal`, starting in `dirn` if it is idle.
    pub async fn update_car(&mut self, id: u8, goal: u8, dirn: Dirn) -> FleetResult<CarStatus> {
        let request = Request::Update { goal, dirn };
        request.validate()?;
        self.send_one(id, request).await
    }

    /// Hall call at `floor` for a passenger travelling `dirn`.
    ///
    /// Either hands it to the best car right away or queues it. Queuing is not
    /// an error; errors mean the chosen car never acknowledged, in which case the
    /// call is dropped rather than risk serving it twice.
    pub async fn assign_pickup(&mut self, floor: u8, dirn: Dirn) -> FleetResult<PickupOutcome> {
        let pickup = PickupRequest::new(floor, dirn);
        pickup.to_request().validate()?;

        match task_allocator::select_car(&self.world_view, &pickup) {
            Some(id) => {
                let status = self.send_one(id, pickup.to_request()).await?;
                print::master(format!("Pickup at floor {} ({:?}) assigned to elevator {}", floor, dirn, id));
                Ok(PickupOutcome::Assigned(status))
            }
            None => {
                self.backlog.push_back(pickup);
                print::warn(format!("all cars are busy! pickup at floor {} queued ({} waiting)", floor, self.backlog.len()));
                Ok(PickupOutcome::Queued)
            }
        }
    }

    /// Advances every car one time unit, then retries the backlog once.
    pub async fn step(&mut self) -> FleetResult<()> {
        let everyone = self.all_ids();
        self.gather(&everyone, Request::Step).await?;
        self.drain_backlog().await
    }

    /// Retries each queued call exactly once, in order.
    ///
    /// Calls that still find no car go back to the tail in their previous
    /// relative order. A failed assignment does not stop the rest; the first
    /// failure is returned at the end.
    async fn drain_backlog(&mut self) -> FleetResult<()> {
        let mut failure = None;

        for _ in 0..self.backlog.len() {
            let pickup = match self.backlog.pop_front() {
                Some(pickup) => pickup,
                None => break,
            };
            match task_allocator::select_car(&self.world_view, &pickup) {
                Some(id) => match self.send_one(id, pickup.to_request()).await {
                    Ok(_) => print::master(format!(
                        "Queued pickup at floor {} ({:?}) assigned to elevator {}",
                        pickup.floor, pickup.dirn, id
                    )),
                    Err(e) => {
                        print::err(format!("Dropping queued pickup at floor {}: {}", pickup.floor, e));
                        failure.get_or_insert(e);
                    }
                },
                None => self.backlog.push_back(pickup),
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn send_one(&mut self, id: u8, request: Request) -> FleetResult<CarStatus> {
        self.check_car(id)?;
        let mut replies = self.gather(&[id], request).await?;
        replies
            .pop()
            .ok_or(FleetError::Unreachable { expected: 1, received: 0 })
    }

    /// Delivers `request` to every car in `targets` and collects exactly one
    /// reply per target, merging each into the snapshot on arrival.
    async fn gather(&mut self, targets: &[u8], request: Request) -> FleetResult<Vec<CarStatus>> {
        let expected = targets.len();
        if expected == 0 {
            return Ok(Vec::new());
        }

        let (reply_tx, mut reply_rx) = mpsc::channel(expected);
        for &id in targets {
            self.cars[usize::from(id)].deliver(request, reply_tx.clone());
        }
        // Only the in-flight deliveries may hold senders now
        drop(reply_tx);

        let deadline = Instant::now() + self.timeout;
        let mut replies = Vec::with_capacity(expected);
        while replies.len() < expected {
            match timeout_at(deadline, reply_rx.recv()).await {
                Ok(Some(status)) => {
                    self.world_view.merge(status);
                    replies.push(status);
                }
                Ok(None) => {
                    print::err(format!("{:?}: {} of {} cars unreachable", request, expected - replies.len(), expected));
                    return Err(FleetError::Unreachable { expected, received: replies.len() });
                }
                Err(_) => {
                    print::err(format!(
                        "{:?}: timed out after {:?} with {} of {} replies",
                        request, self.timeout, replies.len(), expected
                    ));
                    return Err(FleetError::Timeout { expected, received: replies.len(), after: self.timeout });
                }
            }
        }
        Ok(replies)
    }

    fn check_car(&self, id: u8) -> FleetResult<()> {
        if usize::from(id) < self.cars.len() {
            Ok(())
        } else {
            Err(FleetError::UnknownCar { id, fleet_size: self.cars.len() })
        }
    }

    fn all_ids(&self) -> Vec<u8> {
        (0..self.cars.len()).map(|id| id as u8).collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevator_logic::{spawn_car, spawn_local_fleet};

    fn local(fleet_size: u8) -> Dispatcher {
        Dispatcher::new(spawn_local_fleet(fleet_size), Duration::from_secs(2)).unwrap()
    }

    fn idle_at(id: u8, floor: u8) -> CarStatus {
        CarStatus { id, floor, next_goal: None, dirn: Dirn::Idle, locked: false }
    }

    #[tokio::test]
    async fn broadcast_fills_snapshot() {
        let mut dispatcher = local(3);
        dispatcher.broadcast_status().await.unwrap();

        assert_eq!(dispatcher.world_view().len(), 3);
        assert!(dispatcher.world_view().iter().all(|s| s.floor == 0 && s.dirn == Dirn::Idle));
    }

    #[tokio::test]
    async fn pickup_goes_to_idle_car_after_status() {
        let mut dispatcher = local(2);
        dispatcher.broadcast_status().await.unwrap();

        let outcome = dispatcher.assign_pickup(4, Dirn::Down).await.unwrap();
        match outcome {
            PickupOutcome::Assigned(status) => {
                assert_eq!(status.id, 0);
                assert_eq!(status.dirn, Dirn::Up);
                assert!(status.locked);
            }
            PickupOutcome::Queued => panic!("idle car available but pickup was queued"),
        }
        assert_eq!(dispatcher.world_view().get(0).map(|s| s.locked), Some(true));
    }

    #[tokio::test]
    async fn busy_fleet_queues_then_drains_after_step() {
        let mut dispatcher = local(1);
        dispatcher.update_car(0, 2, Dirn::Up).await.unwrap();

        let outcome = dispatcher.assign_pickup(1, Dirn::Down).await.unwrap();
        assert_eq!(outcome, PickupOutcome::Queued);
        assert_eq!(dispatcher.backlog_len(), 1);

        // Car passes floor 1 going up, still not a candidate
        dispatcher.step().await.unwrap();
        assert_eq!(dispatcher.backlog_len(), 1);

        // Car reaches 2 and idles, the queued call is handed over
        dispatcher.step().await.unwrap();
        assert_eq!(dispatcher.backlog_len(), 0);

        let car = dispatcher.query_status(0).await.unwrap();
        assert_eq!(car.floor, 2);
        assert_eq!(car.dirn, Dirn::Down);
        assert_eq!(car.next_goal, Some(1));
        assert!(car.locked);
    }

    #[tokio::test]
    async fn backlog_keeps_fifo_order() {
        let mut dispatcher = local(1);
        dispatcher.update_car(0, 9, Dirn::Up).await.unwrap();

        for floor in [3, 1, 2] {
            dispatcher.assign_pickup(floor, Dirn::Down).await.unwrap();
        }
        dispatcher.step().await.unwrap();
        dispatcher.step().await.unwrap();

        let floors: Vec<u8> = dispatcher.backlog().map(|p| p.floor).collect();
        assert_eq!(floors, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_a_car() {
        let mut dispatcher = local(2);
        assert!(matches!(
            dispatcher.update_car(7, 1, Dirn::Up).await,
            Err(FleetError::UnknownCar { id: 7, fleet_size: 2 })
        ));
        assert!(matches!(
            dispatcher.assign_pickup(16, Dirn::Up).await,
            Err(FleetError::InvalidFloor { floor: 16, .. })
        ));
        assert!(matches!(
            dispatcher.assign_pickup(3, Dirn::Idle).await,
            Err(FleetError::InvalidDirection(Dirn::Idle))
        ));
        assert_eq!(dispatcher.backlog_len(), 0);
    }

    #[tokio::test]
    async fn silent_car_times_out_but_others_are_merged() {
        let mut cars = spawn_local_fleet(2);
        // A mailbox nobody reads
        let (silent, _keep_open) = mpsc::channel(1);
        cars.push(CarAddress::Local(silent));
        let mut dispatcher = Dispatcher::new(cars, Duration::from_millis(100)).unwrap();

        let result = dispatcher.broadcast_status().await;
        assert!(matches!(result, Err(FleetError::Timeout { expected: 3, received: 2, .. })));
        assert_eq!(dispatcher.world_view().len(), 2);
    }

    #[tokio::test]
    async fn dead_car_is_unreachable() {
        let (dead, closed) = mpsc::channel(1);
        drop(closed);
        let mut dispatcher = Dispatcher::new(vec![CarAddress::Local(dead)], Duration::from_secs(2)).unwrap();

        assert!(matches!(
            dispatcher.query_status(0).await,
            Err(FleetError::Unreachable { expected: 1, received: 0 })
        ));
    }

    #[tokio::test]
    async fn timed_out_pickup_is_dropped_not_queued() {
        let (silent, _keep_open) = mpsc::channel(1);
        let mut dispatcher = Dispatcher::new(vec![CarAddress::Local(silent)], Duration::from_millis(100)).unwrap();
        // Last known status says idle, but the car never answers
        dispatcher.world_view.merge(idle_at(0, 0));

        let result = dispatcher.assign_pickup(3, Dirn::Down).await;
        assert!(matches!(
            result,
            Err(FleetError::Timeout { expected: 1, received: 0, .. })
        ));
        assert_eq!(dispatcher.backlog_len(), 0);
    }

    #[tokio::test]
    async fn drain_reports_first_failure_and_retries_the_rest() {
        let (silent, _keep_open) = mpsc::channel(1);
        let cars = vec![CarAddress::Local(silent), CarAddress::Local(spawn_car(1))];
        let mut dispatcher = Dispatcher::new(cars, Duration::from_millis(100)).unwrap();

        // Car 0 looks idle but is silent; car 1 is heading down from 9
        dispatcher.world_view.merge(idle_at(0, 0));
        dispatcher.world_view.merge(CarStatus { id: 1, floor: 9, next_goal: Some(0), dirn: Dirn::Down, locked: false });
        dispatcher.backlog.push_back(PickupRequest::new(3, Dirn::Up));
        dispatcher.backlog.push_back(PickupRequest::new(5, Dirn::Down));

        let result = dispatcher.drain_backlog().await;
        assert!(matches!(result, Err(FleetError::Timeout { expected: 1, received: 0, .. })));
        assert_eq!(dispatcher.backlog_len(), 0);

        let second = dispatcher.world_view().get(1).copied().unwrap();
        assert!(second.locked);
        assert_eq!(second.next_goal, Some(5));
    }

    #[tokio::test]
    async fn idle_hint_starts_car_towards_goal() {
        let mut dispatcher = local(1);
        let status = dispatcher.update_car(0, 5, Dirn::Idle).await.unwrap();
        assert_eq!(status.dirn, Dirn::Up);
        assert_eq!(status.next_goal, Some(5));
    }

    #[test]
    fn more_cars_than_ids_is_an_error() {
        let (mailbox, _closed) = mpsc::channel(1);
        let cars = vec![CarAddress::Local(mailbox); 257];
        assert!(matches!(
            Dispatcher::new(cars, Duration::from_secs(2)),
            Err(FleetError::TooManyCars { given: 257, max: 255 })
        ));
    }
}
