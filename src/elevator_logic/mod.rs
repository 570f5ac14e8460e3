//! ## Elevator logic
//!
//! Everything that runs on the car side.
//!
//! ## Sub-modules
//! - [bits]: bit-scan helpers used by the goal search
//! - [goals]: the pending-goal bitset
//! - [fsm]: the per-car LOOK state machine
//!
//! Each car is an actor: one tokio task owns one [fsm::ElevatorCar] and drains a
//! bounded mailbox of [Envelope]s one at a time, so the car itself never needs a lock.

pub mod bits;
pub mod goals;
pub mod fsm;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config;
use crate::error::FleetResult;
use crate::network::message::Request;
use crate::network::{tcp_network, CarAddress};
use crate::print;
use crate::world_view::CarStatus;

use fsm::ElevatorCar;

/// A request together with the channel its reply goes back on.
#[derive(Debug)]
pub struct Envelope {
    /// What the car should do
    pub request: Request,
    /// Where the resulting [CarStatus] is sent
    pub reply_to: mpsc::Sender<CarStatus>,
}

/// Spawns the actor task for car `id` and returns its mailbox.
///
/// The task lives until every sender of the mailbox is dropped.
pub fn spawn_car(id: u8) -> mpsc::Sender<Envelope> {
    let (mailbox_tx, mailbox_rx) = mpsc::channel(config::MAILBOX_CAPACITY);
    tokio::spawn(run_car(ElevatorCar::new(id), mailbox_rx));
    mailbox_tx
}

/// Processes `mailbox` strictly in arrival order, answering every envelope.
///
/// ## Parameters
/// - `car`: the state machine this task owns
/// - `mailbox`: inbound requests
pub async fn run_car(mut car: ElevatorCar, mut mailbox: mpsc::Receiver<Envelope>) {
    while let Some(Envelope { request, reply_to }) = mailbox.recv().await {
        let status = car.handle(request);
        if reply_to.send(status).await.is_err() {
            // The requester gave up (timeout) before we answered
            print::warn(format!("elevator {}: nobody waiting for reply to {:?}", car.id(), request));
        }
    }
    print::info(format!("elevator {} mailbox closed, stopping", car.id()));
}

/// Spawns cars `0..fleet_size` in this process.
///
/// The returned addresses are indexed by car id.
pub fn spawn_local_fleet(fleet_size: u8) -> Vec<CarAddress> {
    (0..fleet_size)
        .map(|id| CarAddress::Local(spawn_car(id)))
        .collect()
}

/// Runs car `id` as a network service on an already bound `listener`.
///
/// Never returns while the listener is healthy.
pub async fn start_car_service(id: u8, listener: TcpListener) {
    let mailbox = spawn_car(id);
    match listener.local_addr() {
        Ok(addr) => print::slave(format!("elevator {} ready on {}", id, addr)),
        Err(_) => print::slave(format!("elevator {} ready", id)),
    }
    tcp_network::listener_task(id, listener, mailbox).await;
}

/// Binds `addr` and runs car `id` on it.
pub async fn run_car_service(id: u8, addr: SocketAddr) -> FleetResult<()> {
    let listener = tcp_network::bind_car_listener(addr).await?;
    start_car_service(id, listener).await;
    Ok(())
}
