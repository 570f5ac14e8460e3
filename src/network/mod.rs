//! ## Network module
//!
//! How requests reach a car and how replies find their way back.
//!
//! ## Sub-modules
//! - [message]: request kinds and their `bincode` encoding
//! - [tcp_network]: length-prefixed framing, car listener and request client
//!
//! A car is either reached through its in-process mailbox or through its TCP
//! endpoint; [CarAddress] hides the difference from the dispatcher. Delivery
//! has no timeout of its own, the dispatcher bounds every wait.

pub mod message;
pub mod tcp_network;

use std::net::SocketAddr;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::elevator_logic::Envelope;
use crate::print;
use crate::world_view::CarStatus;

use message::Request;

/// Where one car can be reached.
#[derive(Debug, Clone)]
pub enum CarAddress {
    /// Mailbox of a car actor in this process
    Local(mpsc::Sender<Envelope>),
    /// Endpoint of a car service
    Remote(SocketAddr),
}

impl CarAddress {
    /// Sends `request`; the car's reply arrives on `reply_to`.
    ///
    /// A local car's mailbox is written before this returns, so requests reach a
    /// local car in the order they were delivered. A remote request runs on a
    /// background task with its own connection.
    ///
    /// If delivery fails the failure is logged and `reply_to` is dropped without a
    /// reply, which lets the waiting side tell "unreachable" apart from "slow".
    pub fn deliver(&self, request: Request, reply_to: mpsc::Sender<CarStatus>) {
        match self {
            CarAddress::Local(mailbox) => match mailbox.try_send(Envelope { request, reply_to }) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    print::err(format!("Local car mailbox is full, {:?} not delivered", request));
                }
                Err(TrySendError::Closed(_)) => {
                    print::err(format!("Local car is gone, {:?} not delivered", request));
                }
            },
            CarAddress::Remote(addr) => {
                let addr = *addr;
                tokio::spawn(async move {
                    match tcp_network::request(addr, &request).await {
                        Ok(status) => {
                            // Receiver gone means the dispatcher already timed out
                            let _ = reply_to.send(status).await;
                        }
                        Err(e) => {
                            print::err(format!("{:?} to {} failed: {}", request, addr, e));
                        }
                    }
                });
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::elevator_logic::spawn_car;
    use crate::world_view::Dirn;

    #[tokio::test]
    async fn local_delivery_returns_reply() {
        let address = CarAddress::Local(spawn_car(1));
        let (reply_tx, mut reply_rx) = mpsc::channel(1);
        address.deliver(Request::Status, reply_tx);

        assert_eq!(reply_rx.recv().await.map(|s| s.id), Some(1));
    }

    #[tokio::test]
    async fn failed_delivery_drops_reply_channel() {
        let (mailbox, closed) = mpsc::channel(1);
        drop(closed);

        let (reply_tx, mut reply_rx) = mpsc::channel(1);
        CarAddress::Local(mailbox).deliver(Request::Step, reply_tx);

        assert!(reply_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn full_mailbox_drops_reply_channel() {
        let (mailbox, _unread) = mpsc::channel(1);
        let address = CarAddress::Local(mailbox);

        let (first_tx, _first_rx) = mpsc::channel(1);
        address.deliver(Request::Status, first_tx);
        let (reply_tx, mut reply_rx) = mpsc::channel(1);
        address.deliver(Request::Status, reply_tx);

        assert!(reply_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn local_requests_are_applied_in_delivery_order() {
        let address = CarAddress::Local(spawn_car(0));
        let (reply_tx, mut reply_rx) = mpsc::channel(3);
        address.deliver(Request::Update { goal: 2, dirn: Dirn::Up }, reply_tx.clone());
        address.deliver(Request::Step, reply_tx.clone());
        address.deliver(Request::Status, reply_tx);

        let floors: Vec<u8> = [
            reply_rx.recv().await.unwrap(),
            reply_rx.recv().await.unwrap(),
            reply_rx.recv().await.unwrap(),
        ]
        .iter()
        .map(|status| status.floor)
        .collect();
        assert_eq!(floors, vec![0, 1, 1]);
    }
}
