//! This module contains some help functions regarding car addresses
//!
//! Car `id` always lives on port `base_port + id`, so addresses are computed,
//! never discovered.
//!
//! Functions
//! - [car_socket_addr]: Endpoint of a car.
//! - [port2id]: Car id behind an endpoint.

use std::net::{IpAddr, SocketAddr};

use crate::error::{FleetError, FleetResult};

/// Endpoint of car `id`.
///
/// ## Example
/// ```
/// use elevatorfleet::ip_help_functions::car_socket_addr;
///
/// let addr = car_socket_addr("127.0.0.1", 9000, 3).unwrap();
/// assert_eq!(addr.to_string(), "127.0.0.1:9003");
/// ```
pub fn car_socket_addr(host: &str, base_port: u16, id: u8) -> FleetResult<SocketAddr> {
    let ip: IpAddr = host
        .parse()
        .map_err(|_| FleetError::Transport(format!("'{}' is not an IP address", host)))?;
    let port = base_port
        .checked_add(u16::from(id))
        .ok_or_else(|| FleetError::Transport(format!("port of elevator {} overflows ({} + {})", id, base_port, id)))?;
    Ok(SocketAddr::new(ip, port))
}

/// Extracts the car id from `addr`.
///
/// Returns `None` if the port lies below `base_port` or too far above it.
pub fn port2id(addr: SocketAddr, base_port: u16) -> Option<u8> {
    addr.port()
        .checked_sub(base_port)
        .and_then(|offset| u8::try_from(offset).ok())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_and_id_agree() {
        for id in [0u8, 1, 15, 255] {
            let addr = car_socket_addr("10.0.0.7", 9000, id).unwrap();
            assert_eq!(port2id(addr, 9000), Some(id));
        }
    }

    #[test]
    fn port_overflow_is_rejected() {
        assert!(car_socket_addr("127.0.0.1", u16::MAX, 1).is_err());
    }

    #[test]
    fn bad_host_is_rejected() {
        assert!(matches!(car_socket_addr("elevator-host", 9000, 0), Err(FleetError::Transport(_))));
    }

    #[test]
    fn foreign_ports_have_no_id() {
        let below: SocketAddr = "127.0.0.1:8999".parse().unwrap();
        let far_above: SocketAddr = "127.0.0.1:9256".parse().unwrap();
        assert_eq!(port2id(below, 9000), None);
        assert_eq!(port2id(far_above, 9000), None);
    }
}
