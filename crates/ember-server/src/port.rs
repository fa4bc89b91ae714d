//! Port-collision discovery.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpStream};
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_millis(200);

/// Whether something is already listening on `port` locally.
pub fn port_in_use(port: u16) -> bool {
    let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port));
    TcpStream::connect_timeout(&addr, PROBE_TIMEOUT).is_ok()
}

/// First free port in `start..start + attempts`, if any.
pub fn find_available_port(start: u16, attempts: u16) -> Option<u16> {
    (0..attempts)
        .filter_map(|i| start.checked_add(i))
        .find(|port| !port_in_use(*port))
}
