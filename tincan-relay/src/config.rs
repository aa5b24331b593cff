use std::net::SocketAddr;

/// Relay settings. The identifier space bounds are configuration
/// constants, not hidden assumptions; collisions inside the space are
/// resolved by retry, never by rejecting the connection.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub listen_addr: SocketAddr,
    pub id_lower: u32,
    pub id_upper: u32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3198)),
            id_lower: 10_000,
            id_upper: 99_999,
        }
    }
}
