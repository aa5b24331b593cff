pub mod connection_tests;

use tincan_relay::{Relay, RelayConfig};
use tracing::Level;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_relay() -> Relay {
    Relay::new(&RelayConfig::default())
}
