mod config;
mod error;
mod relay;
mod ws;

pub use config::RelayConfig;
pub use error::RelayError;
pub use relay::Relay;
pub use ws::ws_handler;
