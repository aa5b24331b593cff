use thiserror::Error;
use tincan_core::ClientId;

/// Errors raised while delivering a frame to a registered client.
#[derive(Error, Debug)]
pub enum RelayError {
    /// No client with this identifier is registered.
    #[error("no connected client {0}")]
    UnknownClient(ClientId),

    /// The client is registered but its connection is shutting down.
    #[error("connection to client {0} is closed")]
    ConnectionClosed(ClientId),
}
