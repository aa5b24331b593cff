use thiserror::Error;

/// Client-side failures. Precondition violations surface synchronously
/// to the caller and are never sent over the wire.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A call was placed with an empty target identifier.
    #[error("a target identifier is required")]
    EmptyTarget,

    /// No `id` frame has arrived yet.
    #[error("no identifier has been assigned yet")]
    NotRegistered,

    /// The local audio capture has not been enabled.
    #[error("local audio is not enabled")]
    MediaDisabled,

    /// A call was placed while another one is still underway.
    #[error("a call is already in progress")]
    CallInProgress,

    /// The channel towards the relay is closed.
    #[error("connection to the relay is closed")]
    ChannelClosed,

    /// The media-negotiation capability failed.
    #[error("media backend: {0}")]
    Media(String),
}
