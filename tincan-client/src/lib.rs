mod error;
mod media;
mod prompt;
mod session;

pub use error::ClientError;
pub use media::{AudioSource, MediaBackend, MediaEvent, PeerLink};
pub use prompt::{ConsentPrompt, StatusFn};
pub use session::{CallCommand, CallRole, CallSession, CallState, drive};
