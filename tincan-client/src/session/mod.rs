mod call_session;
mod driver;
mod state;

pub use call_session::CallSession;
pub use driver::{CallCommand, drive};
pub use state::{CallRole, CallState};
