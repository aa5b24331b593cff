mod model;

pub use model::{ClientFrame, ClientId, CloseReason, ServerFrame, TARGET_NOT_AVAILABLE};
