mod client;
mod frame;

pub use client::ClientId;
pub use frame::{ClientFrame, CloseReason, ServerFrame, TARGET_NOT_AVAILABLE};
