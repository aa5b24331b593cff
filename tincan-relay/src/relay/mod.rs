mod pairing;
mod registry;
mod service;

pub(crate) use pairing::CallPairing;
pub(crate) use registry::ClientRegistry;
pub use service::Relay;
