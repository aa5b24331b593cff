use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::ClientError;

/// Events a live peer link pushes back to the session.
#[derive(Debug)]
pub enum MediaEvent {
    /// A locally gathered connectivity candidate, ready to relay.
    LocalCandidate(Value),
    /// The remote side's audio track started.
    RemoteTrack,
}

/// Local audio capture handle. Created by explicit user action and
/// released when the call ends.
pub trait AudioSource: Send + Sync {
    fn stop(&mut self);
}

/// One peer-to-peer negotiation session.
///
/// Descriptions and candidates are opaque payloads; the session relays
/// them without interpreting their structure. Dropping a link releases
/// it; `close` allows a graceful asynchronous shutdown first.
#[async_trait]
pub trait PeerLink: Send {
    async fn create_offer(&mut self) -> Result<Value, ClientError>;
    async fn create_answer(&mut self) -> Result<Value, ClientError>;
    async fn set_local_description(&mut self, desc: Value) -> Result<(), ClientError>;
    async fn set_remote_description(&mut self, desc: Value) -> Result<(), ClientError>;
    async fn add_ice_candidate(&mut self, candidate: Value) -> Result<(), ClientError>;
    async fn add_track(&mut self, source: &dyn AudioSource) -> Result<(), ClientError>;
    async fn close(&mut self);
}

/// Factory for the host's media capabilities.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Open the local audio capture (the microphone, typically).
    async fn open_capture(&self) -> Result<Box<dyn AudioSource>, ClientError>;

    /// Open a fresh peer link. The link reports candidates and remote
    /// tracks through `events` as they appear.
    async fn open_link(
        &self,
        events: mpsc::UnboundedSender<MediaEvent>,
    ) -> Result<Box<dyn PeerLink>, ClientError>;
}
