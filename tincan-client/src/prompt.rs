use async_trait::async_trait;
use std::sync::Arc;
use tincan_core::ClientId;

/// User-consent decision for an inbound call request.
#[async_trait]
pub trait ConsentPrompt: Send + Sync {
    async fn decide(&self, from: &ClientId) -> bool;
}

/// Advisory progress callback for the host application. Not part of the
/// protocol contract.
pub type StatusFn = Arc<dyn Fn(&str) + Send + Sync>;
