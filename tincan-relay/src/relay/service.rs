use std::sync::Arc;

use tincan_core::{ClientFrame, ClientId, CloseReason, ServerFrame, TARGET_NOT_AVAILABLE};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::RelayConfig;
use crate::relay::{CallPairing, ClientRegistry};

struct RelayInner {
    registry: ClientRegistry,
    calls: CallPairing,
}

/// Registry & relay service.
///
/// Owns the identifier registry and the pairing table; every inbound
/// control frame is processed to completion here, including the relay
/// sends it triggers. Instances are independent, so several can coexist
/// in one process.
#[derive(Clone)]
pub struct Relay {
    inner: Arc<RelayInner>,
}

impl Relay {
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            inner: Arc::new(RelayInner {
                registry: ClientRegistry::new(config.id_lower, config.id_upper),
                calls: CallPairing::new(),
            }),
        }
    }

    /// Register a new connection, assign it an identifier and send the
    /// `id` frame down its channel.
    pub fn register(&self, tx: mpsc::UnboundedSender<ServerFrame>) -> ClientId {
        let id = self.inner.registry.register(tx);
        let _ = self
            .inner
            .registry
            .send(&id, ServerFrame::Id { id: id.clone() });
        info!("Client connected: {id}");
        id
    }

    /// Process one control frame from `sender`.
    pub fn handle_frame(&self, sender: &ClientId, frame: ClientFrame) {
        match frame {
            ClientFrame::Request { target_id } => {
                if self.inner.registry.is_open(&target_id) {
                    self.forward(
                        &target_id,
                        ServerFrame::Request {
                            from: sender.clone(),
                        },
                    );
                } else {
                    // The only unreachable-target case that earns an
                    // explicit reply; nothing was mutated.
                    self.forward(
                        sender,
                        ServerFrame::Error {
                            message: TARGET_NOT_AVAILABLE.to_string(),
                        },
                    );
                }
            }

            ClientFrame::Response { target_id, accepted } => {
                let delivered = self.forward(
                    &target_id,
                    ServerFrame::Response {
                        from: sender.clone(),
                        accepted,
                    },
                );
                // Pairing exists only for calls both sides can still see:
                // if the original requester is gone, the acceptance is
                // dropped along with the frame.
                if accepted && delivered {
                    self.inner.calls.insert(sender.clone(), target_id);
                }
            }

            ClientFrame::Offer { offer, target_id } => {
                self.forward(
                    &target_id,
                    ServerFrame::Offer {
                        from: sender.clone(),
                        offer,
                    },
                );
            }

            ClientFrame::Answer { answer, target_id } => {
                self.forward(
                    &target_id,
                    ServerFrame::Answer {
                        from: sender.clone(),
                        answer,
                    },
                );
            }

            ClientFrame::Candidate { candidate, target_id } => {
                self.forward(
                    &target_id,
                    ServerFrame::Candidate {
                        from: sender.clone(),
                        candidate,
                    },
                );
            }

            ClientFrame::Disconnect { .. } => {
                // The partner comes from the pairing table, not from the
                // client-supplied target.
                if let Some(partner) = self.inner.calls.remove_pair(sender) {
                    self.forward(
                        &partner,
                        ServerFrame::Disconnect {
                            from: sender.clone(),
                            reason: None,
                        },
                    );
                }
            }
        }
    }

    /// Teardown for a closing connection, normal or failed.
    ///
    /// Treated as an implicit disconnect: a paired partner is notified
    /// with the close reason, both pairing entries are cleared, and the
    /// registry entry is removed unconditionally. Idempotent.
    pub fn connection_closed(&self, id: &ClientId, reason: CloseReason) {
        if let Some(partner) = self.inner.calls.remove_pair(id) {
            self.forward(
                &partner,
                ServerFrame::Disconnect {
                    from: id.clone(),
                    reason: Some(reason.as_str().to_string()),
                },
            );
        }
        self.inner.registry.remove(id);
        info!("Client disconnected: {id}");
    }

    /// Deliver a frame, dropping it silently (with a log line) when the
    /// target is unreachable.
    fn forward(&self, to: &ClientId, frame: ServerFrame) -> bool {
        match self.inner.registry.send(to, frame) {
            Ok(()) => true,
            Err(e) => {
                warn!("Dropping frame: {e}");
                false
            }
        }
    }

    /// Whether the identifier is currently registered.
    pub fn is_connected(&self, id: &ClientId) -> bool {
        self.inner.registry.contains(id)
    }

    /// The client's current call partner, if any.
    pub fn partner_of(&self, id: &ClientId) -> Option<ClientId> {
        self.inner.calls.partner_of(id)
    }

    /// Whether any call is currently tracked.
    pub fn has_active_calls(&self) -> bool {
        !self.inner.calls.is_empty()
    }
}
