use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::client::ClientId;

/// Error text returned for a `request` naming an unreachable client.
pub const TARGET_NOT_AVAILABLE: &str = "Target not available";

/// Why a paired partner vanished without sending `disconnect` itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    ConnectionLost,
    ConnectionError,
}

impl CloseReason {
    pub fn as_str(self) -> &'static str {
        match self {
            CloseReason::ConnectionLost => "connection lost",
            CloseReason::ConnectionError => "connection error",
        }
    }
}

/// Control frames a client sends to the relay.
///
/// The `offer`/`answer`/`candidate` payloads are opaque to the relay; it
/// forwards them without inspecting their structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientFrame {
    Request {
        #[serde(rename = "targetId")]
        target_id: ClientId,
    },
    Response {
        #[serde(rename = "targetId")]
        target_id: ClientId,
        accepted: bool,
    },
    Offer {
        offer: Value,
        #[serde(rename = "targetId")]
        target_id: ClientId,
    },
    Answer {
        answer: Value,
        #[serde(rename = "targetId")]
        target_id: ClientId,
    },
    Candidate {
        candidate: Value,
        #[serde(rename = "targetId")]
        target_id: ClientId,
    },
    Disconnect {
        /// Clients include their partner here; the relay ignores it and
        /// resolves the partner from its own pairing table.
        #[serde(rename = "targetId", default, skip_serializing_if = "Option::is_none")]
        target_id: Option<ClientId>,
    },
}

/// Frames the relay sends to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerFrame {
    Id {
        id: ClientId,
    },
    Request {
        from: ClientId,
    },
    Response {
        from: ClientId,
        accepted: bool,
    },
    Offer {
        from: ClientId,
        offer: Value,
    },
    Answer {
        from: ClientId,
        answer: Value,
    },
    Candidate {
        from: ClientId,
        candidate: Value,
    },
    Disconnect {
        from: ClientId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    Error {
        message: String,
    },
}
