use tincan_core::ClientId;

/// Which side drives the description exchange once a call is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallRole {
    /// The caller: constructs and sends the offer.
    Offering,
    /// The callee: answers the remote offer.
    Answering,
}

/// Local call lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallState {
    Idle,
    /// Caller side: request sent, waiting for the remote decision.
    AwaitingCallDecision { target: ClientId },
    /// Callee side: prompting for the local decision.
    AwaitingLocalDecision { from: ClientId },
    /// Pairing accepted; descriptions and candidates in flight.
    Negotiating {
        partner: ClientId,
        role: CallRole,
        local_set: bool,
        remote_set: bool,
    },
    /// Both descriptions applied; the peer connection is established.
    InCall { partner: ClientId },
}

impl CallState {
    /// The other party of the current exchange, if any.
    pub fn counterpart(&self) -> Option<&ClientId> {
        match self {
            CallState::Idle => None,
            CallState::AwaitingCallDecision { target } => Some(target),
            CallState::AwaitingLocalDecision { from } => Some(from),
            CallState::Negotiating { partner, .. } | CallState::InCall { partner } => Some(partner),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, CallState::Idle)
    }
}
