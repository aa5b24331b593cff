use dashmap::DashMap;
use tincan_core::ClientId;

/// Mapping from a client to its current call partner.
///
/// Symmetric: if A maps to B then B maps to A, and a client appears as a
/// key in at most one pairing at a time.
pub struct CallPairing {
    calls: DashMap<ClientId, ClientId>,
}

impl CallPairing {
    pub fn new() -> Self {
        Self {
            calls: DashMap::new(),
        }
    }

    /// Record an accepted call between the two clients. Any previous
    /// pairing of either member is dissolved first, so a client never
    /// appears in two pairs at once.
    pub fn insert(&self, a: ClientId, b: ClientId) {
        self.remove_pair(&a);
        self.remove_pair(&b);
        self.calls.insert(a.clone(), b.clone());
        self.calls.insert(b, a);
    }

    pub fn partner_of(&self, id: &ClientId) -> Option<ClientId> {
        self.calls.get(id).map(|p| p.clone())
    }

    /// Remove both directions of the pairing, returning the partner.
    /// Safe to call again after the pairing is gone.
    pub fn remove_pair(&self, id: &ClientId) -> Option<ClientId> {
        let (_, partner) = self.calls.remove(id)?;
        self.calls.remove(&partner);
        Some(partner)
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}
