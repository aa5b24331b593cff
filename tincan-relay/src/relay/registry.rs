use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rand::Rng;
use tincan_core::{ClientId, ServerFrame};
use tokio::sync::mpsc;

use crate::error::RelayError;

/// Mapping from identifier to the live connection's outbound channel.
///
/// Every key corresponds to exactly one currently-open connection; entries
/// are removed synchronously with connection closure.
pub struct ClientRegistry {
    clients: DashMap<ClientId, mpsc::UnboundedSender<ServerFrame>>,
    id_lower: u32,
    id_upper: u32,
}

impl ClientRegistry {
    pub fn new(id_lower: u32, id_upper: u32) -> Self {
        Self {
            clients: DashMap::new(),
            id_lower,
            id_upper,
        }
    }

    /// Assign a fresh identifier and register the connection under it.
    ///
    /// Collisions are resolved by regenerating; the entry API makes the
    /// check and the insert a single step, so two connections racing for
    /// the same candidate cannot both claim it.
    pub fn register(&self, tx: mpsc::UnboundedSender<ServerFrame>) -> ClientId {
        let mut rng = rand::thread_rng();
        loop {
            let candidate = ClientId::from(rng.gen_range(self.id_lower..=self.id_upper).to_string());
            match self.clients.entry(candidate) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(entry) => {
                    let id = entry.key().clone();
                    entry.insert(tx);
                    return id;
                }
            }
        }
    }

    pub fn remove(&self, id: &ClientId) {
        self.clients.remove(id);
    }

    pub fn contains(&self, id: &ClientId) -> bool {
        self.clients.contains_key(id)
    }

    /// Whether the identifier maps to a connection that can still accept
    /// frames.
    pub fn is_open(&self, id: &ClientId) -> bool {
        self.clients
            .get(id)
            .map(|tx| !tx.is_closed())
            .unwrap_or(false)
    }

    pub fn send(&self, id: &ClientId, frame: ServerFrame) -> Result<(), RelayError> {
        let Some(tx) = self.clients.get(id) else {
            return Err(RelayError::UnknownClient(id.clone()));
        };
        tx.send(frame)
            .map_err(|_| RelayError::ConnectionClosed(id.clone()))
    }
}
