use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

use super::provider::{SessionProvider, ShardSession};
use crate::engine::errors::ShardQueryError;
use crate::engine::types::ShardId;

pub type SharedSession = Arc<AsyncMutex<Box<dyn ShardSession>>>;

/// Lazily opened sessions, one per shard, for the lifetime of a single
/// logical execution.
pub struct SessionCache {
    provider: Arc<dyn SessionProvider>,
    sessions: Mutex<HashMap<ShardId, SharedSession>>,
}

impl SessionCache {
    pub fn new(provider: Arc<dyn SessionProvider>) -> Self {
        Self {
            provider,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the shard's session, opening it on first use.
    pub async fn session(&self, shard: ShardId) -> Result<SharedSession, ShardQueryError> {
        let cached = self.sessions.lock().get(&shard).cloned();
        if let Some(session) = cached {
            return Ok(session);
        }

        debug!(target: "shard_query::session", shard_id = %shard, "Opening shard session");
        let opened = self.provider.open_session(shard).await?;
        let shared = Arc::new(AsyncMutex::new(opened));
        let session = self
            .sessions
            .lock()
            .entry(shard)
            .or_insert(shared)
            .clone();
        Ok(session)
    }

    pub fn open_count(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_open(&self, shard: ShardId) -> bool {
        self.sessions.lock().contains_key(&shard)
    }

    /// Closes every session opened during the execution. Close failures are
    /// logged and otherwise ignored.
    pub async fn release_all(&self) {
        let mut drained: Vec<(ShardId, SharedSession)> = self.sessions.lock().drain().collect();
        drained.sort_by_key(|(shard, _)| *shard);

        for (shard, session) in drained {
            let mut guard = session.lock().await;
            match guard.close().await {
                Ok(()) => {
                    debug!(target: "shard_query::session", shard_id = %shard, "Shard session closed");
                }
                Err(e) => {
                    warn!(target: "shard_query::session", shard_id = %shard, error = %e, "Failed to close shard session");
                }
            }
        }
    }
}
