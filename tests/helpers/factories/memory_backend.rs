use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::recording_query::{Journal, RecordingQuery, ShardFixture};
use crate::engine::errors::ShardQueryError;
use crate::engine::operation::{Operation, OperationKind};
use crate::engine::session::{QueryDefinition, SessionProvider, ShardQuery, ShardSession};
use crate::engine::types::{Row, ShardId};

/// In-memory session provider. Each shard answers from its own fixture and
/// every replayed call lands in a shared journal tagged with the shard.
///
/// Clones share the journal and the open/close bookkeeping, so a test can
/// hand one clone to a session and inspect another.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    fixtures: HashMap<ShardId, ShardFixture>,
    open_failures: HashMap<ShardId, ShardQueryError>,
    provider_unsupported: HashSet<OperationKind>,
    handle_unsupported: HashSet<OperationKind>,
    journal: Journal,
    definitions: Arc<Mutex<Vec<(ShardId, QueryDefinition)>>>,
    opened: Arc<Mutex<Vec<ShardId>>>,
    closed: Arc<Mutex<Vec<ShardId>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn fixture(&mut self, shard: u32) -> &mut ShardFixture {
        self.fixtures.entry(ShardId(shard)).or_default()
    }

    pub fn with_rows(mut self, shard: u32, rows: Vec<Row>) -> Self {
        self.fixture(shard).rows = rows;
        self
    }

    pub fn with_failure(mut self, shard: u32, error: ShardQueryError) -> Self {
        self.fixture(shard).failure = Some(error);
        self
    }

    pub fn with_delay(mut self, shard: u32, delay: Duration) -> Self {
        self.fixture(shard).delay = Some(delay);
        self
    }

    pub fn with_update_count(mut self, shard: u32, count: u64) -> Self {
        self.fixture(shard).update_count = Some(count);
        self
    }

    pub fn with_open_failure(mut self, shard: u32, error: ShardQueryError) -> Self {
        self.open_failures.insert(ShardId(shard), error);
        self
    }

    /// Rejected when recorded, before any shard is contacted.
    pub fn without_provider_support(mut self, kind: OperationKind) -> Self {
        self.provider_unsupported.insert(kind);
        self
    }

    /// Accepted when recorded, rejected by the handle during replay.
    pub fn without_handle_support(mut self, kind: OperationKind) -> Self {
        self.handle_unsupported.insert(kind);
        self
    }

    pub fn into_provider(self) -> Arc<dyn SessionProvider> {
        Arc::new(self)
    }

    pub fn journal(&self) -> Vec<(ShardId, Operation)> {
        self.journal.lock().clone()
    }

    pub fn journal_for(&self, shard: u32) -> Vec<Operation> {
        let shard = ShardId(shard);
        self.journal
            .lock()
            .iter()
            .filter(|(id, _)| *id == shard)
            .map(|(_, op)| op.clone())
            .collect()
    }

    pub fn definitions(&self) -> Vec<(ShardId, QueryDefinition)> {
        self.definitions.lock().clone()
    }

    pub fn opened(&self) -> Vec<ShardId> {
        let mut opened = self.opened.lock().clone();
        opened.sort();
        opened
    }

    pub fn closed(&self) -> Vec<ShardId> {
        let mut closed = self.closed.lock().clone();
        closed.sort();
        closed
    }
}

#[async_trait]
impl SessionProvider for MemoryBackend {
    async fn open_session(&self, shard: ShardId) -> Result<Box<dyn ShardSession>, ShardQueryError> {
        self.opened.lock().push(shard);
        if let Some(error) = self.open_failures.get(&shard) {
            return Err(error.clone());
        }

        Ok(Box::new(MemorySession {
            shard,
            fixture: self.fixtures.get(&shard).cloned().unwrap_or_default(),
            unsupported: self.handle_unsupported.clone(),
            journal: Arc::clone(&self.journal),
            definitions: Arc::clone(&self.definitions),
            closed: Arc::clone(&self.closed),
        }))
    }

    fn supports(&self, kind: OperationKind) -> bool {
        !self.provider_unsupported.contains(&kind)
    }
}

struct MemorySession {
    shard: ShardId,
    fixture: ShardFixture,
    unsupported: HashSet<OperationKind>,
    journal: Journal,
    definitions: Arc<Mutex<Vec<(ShardId, QueryDefinition)>>>,
    closed: Arc<Mutex<Vec<ShardId>>>,
}

#[async_trait]
impl ShardSession for MemorySession {
    fn shard_id(&self) -> ShardId {
        self.shard
    }

    fn create_query(
        &mut self,
        definition: &QueryDefinition,
    ) -> Result<Box<dyn ShardQuery>, ShardQueryError> {
        self.definitions.lock().push((self.shard, definition.clone()));
        Ok(Box::new(RecordingQuery::for_shard(
            self.shard,
            self.fixture.clone(),
            Arc::clone(&self.journal),
            self.unsupported.clone(),
        )))
    }

    async fn close(&mut self) -> Result<(), ShardQueryError> {
        self.closed.lock().push(self.shard);
        Ok(())
    }
}
