use std::sync::Arc;

pub use super::factories::{MemoryBackend, RecordingQuery, RowFactory};

use crate::engine::types::ShardId;
use crate::query::session::ShardedSession;
use crate::shared::config::FanOutConfig;

pub struct Factory;

impl Factory {
    pub fn row() -> RowFactory {
        RowFactory::new()
    }

    pub fn backend() -> MemoryBackend {
        MemoryBackend::new()
    }

    pub fn recording_query() -> RecordingQuery {
        RecordingQuery::new()
    }

    pub fn shard_ids(ids: &[u32]) -> Vec<ShardId> {
        ids.iter().copied().map(ShardId).collect()
    }

    /// Session over `shards` backed by `backend`, default fan-out settings.
    pub fn session(backend: &MemoryBackend, shards: &[u32]) -> ShardedSession {
        Self::session_with(backend, shards, FanOutConfig::default())
    }

    pub fn session_with(
        backend: &MemoryBackend,
        shards: &[u32],
        config: FanOutConfig,
    ) -> ShardedSession {
        ShardedSession::builder(Arc::new(backend.clone()))
            .shards(Self::shard_ids(shards))
            .config(config)
            .build()
            .expect("test session should build")
    }
}
