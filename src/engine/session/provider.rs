use async_trait::async_trait;

use super::query::{QueryDefinition, ShardQuery};
use crate::engine::errors::ShardQueryError;
use crate::engine::operation::OperationKind;
use crate::engine::types::ShardId;

/// A single-database session bound to one shard.
#[async_trait]
pub trait ShardSession: Send {
    fn shard_id(&self) -> ShardId;

    /// Creates a fresh, unconfigured query handle for `definition`.
    fn create_query(
        &mut self,
        definition: &QueryDefinition,
    ) -> Result<Box<dyn ShardQuery>, ShardQueryError>;

    async fn close(&mut self) -> Result<(), ShardQueryError> {
        Ok(())
    }
}

/// Opens sessions against physical shards.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn open_session(&self, shard: ShardId) -> Result<Box<dyn ShardSession>, ShardQueryError>;

    /// Whether handles created by this provider accept `kind`. Checked when
    /// the caller records the operation, before any shard is contacted.
    fn supports(&self, _kind: OperationKind) -> bool {
        true
    }
}
