use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::query::context::ExecutionContext;
use crate::query::resolver::ShardResolution;
use crate::query::shard_result::PerShardResult;

/// Fan-out strategy: runs the executor for every resolved shard and returns
/// one result per shard, in resolution order.
#[async_trait]
pub trait ShardDispatch: Send + Sync {
    /// Shards that have not finished by `deadline` are reported as timed out.
    async fn dispatch(
        &self,
        ctx: &Arc<ExecutionContext>,
        resolution: &ShardResolution,
        deadline: Option<Instant>,
    ) -> Vec<PerShardResult>;
}
