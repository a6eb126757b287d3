use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::{Instant, timeout_at};
use tracing::{info, warn};

use super::executor::ShardExecutor;
use super::traits::ShardDispatch;
use crate::query::context::ExecutionContext;
use crate::query::resolver::ShardResolution;
use crate::query::shard_result::PerShardResult;

/// Visits shards one at a time, in resolution order.
#[derive(Default)]
pub struct SequentialShardDispatcher;

impl SequentialShardDispatcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ShardDispatch for SequentialShardDispatcher {
    async fn dispatch(
        &self,
        ctx: &Arc<ExecutionContext>,
        resolution: &ShardResolution,
        deadline: Option<Instant>,
    ) -> Vec<PerShardResult> {
        let mut results = Vec::with_capacity(resolution.len());

        for (position, &shard) in resolution.shards().iter().enumerate() {
            info!(
                target: "shard_query::dispatch",
                shard_id = %shard,
                position,
                "Dispatching query to shard sequentially"
            );

            let result = match deadline {
                Some(deadline) if Instant::now() >= deadline => {
                    PerShardResult::timed_out(shard, position)
                }
                Some(deadline) => {
                    match timeout_at(deadline, ShardExecutor::execute(ctx, shard, position)).await {
                        Ok(result) => result,
                        Err(_) => {
                            warn!(target: "shard_query::dispatch", shard_id = %shard, "Shard hit the execution deadline");
                            PerShardResult::timed_out(shard, position)
                        }
                    }
                }
                None => ShardExecutor::execute(ctx, shard, position).await,
            };
            results.push(result);
        }

        results
    }
}
