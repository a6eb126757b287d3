use std::time::Instant;

use tracing::{debug, warn};

use crate::engine::errors::ShardQueryError;
use crate::engine::types::ShardId;
use crate::query::context::{ExecutionContext, QueryIntent};
use crate::query::shard_result::{PerShardResult, ShardPayload};

/// Runs the logical query against one shard.
pub struct ShardExecutor;

impl ShardExecutor {
    /// Never returns an error: failures are captured in the result, tagged
    /// with the shard, so the coordinator can apply its failure policy.
    pub async fn execute(ctx: &ExecutionContext, shard: ShardId, position: usize) -> PerShardResult {
        let started = Instant::now();
        let outcome = Self::run(ctx, shard).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(payload) => {
                debug!(
                    target: "shard_query::executor",
                    shard_id = %shard,
                    intent = ctx.intent.as_str(),
                    elapsed_us = elapsed.as_micros() as u64,
                    "Shard execution finished"
                );
                PerShardResult::success(shard, position, payload).with_elapsed(elapsed)
            }
            Err(error) => {
                warn!(
                    target: "shard_query::executor",
                    shard_id = %shard,
                    intent = ctx.intent.as_str(),
                    error = %error,
                    "Shard execution failed"
                );
                PerShardResult::failure(shard, position, error).with_elapsed(elapsed)
            }
        }
    }

    async fn run(ctx: &ExecutionContext, shard: ShardId) -> Result<ShardPayload, ShardQueryError> {
        let session = ctx.sessions.session(shard).await?;
        let mut session = session.lock().await;
        let mut query = session.create_query(&ctx.definition)?;
        ctx.log.replay_for_shard(query.as_mut(), ctx.pagination)?;

        let payload = match &ctx.intent {
            QueryIntent::List => ShardPayload::Rows(query.list().await?),
            QueryIntent::Unique => ShardPayload::Unique(query.unique_result().await?),
            QueryIntent::Aggregate(spec) => ShardPayload::Scalar(query.scalar(spec).await?),
            QueryIntent::Update => ShardPayload::Updated(query.execute_update().await?),
        };
        Ok(payload)
    }
}
