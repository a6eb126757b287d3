use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::sync::mpsc::channel;
use tokio::time::{Instant, timeout_at};
use tracing::{error, info, warn};

use super::executor::ShardExecutor;
use super::traits::ShardDispatch;
use crate::engine::errors::ShardQueryError;
use crate::query::context::ExecutionContext;
use crate::query::resolver::ShardResolution;
use crate::query::shard_result::PerShardResult;

/// One task per shard, at most `max_concurrency` running at once.
///
/// Results come back over a channel in completion order and are slotted by
/// resolution position, so merge order never depends on timing.
pub struct ParallelShardDispatcher {
    max_concurrency: usize,
}

impl ParallelShardDispatcher {
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
}

#[async_trait]
impl ShardDispatch for ParallelShardDispatcher {
    async fn dispatch(
        &self,
        ctx: &Arc<ExecutionContext>,
        resolution: &ShardResolution,
        deadline: Option<Instant>,
    ) -> Vec<PerShardResult> {
        let shards = resolution.shards();
        let (tx, mut rx) = channel(shards.len().max(1));
        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let mut handles = Vec::with_capacity(shards.len());

        for (position, &shard) in shards.iter().enumerate() {
            let tx = tx.clone();
            let ctx = Arc::clone(ctx);
            let permits = Arc::clone(&permits);
            info!(
                target: "shard_query::dispatch",
                shard_id = %shard,
                position,
                "Dispatching query to shard"
            );

            handles.push(tokio::spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                let result = ShardExecutor::execute(&ctx, shard, position).await;
                let _ = tx.send(result).await;
            }));
        }

        drop(tx);

        let mut slots: Vec<Option<PerShardResult>> = (0..shards.len()).map(|_| None).collect();
        let mut deadline_hit = false;

        loop {
            let received = match deadline {
                Some(deadline) => match timeout_at(deadline, rx.recv()).await {
                    Ok(received) => received,
                    Err(_) => {
                        deadline_hit = true;
                        break;
                    }
                },
                None => rx.recv().await,
            };
            let Some(result) = received else {
                break;
            };
            let position = result.position;
            slots[position] = Some(result);
        }

        // Finished tasks ignore the abort; anything still running is cancelled.
        for handle in &handles {
            handle.abort();
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(position, slot)| match slot {
                Some(result) => result,
                None if deadline_hit => {
                    warn!(target: "shard_query::dispatch", shard_id = %shards[position], "Shard hit the execution deadline");
                    PerShardResult::timed_out(shards[position], position)
                }
                None => {
                    error!(target: "shard_query::dispatch", shard_id = %shards[position], "Shard task ended without a result");
                    PerShardResult::failure(
                        shards[position],
                        position,
                        ShardQueryError::Backend("shard task ended without a result".to_string()),
                    )
                }
            })
            .collect()
    }
}
