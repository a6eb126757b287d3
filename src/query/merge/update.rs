use crate::engine::errors::ShardedQueryError;
use crate::engine::types::ShardId;

/// Total affected rows across shards.
#[derive(Default)]
pub struct UpdateCountMerger;

impl UpdateCountMerger {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(&self, counts: Vec<(ShardId, u64)>) -> Result<u64, ShardedQueryError> {
        counts.into_iter().try_fold(0u64, |total, (shard, count)| {
            total.checked_add(count).ok_or_else(|| {
                ShardedQueryError::Merge(format!("update count overflow at {shard}"))
            })
        })
    }
}
