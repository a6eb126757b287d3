use std::time::Duration;

use crate::engine::errors::{ShardFailure, ShardQueryError};
use crate::engine::session::ScalarPartial;
use crate::engine::types::{Row, ShardId};

/// What a shard produced for the terminal call.
#[derive(Debug, Clone, PartialEq)]
pub enum ShardPayload {
    Rows(Vec<Row>),
    Unique(Option<Row>),
    Scalar(ScalarPartial),
    Updated(u64),
}

/// One shard's contribution, tagged with its shard id and its position in
/// resolution order.
#[derive(Debug, Clone, PartialEq)]
pub struct PerShardResult {
    pub shard_id: ShardId,
    pub position: usize,
    pub elapsed: Duration,
    pub outcome: Result<ShardPayload, ShardFailure>,
}

impl PerShardResult {
    pub fn success(shard_id: ShardId, position: usize, payload: ShardPayload) -> Self {
        Self {
            shard_id,
            position,
            elapsed: Duration::ZERO,
            outcome: Ok(payload),
        }
    }

    pub fn failure(shard_id: ShardId, position: usize, error: ShardQueryError) -> Self {
        Self {
            shard_id,
            position,
            elapsed: Duration::ZERO,
            outcome: Err(ShardFailure::Execution(error)),
        }
    }

    pub fn timed_out(shard_id: ShardId, position: usize) -> Self {
        Self {
            shard_id,
            position,
            elapsed: Duration::ZERO,
            outcome: Err(ShardFailure::TimedOut),
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}
