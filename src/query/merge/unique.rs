use crate::engine::errors::ShardedQueryError;
use crate::engine::types::{Row, ShardId};

/// At most one shard may hold the unique row.
#[derive(Default)]
pub struct UniqueMerger;

impl UniqueMerger {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(&self, shard_rows: Vec<(ShardId, Option<Row>)>) -> Result<Option<Row>, ShardedQueryError> {
        let mut found: Vec<(ShardId, Row)> = shard_rows
            .into_iter()
            .filter_map(|(shard, row)| row.map(|row| (shard, row)))
            .collect();

        if found.len() > 1 {
            return Err(ShardedQueryError::AmbiguousUniqueResult {
                shards: found.iter().map(|(shard, _)| *shard).collect(),
            });
        }

        Ok(found.pop().map(|(_, row)| row))
    }
}
