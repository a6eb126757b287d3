use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::engine::operation::ParamKey;
use crate::engine::types::{ScalarValue, ShardId};

/// Maps a bound shard-key value to the shards that can hold matching rows.
pub trait ShardAffinity: Send + Sync {
    /// `None` means the strategy cannot tell, so every shard stays eligible.
    fn shards_for(
        &self,
        key: &ParamKey,
        value: &ScalarValue,
        configured: &[ShardId],
    ) -> Option<Vec<ShardId>>;
}

/// Routes a value to `configured[hash(value) % configured.len()]`, the
/// same placement rule a hash-partitioned writer would use.
#[derive(Default)]
pub struct HashShardAffinity;

impl HashShardAffinity {
    pub fn new() -> Self {
        Self
    }

    pub fn shard_for(value: &ScalarValue, configured: &[ShardId]) -> Option<ShardId> {
        if configured.is_empty() {
            return None;
        }
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        let index = (hasher.finish() as usize) % configured.len();
        Some(configured[index])
    }
}

impl ShardAffinity for HashShardAffinity {
    fn shards_for(
        &self,
        _key: &ParamKey,
        value: &ScalarValue,
        configured: &[ShardId],
    ) -> Option<Vec<ShardId>> {
        Self::shard_for(value, configured).map(|shard| vec![shard])
    }
}

/// Explicit value to shards table, e.g. loaded from a directory service.
#[derive(Default)]
pub struct LookupShardAffinity {
    table: HashMap<ScalarValue, Vec<ShardId>>,
}

impl LookupShardAffinity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, value: impl Into<ScalarValue>, shards: Vec<ShardId>) -> Self {
        self.table.insert(value.into(), shards);
        self
    }
}

impl ShardAffinity for LookupShardAffinity {
    fn shards_for(
        &self,
        _key: &ParamKey,
        value: &ScalarValue,
        _configured: &[ShardId],
    ) -> Option<Vec<ShardId>> {
        self.table.get(value).cloned()
    }
}
