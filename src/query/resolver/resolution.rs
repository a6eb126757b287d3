use std::sync::Arc;

use super::strategy::ShardAffinity;
use crate::engine::operation::{OperationLog, ParamKey};
use crate::engine::types::ShardId;

/// Inputs the resolver sees for one execution.
pub struct ResolutionContext<'a> {
    /// Every configured shard, in configuration order.
    pub configured: &'a [ShardId],
    pub log: &'a OperationLog,
    /// Bound parameters the caller marked as shard keys.
    pub shard_keys: &'a [ParamKey],
    /// Explicit restriction set by the caller.
    pub restricted: Option<&'a [ShardId]>,
    pub affinity: Option<&'a Arc<dyn ShardAffinity>>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(configured: &'a [ShardId], log: &'a OperationLog) -> Self {
        Self {
            configured,
            log,
            shard_keys: &[],
            restricted: None,
            affinity: None,
        }
    }

    pub fn with_shard_keys(mut self, shard_keys: &'a [ParamKey]) -> Self {
        self.shard_keys = shard_keys;
        self
    }

    pub fn with_restriction(mut self, restricted: Option<&'a [ShardId]>) -> Self {
        self.restricted = restricted;
        self
    }

    pub fn with_affinity(mut self, affinity: Option<&'a Arc<dyn ShardAffinity>>) -> Self {
        self.affinity = affinity;
        self
    }

    pub fn has_hints(&self) -> bool {
        self.restricted.is_some() || (!self.shard_keys.is_empty() && self.affinity.is_some())
    }
}

/// Ordered shards chosen by a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardResolution {
    shards: Vec<ShardId>,
    narrowed: bool,
}

impl ShardResolution {
    pub fn all(shards: Vec<ShardId>) -> Self {
        Self {
            shards,
            narrowed: false,
        }
    }

    pub fn narrowed(shards: Vec<ShardId>) -> Self {
        Self {
            shards,
            narrowed: true,
        }
    }

    pub fn shards(&self) -> &[ShardId] {
        &self.shards
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    pub fn is_narrowed(&self) -> bool {
        self.narrowed
    }
}
