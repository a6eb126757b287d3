use super::resolution::{ResolutionContext, ShardResolution};
use crate::engine::errors::ShardedQueryError;

/// Decides which shards take part in one logical execution.
pub trait ShardResolver: Send + Sync {
    fn resolve(&self, ctx: &ResolutionContext<'_>) -> Result<ShardResolution, ShardedQueryError>;
}
