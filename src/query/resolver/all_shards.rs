use super::resolution::{ResolutionContext, ShardResolution};
use super::traits::ShardResolver;
use crate::engine::errors::ShardedQueryError;

/// Queries every configured shard. Always correct.
#[derive(Default)]
pub struct AllShardsResolver;

impl AllShardsResolver {
    pub fn new() -> Self {
        Self
    }
}

impl ShardResolver for AllShardsResolver {
    fn resolve(&self, ctx: &ResolutionContext<'_>) -> Result<ShardResolution, ShardedQueryError> {
        if ctx.configured.is_empty() {
            return Err(ShardedQueryError::Configuration(
                "no shards configured".to_string(),
            ));
        }
        Ok(ShardResolution::all(ctx.configured.to_vec()))
    }
}
