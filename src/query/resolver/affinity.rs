use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::resolution::{ResolutionContext, ShardResolution};
use super::traits::ShardResolver;
use crate::engine::errors::ShardedQueryError;
use crate::engine::types::ShardId;

/// Narrows the shard set using caller hints. Narrowing only ever removes
/// shards that cannot hold matching rows; when hints contradict each other
/// or name unknown shards the resolver falls back to every shard.
#[derive(Default)]
pub struct AffinityResolver;

impl AffinityResolver {
    pub fn new() -> Self {
        Self
    }

    fn eligible(ctx: &ResolutionContext<'_>) -> Option<BTreeSet<ShardId>> {
        let mut eligible: Option<BTreeSet<ShardId>> = ctx
            .restricted
            .map(|restricted| restricted.iter().copied().collect());

        if let Some(affinity) = ctx.affinity {
            for key in ctx.shard_keys {
                let Some(value) = ctx.log.last_bound(key) else {
                    debug!(target: "shard_query::resolver", %key, "Shard key has no bound value");
                    continue;
                };
                let Some(shards) = affinity.shards_for(key, &value, ctx.configured) else {
                    continue;
                };
                let shards: BTreeSet<ShardId> = shards.into_iter().collect();
                eligible = Some(match eligible {
                    Some(current) => current.intersection(&shards).copied().collect(),
                    None => shards,
                });
            }
        }

        eligible
    }
}

impl ShardResolver for AffinityResolver {
    fn resolve(&self, ctx: &ResolutionContext<'_>) -> Result<ShardResolution, ShardedQueryError> {
        if ctx.configured.is_empty() {
            return Err(ShardedQueryError::Configuration(
                "no shards configured".to_string(),
            ));
        }

        let Some(eligible) = Self::eligible(ctx) else {
            return Ok(ShardResolution::all(ctx.configured.to_vec()));
        };

        let narrowed: Vec<ShardId> = ctx
            .configured
            .iter()
            .copied()
            .filter(|shard| eligible.contains(shard))
            .collect();

        if narrowed.is_empty() {
            warn!(
                target: "shard_query::resolver",
                ?eligible,
                "Shard hints matched no configured shard, querying all shards"
            );
            return Ok(ShardResolution::all(ctx.configured.to_vec()));
        }

        debug!(
            target: "shard_query::resolver",
            shards = ?narrowed,
            configured = ctx.configured.len(),
            "Narrowed shard set from hints"
        );
        Ok(ShardResolution::narrowed(narrowed))
    }
}
