use super::affinity::AffinityResolver;
use super::all_shards::AllShardsResolver;
use super::resolution::ResolutionContext;
use super::traits::ShardResolver;

/// Picks the resolver for an execution.
pub struct ShardResolverBuilder<'a, 'b> {
    ctx: &'a ResolutionContext<'b>,
}

impl<'a, 'b> ShardResolverBuilder<'a, 'b> {
    pub fn new(ctx: &'a ResolutionContext<'b>) -> Self {
        Self { ctx }
    }

    pub fn build(self) -> Box<dyn ShardResolver> {
        if self.ctx.has_hints() {
            Box::new(AffinityResolver::new())
        } else {
            Box::new(AllShardsResolver::new())
        }
    }
}
