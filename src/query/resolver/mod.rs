mod affinity;
mod all_shards;
mod builder;
mod resolution;
mod strategy;
mod traits;


pub use affinity::AffinityResolver;
pub use all_shards::AllShardsResolver;
pub use builder::ShardResolverBuilder;
pub use resolution::{ResolutionContext, ShardResolution};
pub use strategy::{HashShardAffinity, LookupShardAffinity, ShardAffinity};
pub use traits::ShardResolver;
