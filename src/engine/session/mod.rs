mod aggregate;
mod cache;
mod provider;
mod query;


pub use aggregate::{AggregateFunction, AggregateSpec, ScalarPartial};
pub use cache::{SessionCache, SharedSession};
pub use provider::{SessionProvider, ShardSession};
pub use query::{QueryDefinition, QueryLanguage, ShardQuery};
