pub mod context;
pub mod cursor;
pub mod dispatch;
pub mod facade;
pub mod merge;
pub mod orchestrator;
pub mod output;
pub mod resolver;
pub mod session;
pub mod shard_result;


pub use context::{ExecutionContext, QueryIntent};
pub use cursor::ScrollableResults;
pub use facade::ShardedQuery;
pub use merge::{Distinct, ExitOperations, MergedResult, OrderSpec};
pub use output::ShardedOutput;
pub use resolver::{HashShardAffinity, LookupShardAffinity, ShardAffinity};
pub use session::{ShardedSession, ShardedSessionBuilder};
