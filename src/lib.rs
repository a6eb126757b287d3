pub mod engine;
pub mod logging;
pub mod query;
pub mod shared;

pub use engine::errors::{ShardFailure, ShardQueryError, ShardedQueryError};
pub use engine::types::{Row, ScalarValue, ShardId};
pub use query::{ShardedOutput, ShardedQuery, ShardedSession};

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
pub mod test_helpers;
