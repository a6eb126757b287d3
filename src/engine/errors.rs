use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error};

use crate::engine::operation::OperationKind;
use crate::engine::types::ShardId;

/// Errors raised by a single shard's session or query handle.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShardQueryError {
    #[error("operation not supported by this query handle: {0}")]
    Unsupported(OperationKind),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("session error: {0}")]
    Session(String),

    #[error("query returned {rows} rows where at most one was expected")]
    NonUniqueResult { rows: usize },
}

/// Why one shard did not contribute to a merged result.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShardFailure {
    #[error(transparent)]
    Execution(#[from] ShardQueryError),

    #[error("did not finish before the execution deadline")]
    TimedOut,
}

impl ShardFailure {
    /// Capability gaps are configuration problems, not per-shard faults.
    pub fn unsupported_kind(&self) -> Option<OperationKind> {
        match self {
            ShardFailure::Execution(ShardQueryError::Unsupported(kind)) => Some(*kind),
            _ => None,
        }
    }
}

/// Every failed shard of one fan-out, in resolution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShardFailures {
    pub total_shards: usize,
    pub failures: Vec<(ShardId, ShardFailure)>,
}

impl ShardFailures {
    pub fn new(total_shards: usize) -> Self {
        Self {
            total_shards,
            failures: Vec::new(),
        }
    }

    pub fn push(&mut self, shard: ShardId, failure: ShardFailure) {
        self.failures.push((shard, failure));
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn shards(&self) -> Vec<ShardId> {
        self.failures.iter().map(|(shard, _)| *shard).collect()
    }

    pub fn cause(&self, shard: ShardId) -> Option<&ShardFailure> {
        self.failures
            .iter()
            .find(|(id, _)| *id == shard)
            .map(|(_, failure)| failure)
    }
}

impl fmt::Display for ShardFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} shards failed", self.failures.len(), self.total_shards)?;
        for (i, (shard, failure)) in self.failures.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{shard}: {failure}")?;
        }
        Ok(())
    }
}

/// The single error value a terminal call on a sharded query can return.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ShardedQueryError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("sharded execution failed: {0}")]
    ShardExecution(ShardFailures),

    #[error("ambiguous unique result: shards {shards:?} each returned a row")]
    AmbiguousUniqueResult { shards: Vec<ShardId> },

    #[error("execution timed out after {timeout:?}; unfinished shards: {pending:?}")]
    Timeout {
        timeout: Duration,
        pending: Vec<ShardId>,
    },

    #[error("merge error: {0}")]
    Merge(String),
}

impl ShardedQueryError {
    pub fn log_error(&self) {
        match self {
            ShardedQueryError::Configuration(e) => {
                error!(target: "shard_query::errors", "Configuration error: {}", e);
            }
            ShardedQueryError::ShardExecution(failures) => {
                error!(target: "shard_query::errors", "Sharded execution failed: {}", failures);
                debug!(target: "shard_query::errors", "Shard failure details: {:?}", failures.failures);
            }
            ShardedQueryError::AmbiguousUniqueResult { shards } => {
                error!(target: "shard_query::errors", ?shards, "Unique result found on several shards");
            }
            ShardedQueryError::Timeout { timeout, pending } => {
                error!(target: "shard_query::errors", ?timeout, ?pending, "Sharded execution timed out");
            }
            ShardedQueryError::Merge(e) => {
                error!(target: "shard_query::errors", "Merge failed: {}", e);
            }
        }
    }
}
