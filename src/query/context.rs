use std::sync::Arc;

use crate::engine::operation::{OperationLog, PaginationPolicy};
use crate::engine::session::{AggregateSpec, QueryDefinition, SessionCache, SessionProvider};

/// The terminal call a logical execution was started by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryIntent {
    List,
    Unique,
    Aggregate(AggregateSpec),
    Update,
}

impl QueryIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryIntent::List => "list",
            QueryIntent::Unique => "unique_result",
            QueryIntent::Aggregate(_) => "aggregate",
            QueryIntent::Update => "execute_update",
        }
    }
}

/// Everything a per-shard execution needs, shared read-only across the
/// fan-out. The operation log is a snapshot taken when the terminal call
/// was made and is never mutated afterwards.
pub struct ExecutionContext {
    pub definition: QueryDefinition,
    pub log: OperationLog,
    pub intent: QueryIntent,
    pub pagination: PaginationPolicy,
    pub sessions: SessionCache,
}

impl ExecutionContext {
    pub fn new(
        definition: QueryDefinition,
        log: OperationLog,
        intent: QueryIntent,
        provider: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            definition,
            log,
            intent,
            pagination: PaginationPolicy::Strip,
            sessions: SessionCache::new(provider),
        }
    }

    pub fn with_pagination(mut self, pagination: PaginationPolicy) -> Self {
        self.pagination = pagination;
        self
    }
}
