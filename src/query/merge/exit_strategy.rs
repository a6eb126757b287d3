use super::aggregate::AggregateMerger;
use super::exit_operations::ExitOperations;
use super::list::ListMerger;
use super::unique::UniqueMerger;
use super::update::UpdateCountMerger;
use crate::engine::errors::ShardedQueryError;
use crate::engine::operation::PaginationPolicy;
use crate::engine::types::{Row, ScalarValue, ShardId};
use crate::query::context::QueryIntent;
use crate::query::shard_result::ShardPayload;

/// The logical result of one terminal call.
#[derive(Debug, Clone, PartialEq)]
pub enum MergedResult {
    Rows(Vec<Row>),
    Unique(Option<Row>),
    Scalar(ScalarValue),
    Updated(u64),
}

impl MergedResult {
    pub fn into_rows(self) -> Result<Vec<Row>, ShardedQueryError> {
        match self {
            MergedResult::Rows(rows) => Ok(rows),
            other => Err(shape_error("rows", &other)),
        }
    }

    pub fn into_unique(self) -> Result<Option<Row>, ShardedQueryError> {
        match self {
            MergedResult::Unique(row) => Ok(row),
            other => Err(shape_error("unique row", &other)),
        }
    }

    pub fn into_scalar(self) -> Result<ScalarValue, ShardedQueryError> {
        match self {
            MergedResult::Scalar(value) => Ok(value),
            other => Err(shape_error("scalar", &other)),
        }
    }

    pub fn into_update_count(self) -> Result<u64, ShardedQueryError> {
        match self {
            MergedResult::Updated(count) => Ok(count),
            other => Err(shape_error("update count", &other)),
        }
    }
}

fn shape_error(expected: &str, got: &MergedResult) -> ShardedQueryError {
    ShardedQueryError::Merge(format!("expected {expected}, merged {got:?}"))
}

/// Merge policy selected by the terminal call kind.
pub enum ExitStrategy {
    List(ListMerger),
    Unique(UniqueMerger),
    Aggregate(AggregateMerger),
    Update(UpdateCountMerger),
}

impl ExitStrategy {
    pub fn for_intent(intent: &QueryIntent, ops: &ExitOperations) -> Self {
        match intent {
            QueryIntent::List => ExitStrategy::List(ListMerger::new(ops.clone())),
            QueryIntent::Unique => ExitStrategy::Unique(UniqueMerger::new()),
            QueryIntent::Aggregate(spec) => {
                ExitStrategy::Aggregate(AggregateMerger::new(spec.clone()))
            }
            QueryIntent::Update => ExitStrategy::Update(UpdateCountMerger::new()),
        }
    }

    /// How pagination records are replayed onto each shard for this merge.
    pub fn pagination_policy(
        intent: &QueryIntent,
        ops: &ExitOperations,
        push_down_enabled: bool,
    ) -> PaginationPolicy {
        if *intent == QueryIntent::List && push_down_enabled && ops.push_down_is_safe() {
            PaginationPolicy::PushDown {
                first_result: ops.first_result.unwrap_or(0),
            }
        } else {
            PaginationPolicy::Strip
        }
    }

    /// Merges payloads given in resolution order.
    pub fn merge(&self, payloads: Vec<(ShardId, ShardPayload)>) -> Result<MergedResult, ShardedQueryError> {
        match self {
            ExitStrategy::List(merger) => {
                let rows = collect(payloads, |payload| match payload {
                    ShardPayload::Rows(rows) => Some(rows),
                    _ => None,
                })?;
                Ok(MergedResult::Rows(merger.merge(rows)))
            }
            ExitStrategy::Unique(merger) => {
                let rows = collect(payloads, |payload| match payload {
                    ShardPayload::Unique(row) => Some(row),
                    _ => None,
                })?;
                Ok(MergedResult::Unique(merger.merge(rows)?))
            }
            ExitStrategy::Aggregate(merger) => {
                let partials = collect(payloads, |payload| match payload {
                    ShardPayload::Scalar(partial) => Some(partial),
                    _ => None,
                })?;
                Ok(MergedResult::Scalar(merger.merge(partials)?))
            }
            ExitStrategy::Update(merger) => {
                let counts = collect(payloads, |payload| match payload {
                    ShardPayload::Updated(count) => Some(count),
                    _ => None,
                })?;
                Ok(MergedResult::Updated(merger.merge(counts)?))
            }
        }
    }
}

fn collect<T>(
    payloads: Vec<(ShardId, ShardPayload)>,
    extract: impl Fn(ShardPayload) -> Option<T>,
) -> Result<Vec<(ShardId, T)>, ShardedQueryError> {
    payloads
        .into_iter()
        .map(|(shard, payload)| {
            extract(payload)
                .map(|value| (shard, value))
                .ok_or_else(|| {
                    ShardedQueryError::Merge(format!("{shard} returned a mismatched payload"))
                })
        })
        .collect()
}
