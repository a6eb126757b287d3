use tracing::trace;

use super::kinds::{OperationKind, ParamKey};
use super::record::Operation;
use crate::engine::errors::ShardQueryError;
use crate::engine::session::ShardQuery;
use crate::engine::types::ScalarValue;

/// How first-result / max-results records reach a per-shard handle.
///
/// Global pagination is applied after merging, so the first-result offset
/// is never forwarded. Max-results is forwarded as `first + max` only when
/// the merge stage proved the push-down is safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationPolicy {
    Strip,
    PushDown { first_result: usize },
}

/// Insertion-ordered, append-only list of recorded configuration calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationLog {
    operations: Vec<Operation>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    pub fn append(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    pub fn kinds(&self) -> impl Iterator<Item = OperationKind> + '_ {
        self.operations.iter().map(Operation::kind)
    }

    /// Applies every record, in insertion order, onto `query`.
    pub fn replay(&self, query: &mut dyn ShardQuery) -> Result<(), ShardQueryError> {
        for operation in &self.operations {
            operation.apply(query)?;
        }
        Ok(())
    }

    /// Replays onto a per-shard handle, rewriting pagination per `policy`.
    pub fn replay_for_shard(
        &self,
        query: &mut dyn ShardQuery,
        policy: PaginationPolicy,
    ) -> Result<(), ShardQueryError> {
        for operation in &self.operations {
            match (operation, policy) {
                (Operation::SetFirstResult(_), _) => {
                    trace!(target: "shard_query::operation", "Skipping first-result on shard replay");
                }
                (Operation::SetMaxResults(_), PaginationPolicy::Strip) => {
                    trace!(target: "shard_query::operation", "Skipping max-results on shard replay");
                }
                (Operation::SetMaxResults(max), PaginationPolicy::PushDown { first_result }) => {
                    query.set_max_results(first_result.saturating_add(*max))?;
                }
                (other, _) => other.apply(query)?,
            }
        }
        Ok(())
    }

    /// Last value bound to `key` by a single-value bind, if any.
    pub fn last_bound(&self, key: &ParamKey) -> Option<ScalarValue> {
        for operation in self.operations.iter().rev() {
            if let Operation::SetProperties { properties } = operation {
                if let Some(value) = key.name().and_then(|name| properties.get(name)) {
                    return Some(value.clone());
                }
                continue;
            }
            if let Some((bound_key, value)) = operation.bound_value() {
                if bound_key == key {
                    return Some(value);
                }
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a OperationLog {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}
