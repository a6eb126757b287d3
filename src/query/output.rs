use crate::engine::errors::ShardFailure;
use crate::engine::types::ShardId;

/// A merged result plus the shards that were skipped to produce it.
///
/// `skipped` is only ever non-empty under the partial-results policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ShardedOutput<T> {
    pub value: T,
    pub skipped: Vec<(ShardId, ShardFailure)>,
}

impl<T> ShardedOutput<T> {
    pub fn complete(value: T) -> Self {
        Self {
            value,
            skipped: Vec::new(),
        }
    }

    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ShardedOutput<U> {
        ShardedOutput {
            value: f(self.value),
            skipped: self.skipped,
        }
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<ShardedOutput<U>, E> {
        Ok(ShardedOutput {
            value: f(self.value)?,
            skipped: self.skipped,
        })
    }
}
