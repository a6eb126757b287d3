use std::time::Duration;

use tracing::warn;

use crate::engine::errors::{ShardFailure, ShardFailures, ShardedQueryError};
use crate::engine::types::ShardId;
use crate::query::shard_result::{PerShardResult, ShardPayload};
use crate::shared::config::FailurePolicy;

/// Successful shard payloads, in resolution order, plus the shards skipped
/// under the partial-results policy.
#[derive(Debug, Clone, PartialEq)]
pub struct FanOutOutcome {
    pub payloads: Vec<(ShardId, ShardPayload)>,
    pub skipped: Vec<(ShardId, ShardFailure)>,
}

impl FanOutOutcome {
    /// Applies `policy` to the collected per-shard results.
    ///
    /// Unsupported operations are configuration errors under every policy.
    /// Under `FailFast` any timeout yields `Timeout` and any other failure
    /// yields one aggregate `ShardExecution` error. Under `Partial` failed
    /// shards are skipped unless none succeeded.
    pub fn collect(
        mut results: Vec<PerShardResult>,
        policy: FailurePolicy,
        timeout: Option<Duration>,
    ) -> Result<Self, ShardedQueryError> {
        results.sort_by_key(|result| result.position);
        let total = results.len();

        let mut payloads = Vec::with_capacity(total);
        let mut failures = ShardFailures::new(total);

        for result in results {
            match result.outcome {
                Ok(payload) => payloads.push((result.shard_id, payload)),
                Err(failure) => {
                    if let Some(kind) = failure.unsupported_kind() {
                        return Err(ShardedQueryError::Configuration(format!(
                            "{} does not support {kind}",
                            result.shard_id
                        )));
                    }
                    failures.push(result.shard_id, failure);
                }
            }
        }

        if failures.is_empty() {
            return Ok(Self {
                payloads,
                skipped: Vec::new(),
            });
        }

        let pending: Vec<ShardId> = failures
            .failures
            .iter()
            .filter(|(_, failure)| *failure == ShardFailure::TimedOut)
            .map(|(shard, _)| *shard)
            .collect();

        let fail_whole_call = policy == FailurePolicy::FailFast || payloads.is_empty();
        if fail_whole_call {
            if !pending.is_empty() && (policy == FailurePolicy::FailFast || pending.len() == failures.len()) {
                return Err(ShardedQueryError::Timeout {
                    timeout: timeout.unwrap_or_default(),
                    pending,
                });
            }
            return Err(ShardedQueryError::ShardExecution(failures));
        }

        for (shard, failure) in &failures.failures {
            warn!(
                target: "shard_query::dispatch",
                shard_id = %shard,
                error = %failure,
                "Skipping failed shard under partial-results policy"
            );
        }

        Ok(Self {
            payloads,
            skipped: failures.failures,
        })
    }
}
