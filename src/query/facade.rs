use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use indexmap::IndexMap;
use tracing::debug;

use super::context::{ExecutionContext, QueryIntent};
use super::cursor::ScrollableResults;
use super::merge::{Distinct, ExitOperations, ExitStrategy, MergedResult, OrderSpec};
use super::orchestrator::QueryExecutionPipeline;
use super::output::ShardedOutput;
use super::resolver::ResolutionContext;
use super::session::SessionShared;
use crate::engine::errors::ShardedQueryError;
use crate::engine::operation::{
    CacheMode, FlushMode, LockMode, Operation, OperationLog, ParamKey,
};
use crate::engine::session::{AggregateSpec, QueryDefinition};
use crate::engine::types::{Row, ScalarValue, ShardId};

/// One logical query across every shard of a [`ShardedSession`].
///
/// Configuration calls are recorded, not applied. Each terminal call takes
/// a snapshot of the recorded operations, resolves the shards, replays the
/// snapshot onto a fresh handle per shard and merges the results. The same
/// query can be executed any number of times.
///
/// [`ShardedSession`]: super::session::ShardedSession
pub struct ShardedQuery {
    shared: Arc<SessionShared>,
    definition: QueryDefinition,
    log: OperationLog,
    exit_ops: ExitOperations,
    shard_keys: Vec<ParamKey>,
    restricted: Option<Vec<ShardId>>,
    execution_timeout: Option<Duration>,
}

impl ShardedQuery {
    pub(crate) fn new(shared: Arc<SessionShared>, definition: QueryDefinition) -> Self {
        Self {
            shared,
            definition,
            log: OperationLog::new(),
            exit_ops: ExitOperations::new(),
            shard_keys: Vec::new(),
            restricted: None,
            execution_timeout: None,
        }
    }

    pub fn definition(&self) -> &QueryDefinition {
        &self.definition
    }

    /// Operations recorded so far, in call order.
    pub fn log(&self) -> &OperationLog {
        &self.log
    }

    pub fn exit_operations(&self) -> &ExitOperations {
        &self.exit_ops
    }

    fn record(&mut self, operation: Operation) -> Result<&mut Self, ShardedQueryError> {
        let kind = operation.kind();
        if !self.shared.provider.supports(kind) {
            return Err(ShardedQueryError::Configuration(format!(
                "session provider does not support {kind}"
            )));
        }

        match &operation {
            Operation::SetFirstResult(first) => self.exit_ops.first_result = Some(*first),
            Operation::SetMaxResults(max) => self.exit_ops.max_results = Some(*max),
            _ => {}
        }

        debug!(target: "shard_query::facade", operation = %kind, "Recorded operation");
        self.log.append(operation);
        Ok(self)
    }

    pub fn set_boolean(
        &mut self,
        key: impl Into<ParamKey>,
        value: bool,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetBoolean { key: key.into(), value })
    }

    pub fn set_byte(
        &mut self,
        key: impl Into<ParamKey>,
        value: i8,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetByte { key: key.into(), value })
    }

    pub fn set_short(
        &mut self,
        key: impl Into<ParamKey>,
        value: i16,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetShort { key: key.into(), value })
    }

    pub fn set_integer(
        &mut self,
        key: impl Into<ParamKey>,
        value: i32,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetInteger { key: key.into(), value })
    }

    pub fn set_long(
        &mut self,
        key: impl Into<ParamKey>,
        value: i64,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetLong { key: key.into(), value })
    }

    pub fn set_float(
        &mut self,
        key: impl Into<ParamKey>,
        value: f32,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetFloat { key: key.into(), value })
    }

    pub fn set_double(
        &mut self,
        key: impl Into<ParamKey>,
        value: f64,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetDouble { key: key.into(), value })
    }

    pub fn set_big_integer(
        &mut self,
        key: impl Into<ParamKey>,
        value: i128,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetBigInteger { key: key.into(), value })
    }

    pub fn set_character(
        &mut self,
        key: impl Into<ParamKey>,
        value: char,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetCharacter { key: key.into(), value })
    }

    pub fn set_string(
        &mut self,
        key: impl Into<ParamKey>,
        value: impl Into<String>,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetString {
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn set_text(
        &mut self,
        key: impl Into<ParamKey>,
        value: impl Into<String>,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetText {
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn set_binary(
        &mut self,
        key: impl Into<ParamKey>,
        value: impl Into<Vec<u8>>,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetBinary {
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn set_date(
        &mut self,
        key: impl Into<ParamKey>,
        value: NaiveDate,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetDate { key: key.into(), value })
    }

    pub fn set_time(
        &mut self,
        key: impl Into<ParamKey>,
        value: NaiveTime,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetTime { key: key.into(), value })
    }

    pub fn set_timestamp(
        &mut self,
        key: impl Into<ParamKey>,
        value: DateTime<Utc>,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetTimestamp { key: key.into(), value })
    }

    pub fn set_parameter(
        &mut self,
        key: impl Into<ParamKey>,
        value: impl Into<ScalarValue>,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetParameter {
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn set_parameter_list(
        &mut self,
        name: impl Into<String>,
        values: Vec<ScalarValue>,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetParameterList {
            name: name.into(),
            values,
        })
    }

    pub fn set_properties(
        &mut self,
        properties: IndexMap<String, ScalarValue>,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetProperties { properties })
    }

    pub fn set_first_result(&mut self, first: usize) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetFirstResult(first))
    }

    pub fn set_max_results(&mut self, max: usize) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetMaxResults(max))
    }

    pub fn set_fetch_size(&mut self, size: usize) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetFetchSize(size))
    }

    pub fn set_flush_mode(&mut self, mode: FlushMode) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetFlushMode(mode))
    }

    pub fn set_cache_mode(&mut self, mode: CacheMode) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetCacheMode(mode))
    }

    pub fn set_cacheable(&mut self, cacheable: bool) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetCacheable(cacheable))
    }

    pub fn set_cache_region(
        &mut self,
        region: impl Into<String>,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetCacheRegion(region.into()))
    }

    pub fn set_comment(
        &mut self,
        comment: impl Into<String>,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetComment(comment.into()))
    }

    pub fn set_lock_mode(
        &mut self,
        alias: impl Into<String>,
        mode: LockMode,
    ) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetLockMode {
            alias: alias.into(),
            mode,
        })
    }

    pub fn set_read_only(&mut self, read_only: bool) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetReadOnly(read_only))
    }

    /// Per-shard statement timeout, forwarded to every handle.
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<&mut Self, ShardedQueryError> {
        self.record(Operation::SetTimeout(timeout))
    }

    /// Adds a global sort key, applied to the merged rows.
    pub fn order_by(&mut self, order: OrderSpec) -> &mut Self {
        self.exit_ops.orders.push(order);
        self
    }

    /// Collapses rows equal in every column.
    pub fn distinct(&mut self) -> &mut Self {
        self.exit_ops.distinct = Some(Distinct::Row);
        self
    }

    /// Collapses rows sharing `column`, keeping the first in shard order.
    pub fn distinct_by(&mut self, column: impl Into<String>) -> &mut Self {
        self.exit_ops.distinct = Some(Distinct::By(column.into()));
        self
    }

    /// Marks a bound parameter as a shard key for affinity-based narrowing.
    pub fn shard_key(&mut self, key: impl Into<ParamKey>) -> &mut Self {
        self.shard_keys.push(key.into());
        self
    }

    pub fn restrict_to_shards(&mut self, shards: impl IntoIterator<Item = ShardId>) -> &mut Self {
        self.restricted = Some(shards.into_iter().collect());
        self
    }

    /// Deadline for the whole fan-out, overriding the session configuration.
    pub fn set_execution_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.execution_timeout = Some(timeout);
        self
    }

    pub async fn list(&self) -> Result<ShardedOutput<Vec<Row>>, ShardedQueryError> {
        self.run(QueryIntent::List)
            .await?
            .try_map(MergedResult::into_rows)
    }

    pub async fn unique_result(&self) -> Result<ShardedOutput<Option<Row>>, ShardedQueryError> {
        self.run(QueryIntent::Unique)
            .await?
            .try_map(MergedResult::into_unique)
    }

    pub async fn iterate(
        &self,
    ) -> Result<ShardedOutput<std::vec::IntoIter<Row>>, ShardedQueryError> {
        Ok(self.list().await?.map(Vec::into_iter))
    }

    pub async fn scroll(&self) -> Result<ShardedOutput<ScrollableResults>, ShardedQueryError> {
        Ok(self.list().await?.map(ScrollableResults::new))
    }

    pub async fn aggregate(
        &self,
        spec: AggregateSpec,
    ) -> Result<ShardedOutput<ScalarValue>, ShardedQueryError> {
        self.run(QueryIntent::Aggregate(spec))
            .await?
            .try_map(MergedResult::into_scalar)
    }

    pub async fn count(&self) -> Result<ShardedOutput<ScalarValue>, ShardedQueryError> {
        self.aggregate(AggregateSpec::count()).await
    }

    pub async fn sum(
        &self,
        column: impl Into<String>,
    ) -> Result<ShardedOutput<ScalarValue>, ShardedQueryError> {
        self.aggregate(AggregateSpec::sum(column)).await
    }

    pub async fn avg(
        &self,
        column: impl Into<String>,
    ) -> Result<ShardedOutput<ScalarValue>, ShardedQueryError> {
        self.aggregate(AggregateSpec::avg(column)).await
    }

    pub async fn min(
        &self,
        column: impl Into<String>,
    ) -> Result<ShardedOutput<ScalarValue>, ShardedQueryError> {
        self.aggregate(AggregateSpec::min(column)).await
    }

    pub async fn max(
        &self,
        column: impl Into<String>,
    ) -> Result<ShardedOutput<ScalarValue>, ShardedQueryError> {
        self.aggregate(AggregateSpec::max(column)).await
    }

    pub async fn execute_update(&self) -> Result<ShardedOutput<u64>, ShardedQueryError> {
        self.run(QueryIntent::Update)
            .await?
            .try_map(MergedResult::into_update_count)
    }

    async fn run(
        &self,
        intent: QueryIntent,
    ) -> Result<ShardedOutput<MergedResult>, ShardedQueryError> {
        let config = &self.shared.config;
        let pagination =
            ExitStrategy::pagination_policy(&intent, &self.exit_ops, config.limit_push_down);
        let exit = ExitStrategy::for_intent(&intent, &self.exit_ops);

        let ctx = Arc::new(
            ExecutionContext::new(
                self.definition.clone(),
                self.log.clone(),
                intent,
                Arc::clone(&self.shared.provider),
            )
            .with_pagination(pagination),
        );

        let resolution = ResolutionContext::new(&self.shared.shard_ids, &ctx.log)
            .with_shard_keys(&self.shard_keys)
            .with_restriction(self.restricted.as_deref())
            .with_affinity(self.shared.affinity.as_ref());

        let result = QueryExecutionPipeline::new(Arc::clone(&ctx), resolution, exit, config)
            .with_timeout(self.execution_timeout)
            .execute()
            .await;

        if let Err(e) = &result {
            e.log_error();
        }
        result
    }
}
