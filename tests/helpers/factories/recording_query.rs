use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::engine::errors::ShardQueryError;
use crate::engine::operation::{
    CacheMode, FlushMode, LockMode, Operation, OperationKind, ParamKey,
};
use crate::engine::session::{AggregateFunction, AggregateSpec, ScalarPartial, ShardQuery};
use crate::engine::types::{Row, ScalarValue, ShardId};

pub type Journal = Arc<Mutex<Vec<(ShardId, Operation)>>>;

/// Canned behaviour of one in-memory shard.
#[derive(Debug, Clone, Default)]
pub struct ShardFixture {
    pub rows: Vec<Row>,
    pub failure: Option<ShardQueryError>,
    pub delay: Option<Duration>,
    pub update_count: Option<u64>,
}

/// Query handle that journals every configuration call as the equivalent
/// [`Operation`] and answers terminal calls from a [`ShardFixture`].
///
/// Named binds whose name matches a row column filter the rows; pagination
/// is honored the way a database would.
pub struct RecordingQuery {
    shard: ShardId,
    journal: Journal,
    unsupported: HashSet<OperationKind>,
    fixture: ShardFixture,
    filters: Vec<(String, ScalarValue)>,
    first_result: Option<usize>,
    max_results: Option<usize>,
}

impl RecordingQuery {
    pub fn new() -> Self {
        Self::for_shard(
            ShardId(0),
            ShardFixture::default(),
            Arc::new(Mutex::new(Vec::new())),
            HashSet::new(),
        )
    }

    pub fn for_shard(
        shard: ShardId,
        fixture: ShardFixture,
        journal: Journal,
        unsupported: HashSet<OperationKind>,
    ) -> Self {
        Self {
            shard,
            journal,
            unsupported,
            fixture,
            filters: Vec::new(),
            first_result: None,
            max_results: None,
        }
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.fixture.rows = rows;
        self
    }

    pub fn without_support(mut self, kind: OperationKind) -> Self {
        self.unsupported.insert(kind);
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<Operation> {
        self.journal
            .lock()
            .iter()
            .filter(|(shard, _)| *shard == self.shard)
            .map(|(_, op)| op.clone())
            .collect()
    }

    fn record(&mut self, operation: Operation) -> Result<(), ShardQueryError> {
        let kind = operation.kind();
        if self.unsupported.contains(&kind) {
            return Err(ShardQueryError::Unsupported(kind));
        }

        match &operation {
            Operation::SetFirstResult(first) => self.first_result = Some(*first),
            Operation::SetMaxResults(max) => self.max_results = Some(*max),
            Operation::SetProperties { properties } => {
                for (name, value) in properties {
                    self.bind_filter(name.clone(), value.clone());
                }
            }
            other => {
                if let Some((ParamKey::Named(name), value)) = other.bound_value() {
                    self.bind_filter(name.clone(), value);
                }
            }
        }

        self.journal.lock().push((self.shard, operation));
        Ok(())
    }

    fn bind_filter(&mut self, column: String, value: ScalarValue) {
        self.filters.retain(|(existing, _)| *existing != column);
        self.filters.push((column, value));
    }

    async fn matching_rows(&self) -> Result<Vec<Row>, ShardQueryError> {
        if let Some(delay) = self.fixture.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(failure) = &self.fixture.failure {
            return Err(failure.clone());
        }

        let rows = self
            .fixture
            .rows
            .iter()
            .filter(|row| {
                self.filters
                    .iter()
                    .all(|(column, value)| !row.contains(column) || row.get(column) == value)
            })
            .skip(self.first_result.unwrap_or(0))
            .take(self.max_results.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(rows)
    }

    fn partial(spec: &AggregateSpec, rows: &[Row]) -> ScalarPartial {
        let values: Vec<&ScalarValue> = match &spec.column {
            Some(column) => rows
                .iter()
                .map(|row| row.get(column))
                .filter(|value| !value.is_null())
                .collect(),
            None => Vec::new(),
        };

        match spec.function {
            AggregateFunction::Count => ScalarPartial::Count(match spec.column {
                Some(_) => values.len() as u64,
                None => rows.len() as u64,
            }),
            AggregateFunction::Sum => {
                if values.is_empty() {
                    ScalarPartial::Sum(ScalarValue::Null)
                } else if values.iter().all(|v| matches!(v, ScalarValue::Int64(_))) {
                    ScalarPartial::Sum(ScalarValue::Int64(
                        values.iter().filter_map(|v| v.as_i64()).sum(),
                    ))
                } else {
                    ScalarPartial::Sum(ScalarValue::Float64(
                        values.iter().filter_map(|v| v.as_f64()).sum(),
                    ))
                }
            }
            AggregateFunction::Avg => ScalarPartial::Avg {
                sum: values.iter().filter_map(|v| v.as_f64()).sum(),
                count: values.len() as u64,
            },
            AggregateFunction::Min => ScalarPartial::Min(
                values
                    .iter()
                    .min_by(|a, b| a.compare(b))
                    .map(|v| (*v).clone())
                    .unwrap_or(ScalarValue::Null),
            ),
            AggregateFunction::Max => ScalarPartial::Max(
                values
                    .iter()
                    .max_by(|a, b| a.compare(b))
                    .map(|v| (*v).clone())
                    .unwrap_or(ScalarValue::Null),
            ),
        }
    }
}

#[async_trait]
impl ShardQuery for RecordingQuery {
    fn set_boolean(&mut self, key: &ParamKey, value: bool) -> Result<(), ShardQueryError> {
        self.record(Operation::SetBoolean { key: key.clone(), value })
    }

    fn set_byte(&mut self, key: &ParamKey, value: i8) -> Result<(), ShardQueryError> {
        self.record(Operation::SetByte { key: key.clone(), value })
    }

    fn set_short(&mut self, key: &ParamKey, value: i16) -> Result<(), ShardQueryError> {
        self.record(Operation::SetShort { key: key.clone(), value })
    }

    fn set_integer(&mut self, key: &ParamKey, value: i32) -> Result<(), ShardQueryError> {
        self.record(Operation::SetInteger { key: key.clone(), value })
    }

    fn set_long(&mut self, key: &ParamKey, value: i64) -> Result<(), ShardQueryError> {
        self.record(Operation::SetLong { key: key.clone(), value })
    }

    fn set_float(&mut self, key: &ParamKey, value: f32) -> Result<(), ShardQueryError> {
        self.record(Operation::SetFloat { key: key.clone(), value })
    }

    fn set_double(&mut self, key: &ParamKey, value: f64) -> Result<(), ShardQueryError> {
        self.record(Operation::SetDouble { key: key.clone(), value })
    }

    fn set_big_integer(&mut self, key: &ParamKey, value: i128) -> Result<(), ShardQueryError> {
        self.record(Operation::SetBigInteger { key: key.clone(), value })
    }

    fn set_character(&mut self, key: &ParamKey, value: char) -> Result<(), ShardQueryError> {
        self.record(Operation::SetCharacter { key: key.clone(), value })
    }

    fn set_string(&mut self, key: &ParamKey, value: &str) -> Result<(), ShardQueryError> {
        self.record(Operation::SetString {
            key: key.clone(),
            value: value.to_string(),
        })
    }

    fn set_text(&mut self, key: &ParamKey, value: &str) -> Result<(), ShardQueryError> {
        self.record(Operation::SetText {
            key: key.clone(),
            value: value.to_string(),
        })
    }

    fn set_binary(&mut self, key: &ParamKey, value: &[u8]) -> Result<(), ShardQueryError> {
        self.record(Operation::SetBinary {
            key: key.clone(),
            value: value.to_vec(),
        })
    }

    fn set_date(&mut self, key: &ParamKey, value: NaiveDate) -> Result<(), ShardQueryError> {
        self.record(Operation::SetDate { key: key.clone(), value })
    }

    fn set_time(&mut self, key: &ParamKey, value: NaiveTime) -> Result<(), ShardQueryError> {
        self.record(Operation::SetTime { key: key.clone(), value })
    }

    fn set_timestamp(
        &mut self,
        key: &ParamKey,
        value: DateTime<Utc>,
    ) -> Result<(), ShardQueryError> {
        self.record(Operation::SetTimestamp { key: key.clone(), value })
    }

    fn set_parameter(&mut self, key: &ParamKey, value: &ScalarValue) -> Result<(), ShardQueryError> {
        self.record(Operation::SetParameter {
            key: key.clone(),
            value: value.clone(),
        })
    }

    fn set_parameter_list(
        &mut self,
        name: &str,
        values: &[ScalarValue],
    ) -> Result<(), ShardQueryError> {
        self.record(Operation::SetParameterList {
            name: name.to_string(),
            values: values.to_vec(),
        })
    }

    fn set_properties(
        &mut self,
        properties: &IndexMap<String, ScalarValue>,
    ) -> Result<(), ShardQueryError> {
        self.record(Operation::SetProperties {
            properties: properties.clone(),
        })
    }

    fn set_first_result(&mut self, first: usize) -> Result<(), ShardQueryError> {
        self.record(Operation::SetFirstResult(first))
    }

    fn set_max_results(&mut self, max: usize) -> Result<(), ShardQueryError> {
        self.record(Operation::SetMaxResults(max))
    }

    fn set_fetch_size(&mut self, size: usize) -> Result<(), ShardQueryError> {
        self.record(Operation::SetFetchSize(size))
    }

    fn set_flush_mode(&mut self, mode: FlushMode) -> Result<(), ShardQueryError> {
        self.record(Operation::SetFlushMode(mode))
    }

    fn set_cache_mode(&mut self, mode: CacheMode) -> Result<(), ShardQueryError> {
        self.record(Operation::SetCacheMode(mode))
    }

    fn set_cacheable(&mut self, cacheable: bool) -> Result<(), ShardQueryError> {
        self.record(Operation::SetCacheable(cacheable))
    }

    fn set_cache_region(&mut self, region: &str) -> Result<(), ShardQueryError> {
        self.record(Operation::SetCacheRegion(region.to_string()))
    }

    fn set_comment(&mut self, comment: &str) -> Result<(), ShardQueryError> {
        self.record(Operation::SetComment(comment.to_string()))
    }

    fn set_lock_mode(&mut self, alias: &str, mode: LockMode) -> Result<(), ShardQueryError> {
        self.record(Operation::SetLockMode {
            alias: alias.to_string(),
            mode,
        })
    }

    fn set_read_only(&mut self, read_only: bool) -> Result<(), ShardQueryError> {
        self.record(Operation::SetReadOnly(read_only))
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), ShardQueryError> {
        self.record(Operation::SetTimeout(timeout))
    }

    async fn list(&mut self) -> Result<Vec<Row>, ShardQueryError> {
        self.matching_rows().await
    }

    async fn unique_result(&mut self) -> Result<Option<Row>, ShardQueryError> {
        let mut rows = self.matching_rows().await?;
        if rows.len() > 1 {
            return Err(ShardQueryError::NonUniqueResult { rows: rows.len() });
        }
        Ok(rows.pop())
    }

    async fn scalar(&mut self, spec: &AggregateSpec) -> Result<ScalarPartial, ShardQueryError> {
        let rows = self.matching_rows().await?;
        Ok(Self::partial(spec, &rows))
    }

    async fn execute_update(&mut self) -> Result<u64, ShardQueryError> {
        let rows = self.matching_rows().await?;
        Ok(self.fixture.update_count.unwrap_or(rows.len() as u64))
    }
}
