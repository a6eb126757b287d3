use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::aggregate::{AggregateSpec, ScalarPartial};
use crate::engine::errors::ShardQueryError;
use crate::engine::operation::{CacheMode, FlushMode, LockMode, OperationKind, ParamKey};
use crate::engine::types::{Row, ScalarValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryLanguage {
    /// Object query language understood by the wrapped session layer.
    Hql,
    /// Native SQL passed through untouched.
    Sql,
    /// `statement` names a query registered with every shard's session.
    Named,
}

/// The query text every shard receives, unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryDefinition {
    pub statement: String,
    pub language: QueryLanguage,
}

impl QueryDefinition {
    pub fn hql(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            language: QueryLanguage::Hql,
        }
    }

    pub fn sql(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            language: QueryLanguage::Sql,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            statement: name.into(),
            language: QueryLanguage::Named,
        }
    }
}

fn unsupported(kind: OperationKind) -> Result<(), ShardQueryError> {
    Err(ShardQueryError::Unsupported(kind))
}

/// A live query object bound to one shard's session.
///
/// Every configuration method defaults to [`ShardQueryError::Unsupported`];
/// implementations override the capabilities their backend offers.
#[async_trait]
pub trait ShardQuery: Send {
    fn set_boolean(&mut self, _key: &ParamKey, _value: bool) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetBoolean)
    }

    fn set_byte(&mut self, _key: &ParamKey, _value: i8) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetByte)
    }

    fn set_short(&mut self, _key: &ParamKey, _value: i16) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetShort)
    }

    fn set_integer(&mut self, _key: &ParamKey, _value: i32) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetInteger)
    }

    fn set_long(&mut self, _key: &ParamKey, _value: i64) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetLong)
    }

    fn set_float(&mut self, _key: &ParamKey, _value: f32) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetFloat)
    }

    fn set_double(&mut self, _key: &ParamKey, _value: f64) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetDouble)
    }

    fn set_big_integer(&mut self, _key: &ParamKey, _value: i128) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetBigInteger)
    }

    fn set_character(&mut self, _key: &ParamKey, _value: char) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetCharacter)
    }

    fn set_string(&mut self, _key: &ParamKey, _value: &str) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetString)
    }

    fn set_text(&mut self, _key: &ParamKey, _value: &str) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetText)
    }

    fn set_binary(&mut self, _key: &ParamKey, _value: &[u8]) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetBinary)
    }

    fn set_date(&mut self, _key: &ParamKey, _value: NaiveDate) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetDate)
    }

    fn set_time(&mut self, _key: &ParamKey, _value: NaiveTime) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetTime)
    }

    fn set_timestamp(
        &mut self,
        _key: &ParamKey,
        _value: DateTime<Utc>,
    ) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetTimestamp)
    }

    fn set_parameter(
        &mut self,
        _key: &ParamKey,
        _value: &ScalarValue,
    ) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetParameter)
    }

    fn set_parameter_list(
        &mut self,
        _name: &str,
        _values: &[ScalarValue],
    ) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetParameterList)
    }

    /// Binds each entry as a named parameter.
    fn set_properties(
        &mut self,
        properties: &IndexMap<String, ScalarValue>,
    ) -> Result<(), ShardQueryError> {
        for (name, value) in properties {
            self.set_parameter(&ParamKey::Named(name.clone()), value)?;
        }
        Ok(())
    }

    fn set_first_result(&mut self, _first: usize) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetFirstResult)
    }

    fn set_max_results(&mut self, _max: usize) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetMaxResults)
    }

    fn set_fetch_size(&mut self, _size: usize) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetFetchSize)
    }

    fn set_flush_mode(&mut self, _mode: FlushMode) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetFlushMode)
    }

    fn set_cache_mode(&mut self, _mode: CacheMode) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetCacheMode)
    }

    fn set_cacheable(&mut self, _cacheable: bool) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetCacheable)
    }

    fn set_cache_region(&mut self, _region: &str) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetCacheRegion)
    }

    fn set_comment(&mut self, _comment: &str) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetComment)
    }

    fn set_lock_mode(&mut self, _alias: &str, _mode: LockMode) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetLockMode)
    }

    fn set_read_only(&mut self, _read_only: bool) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetReadOnly)
    }

    fn set_timeout(&mut self, _timeout: Duration) -> Result<(), ShardQueryError> {
        unsupported(OperationKind::SetTimeout)
    }

    async fn list(&mut self) -> Result<Vec<Row>, ShardQueryError>;

    /// `None` when the shard holds no matching row.
    async fn unique_result(&mut self) -> Result<Option<Row>, ShardQueryError>;

    async fn scalar(&mut self, spec: &AggregateSpec) -> Result<ScalarPartial, ShardQueryError>;

    async fn execute_update(&mut self) -> Result<u64, ShardQueryError>;
}
