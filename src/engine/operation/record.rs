use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use indexmap::IndexMap;

use super::kinds::{CacheMode, FlushMode, LockMode, OperationKind, ParamKey};
use crate::engine::errors::ShardQueryError;
use crate::engine::session::ShardQuery;
use crate::engine::types::ScalarValue;

/// One recorded configuration call on a logical query.
///
/// Records are immutable once created and replay onto any per-shard handle
/// through [`Operation::apply`], which issues exactly the matching call.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    SetBoolean { key: ParamKey, value: bool },
    SetByte { key: ParamKey, value: i8 },
    SetShort { key: ParamKey, value: i16 },
    SetInteger { key: ParamKey, value: i32 },
    SetLong { key: ParamKey, value: i64 },
    SetFloat { key: ParamKey, value: f32 },
    SetDouble { key: ParamKey, value: f64 },
    SetBigInteger { key: ParamKey, value: i128 },
    SetCharacter { key: ParamKey, value: char },
    SetString { key: ParamKey, value: String },
    SetText { key: ParamKey, value: String },
    SetBinary { key: ParamKey, value: Vec<u8> },
    SetDate { key: ParamKey, value: NaiveDate },
    SetTime { key: ParamKey, value: NaiveTime },
    SetTimestamp { key: ParamKey, value: DateTime<Utc> },
    SetParameter { key: ParamKey, value: ScalarValue },
    SetParameterList { name: String, values: Vec<ScalarValue> },
    SetProperties { properties: IndexMap<String, ScalarValue> },
    SetFirstResult(usize),
    SetMaxResults(usize),
    SetFetchSize(usize),
    SetFlushMode(FlushMode),
    SetCacheMode(CacheMode),
    SetCacheable(bool),
    SetCacheRegion(String),
    SetComment(String),
    SetLockMode { alias: String, mode: LockMode },
    SetReadOnly(bool),
    SetTimeout(Duration),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::SetBoolean { .. } => OperationKind::SetBoolean,
            Operation::SetByte { .. } => OperationKind::SetByte,
            Operation::SetShort { .. } => OperationKind::SetShort,
            Operation::SetInteger { .. } => OperationKind::SetInteger,
            Operation::SetLong { .. } => OperationKind::SetLong,
            Operation::SetFloat { .. } => OperationKind::SetFloat,
            Operation::SetDouble { .. } => OperationKind::SetDouble,
            Operation::SetBigInteger { .. } => OperationKind::SetBigInteger,
            Operation::SetCharacter { .. } => OperationKind::SetCharacter,
            Operation::SetString { .. } => OperationKind::SetString,
            Operation::SetText { .. } => OperationKind::SetText,
            Operation::SetBinary { .. } => OperationKind::SetBinary,
            Operation::SetDate { .. } => OperationKind::SetDate,
            Operation::SetTime { .. } => OperationKind::SetTime,
            Operation::SetTimestamp { .. } => OperationKind::SetTimestamp,
            Operation::SetParameter { .. } => OperationKind::SetParameter,
            Operation::SetParameterList { .. } => OperationKind::SetParameterList,
            Operation::SetProperties { .. } => OperationKind::SetProperties,
            Operation::SetFirstResult(_) => OperationKind::SetFirstResult,
            Operation::SetMaxResults(_) => OperationKind::SetMaxResults,
            Operation::SetFetchSize(_) => OperationKind::SetFetchSize,
            Operation::SetFlushMode(_) => OperationKind::SetFlushMode,
            Operation::SetCacheMode(_) => OperationKind::SetCacheMode,
            Operation::SetCacheable(_) => OperationKind::SetCacheable,
            Operation::SetCacheRegion(_) => OperationKind::SetCacheRegion,
            Operation::SetComment(_) => OperationKind::SetComment,
            Operation::SetLockMode { .. } => OperationKind::SetLockMode,
            Operation::SetReadOnly(_) => OperationKind::SetReadOnly,
            Operation::SetTimeout(_) => OperationKind::SetTimeout,
        }
    }

    /// Issues the recorded call on `query`.
    pub fn apply(&self, query: &mut dyn ShardQuery) -> Result<(), ShardQueryError> {
        match self {
            Operation::SetBoolean { key, value } => query.set_boolean(key, *value),
            Operation::SetByte { key, value } => query.set_byte(key, *value),
            Operation::SetShort { key, value } => query.set_short(key, *value),
            Operation::SetInteger { key, value } => query.set_integer(key, *value),
            Operation::SetLong { key, value } => query.set_long(key, *value),
            Operation::SetFloat { key, value } => query.set_float(key, *value),
            Operation::SetDouble { key, value } => query.set_double(key, *value),
            Operation::SetBigInteger { key, value } => query.set_big_integer(key, *value),
            Operation::SetCharacter { key, value } => query.set_character(key, *value),
            Operation::SetString { key, value } => query.set_string(key, value),
            Operation::SetText { key, value } => query.set_text(key, value),
            Operation::SetBinary { key, value } => query.set_binary(key, value),
            Operation::SetDate { key, value } => query.set_date(key, *value),
            Operation::SetTime { key, value } => query.set_time(key, *value),
            Operation::SetTimestamp { key, value } => query.set_timestamp(key, *value),
            Operation::SetParameter { key, value } => query.set_parameter(key, value),
            Operation::SetParameterList { name, values } => {
                query.set_parameter_list(name, values)
            }
            Operation::SetProperties { properties } => query.set_properties(properties),
            Operation::SetFirstResult(first) => query.set_first_result(*first),
            Operation::SetMaxResults(max) => query.set_max_results(*max),
            Operation::SetFetchSize(size) => query.set_fetch_size(*size),
            Operation::SetFlushMode(mode) => query.set_flush_mode(*mode),
            Operation::SetCacheMode(mode) => query.set_cache_mode(*mode),
            Operation::SetCacheable(cacheable) => query.set_cacheable(*cacheable),
            Operation::SetCacheRegion(region) => query.set_cache_region(region),
            Operation::SetComment(comment) => query.set_comment(comment),
            Operation::SetLockMode { alias, mode } => query.set_lock_mode(alias, *mode),
            Operation::SetReadOnly(read_only) => query.set_read_only(*read_only),
            Operation::SetTimeout(timeout) => query.set_timeout(*timeout),
        }
    }

    /// Key and value of a single-value bind, as seen by shard affinity.
    pub fn bound_value(&self) -> Option<(&ParamKey, ScalarValue)> {
        let bound = match self {
            Operation::SetBoolean { key, value } => (key, ScalarValue::Boolean(*value)),
            Operation::SetByte { key, value } => (key, ScalarValue::Int64(*value as i64)),
            Operation::SetShort { key, value } => (key, ScalarValue::Int64(*value as i64)),
            Operation::SetInteger { key, value } => (key, ScalarValue::Int64(*value as i64)),
            Operation::SetLong { key, value } => (key, ScalarValue::Int64(*value)),
            Operation::SetFloat { key, value } => (key, ScalarValue::Float64(*value as f64)),
            Operation::SetDouble { key, value } => (key, ScalarValue::Float64(*value)),
            Operation::SetBigInteger { key, value } => match i64::try_from(*value) {
                Ok(v) => (key, ScalarValue::Int64(v)),
                Err(_) => (key, ScalarValue::Utf8(value.to_string())),
            },
            Operation::SetCharacter { key, value } => (key, ScalarValue::Utf8(value.to_string())),
            Operation::SetString { key, value } | Operation::SetText { key, value } => {
                (key, ScalarValue::Utf8(value.clone()))
            }
            Operation::SetBinary { key, value } => (key, ScalarValue::Binary(value.clone())),
            Operation::SetDate { key, value } => (key, ScalarValue::Utf8(value.to_string())),
            Operation::SetTime { key, value } => (key, ScalarValue::Utf8(value.to_string())),
            Operation::SetTimestamp { key, value } => {
                (key, ScalarValue::Timestamp(value.timestamp_millis()))
            }
            Operation::SetParameter { key, value } => (key, value.clone()),
            _ => return None,
        };
        Some(bound)
    }
}
