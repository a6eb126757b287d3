use std::fmt;

use serde::{Deserialize, Serialize};

/// Addresses a query parameter either by position or by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParamKey {
    Position(usize),
    Named(String),
}

impl ParamKey {
    pub fn position(&self) -> Option<usize> {
        match self {
            ParamKey::Position(p) => Some(*p),
            ParamKey::Named(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ParamKey::Position(_) => None,
            ParamKey::Named(n) => Some(n.as_str()),
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKey::Position(p) => write!(f, "?{p}"),
            ParamKey::Named(n) => write!(f, ":{n}"),
        }
    }
}

impl From<usize> for ParamKey {
    fn from(value: usize) -> Self {
        ParamKey::Position(value)
    }
}

impl From<&str> for ParamKey {
    fn from(value: &str) -> Self {
        ParamKey::Named(value.to_string())
    }
}

impl From<String> for ParamKey {
    fn from(value: String) -> Self {
        ParamKey::Named(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushMode {
    Manual,
    Commit,
    Auto,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    Normal,
    Ignore,
    Get,
    Put,
    Refresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockMode {
    None,
    Read,
    Upgrade,
    UpgradeNoWait,
    Write,
}

/// Field-less discriminant of [`super::Operation`], used for capability
/// checks and log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    SetBoolean,
    SetByte,
    SetShort,
    SetInteger,
    SetLong,
    SetFloat,
    SetDouble,
    SetBigInteger,
    SetCharacter,
    SetString,
    SetText,
    SetBinary,
    SetDate,
    SetTime,
    SetTimestamp,
    SetParameter,
    SetParameterList,
    SetProperties,
    SetFirstResult,
    SetMaxResults,
    SetFetchSize,
    SetFlushMode,
    SetCacheMode,
    SetCacheable,
    SetCacheRegion,
    SetComment,
    SetLockMode,
    SetReadOnly,
    SetTimeout,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::SetBoolean => "set_boolean",
            OperationKind::SetByte => "set_byte",
            OperationKind::SetShort => "set_short",
            OperationKind::SetInteger => "set_integer",
            OperationKind::SetLong => "set_long",
            OperationKind::SetFloat => "set_float",
            OperationKind::SetDouble => "set_double",
            OperationKind::SetBigInteger => "set_big_integer",
            OperationKind::SetCharacter => "set_character",
            OperationKind::SetString => "set_string",
            OperationKind::SetText => "set_text",
            OperationKind::SetBinary => "set_binary",
            OperationKind::SetDate => "set_date",
            OperationKind::SetTime => "set_time",
            OperationKind::SetTimestamp => "set_timestamp",
            OperationKind::SetParameter => "set_parameter",
            OperationKind::SetParameterList => "set_parameter_list",
            OperationKind::SetProperties => "set_properties",
            OperationKind::SetFirstResult => "set_first_result",
            OperationKind::SetMaxResults => "set_max_results",
            OperationKind::SetFetchSize => "set_fetch_size",
            OperationKind::SetFlushMode => "set_flush_mode",
            OperationKind::SetCacheMode => "set_cache_mode",
            OperationKind::SetCacheable => "set_cacheable",
            OperationKind::SetCacheRegion => "set_cache_region",
            OperationKind::SetComment => "set_comment",
            OperationKind::SetLockMode => "set_lock_mode",
            OperationKind::SetReadOnly => "set_read_only",
            OperationKind::SetTimeout => "set_timeout",
        }
    }

    pub fn is_pagination(&self) -> bool {
        matches!(
            self,
            OperationKind::SetFirstResult | OperationKind::SetMaxResults
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
