use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

mod row;

pub use row::Row;


/// Opaque identifier of one physical shard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShardId(pub u32);

impl ShardId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ShardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shard-{}", self.0)
    }
}

impl From<u32> for ShardId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A single column value as returned by a shard or bound as a parameter.
#[derive(Debug, Clone)]
pub enum ScalarValue {
    Null,
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
    Utf8(String),
    Binary(Vec<u8>),
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ScalarValue::Int64(i) => Some(*i),
            ScalarValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Float64(f) => Some(*f),
            ScalarValue::Int64(i) => Some(*i as f64),
            ScalarValue::Timestamp(ts) => Some(*ts as f64),
            _ => None,
        }
    }

    /// String form without going through JSON.
    pub fn to_string_repr(&self) -> String {
        match self {
            ScalarValue::Null => String::new(),
            ScalarValue::Boolean(b) => b.to_string(),
            ScalarValue::Int64(i) => i.to_string(),
            ScalarValue::Float64(f) => f.to_string(),
            ScalarValue::Timestamp(ts) => ts.to_string(),
            ScalarValue::Utf8(s) => s.clone(),
            ScalarValue::Binary(bytes) => BASE64_STANDARD.encode(bytes),
        }
    }

    /// Total ordering used by global ORDER BY and min/max merging.
    ///
    /// Values of the same type compare natively: strings by byte order,
    /// binary bytewise, floats with `-0.0 == 0.0` and NaN above every
    /// number. Integers and floats compare numerically. Any other pair of
    /// types orders by a fixed type rank with `Null` lowest.
    pub fn compare(&self, other: &Self) -> Ordering {
        use ScalarValue::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Boolean(a), Boolean(b)) => a.cmp(b),
            (Int64(a), Int64(b)) => a.cmp(b),
            (Float64(a), Float64(b)) => compare_f64(*a, *b),
            (Int64(a), Float64(b)) => compare_i64_f64(*a, *b),
            (Float64(a), Int64(b)) => compare_i64_f64(*b, *a).reverse(),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            (Utf8(a), Utf8(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Binary(a), Binary(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            ScalarValue::Null => 0,
            ScalarValue::Boolean(_) => 1,
            ScalarValue::Int64(_) | ScalarValue::Float64(_) => 2,
            ScalarValue::Timestamp(_) => 3,
            ScalarValue::Utf8(_) => 4,
            ScalarValue::Binary(_) => 5,
        }
    }
}

/// Collapses every NaN to one value and folds `-0.0` into `0.0`. Equality,
/// hashing and ordering of floats all go through it.
fn canonical_f64(value: f64) -> f64 {
    if value.is_nan() {
        f64::NAN
    } else if value == 0.0 {
        0.0
    } else {
        value
    }
}

fn compare_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// Exact comparison without rounding the integer through `f64`.
fn compare_i64_f64(int: i64, float: f64) -> Ordering {
    if float.is_nan() {
        return Ordering::Less;
    }
    // 2^63 is exactly representable; i64 covers [-2^63, 2^63).
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    if float >= TWO_POW_63 {
        return Ordering::Less;
    }
    if float < -TWO_POW_63 {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => canonical_f64(whole - float).total_cmp(&0.0),
        ord => ord,
    }
}

impl PartialEq for ScalarValue {
    fn eq(&self, other: &Self) -> bool {
        use ScalarValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Int64(a), Int64(b)) => a == b,
            (Float64(a), Float64(b)) => {
                canonical_f64(*a).to_bits() == canonical_f64(*b).to_bits()
            }
            (Timestamp(a), Timestamp(b)) => a == b,
            (Utf8(a), Utf8(b)) => a == b,
            (Binary(a), Binary(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ScalarValue {}

impl Hash for ScalarValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ScalarValue::Null => {}
            ScalarValue::Boolean(b) => b.hash(state),
            ScalarValue::Int64(i) => i.hash(state),
            ScalarValue::Float64(f) => canonical_f64(*f).to_bits().hash(state),
            ScalarValue::Timestamp(ts) => ts.hash(state),
            ScalarValue::Utf8(s) => s.hash(state),
            ScalarValue::Binary(bytes) => bytes.hash(state),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => f.write_str("NULL"),
            other => f.write_str(&other.to_string_repr()),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Boolean(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int64(value as i64)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int64(value)
    }
}

impl From<u32> for ScalarValue {
    fn from(value: u32) -> Self {
        ScalarValue::Int64(value as i64)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float64(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Utf8(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Utf8(value)
    }
}

impl From<Vec<u8>> for ScalarValue {
    fn from(value: Vec<u8>) -> Self {
        ScalarValue::Binary(value)
    }
}

impl Serialize for ScalarValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ScalarValue::Null => serializer.serialize_unit(),
            ScalarValue::Boolean(b) => serializer.serialize_bool(*b),
            ScalarValue::Int64(i) => serializer.serialize_i64(*i),
            ScalarValue::Float64(f) => serializer.serialize_f64(*f),
            ScalarValue::Timestamp(ts) => serializer.serialize_i64(*ts),
            ScalarValue::Utf8(s) => serializer.serialize_str(s),
            ScalarValue::Binary(bytes) => serializer.serialize_str(&BASE64_STANDARD.encode(bytes)),
        }
    }
}

impl<'de> Deserialize<'de> for ScalarValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(from_json(JsonValue::deserialize(deserializer)?))
    }
}

/// Binary values serialize as base64 text, so they read back as `Utf8`.
fn from_json(value: JsonValue) -> ScalarValue {
    match value {
        JsonValue::Null => ScalarValue::Null,
        JsonValue::Bool(b) => ScalarValue::Boolean(b),
        JsonValue::Number(num) => match num.as_i64() {
            Some(i) => ScalarValue::Int64(i),
            None => num
                .as_f64()
                .map(ScalarValue::Float64)
                .unwrap_or_else(|| ScalarValue::Utf8(num.to_string())),
        },
        JsonValue::String(s) => ScalarValue::Utf8(s),
        other @ (JsonValue::Array(_) | JsonValue::Object(_)) => ScalarValue::Utf8(other.to_string()),
    }
}

/// Column name to value map, in column order.
pub type Columns = IndexMap<String, ScalarValue>;
