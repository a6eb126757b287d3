use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::types::ScalarValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregateFunction::Count => "count",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Avg => "avg",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
        };
        f.write_str(name)
    }
}

/// A scalar aggregate over the query's matching rows.
///
/// `column` is `None` only for `count(*)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateSpec {
    pub function: AggregateFunction,
    pub column: Option<String>,
}

impl AggregateSpec {
    pub fn count() -> Self {
        Self {
            function: AggregateFunction::Count,
            column: None,
        }
    }

    pub fn count_column(column: impl Into<String>) -> Self {
        Self::on(AggregateFunction::Count, column)
    }

    pub fn sum(column: impl Into<String>) -> Self {
        Self::on(AggregateFunction::Sum, column)
    }

    pub fn avg(column: impl Into<String>) -> Self {
        Self::on(AggregateFunction::Avg, column)
    }

    pub fn min(column: impl Into<String>) -> Self {
        Self::on(AggregateFunction::Min, column)
    }

    pub fn max(column: impl Into<String>) -> Self {
        Self::on(AggregateFunction::Max, column)
    }

    fn on(function: AggregateFunction, column: impl Into<String>) -> Self {
        Self {
            function,
            column: Some(column.into()),
        }
    }
}

impl fmt::Display for AggregateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(f, "{}({})", self.function, column),
            None => write!(f, "{}(*)", self.function),
        }
    }
}

/// One shard's mergeable contribution to a scalar aggregate.
///
/// Averages travel as `(sum, count)` so the merged average is weighted by
/// each shard's row count.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarPartial {
    Count(u64),
    Sum(ScalarValue),
    Avg { sum: f64, count: u64 },
    Min(ScalarValue),
    Max(ScalarValue),
}

impl ScalarPartial {
    pub fn function(&self) -> AggregateFunction {
        match self {
            ScalarPartial::Count(_) => AggregateFunction::Count,
            ScalarPartial::Sum(_) => AggregateFunction::Sum,
            ScalarPartial::Avg { .. } => AggregateFunction::Avg,
            ScalarPartial::Min(_) => AggregateFunction::Min,
            ScalarPartial::Max(_) => AggregateFunction::Max,
        }
    }
}
