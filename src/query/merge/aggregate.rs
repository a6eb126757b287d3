use std::cmp::Ordering;

use tracing::debug;

use crate::engine::errors::ShardedQueryError;
use crate::engine::session::{AggregateFunction, AggregateSpec, ScalarPartial};
use crate::engine::types::{ScalarValue, ShardId};

/// Combines per-shard aggregate partials into the global scalar.
pub struct AggregateMerger {
    spec: AggregateSpec,
}

#[derive(Debug, Clone, Copy)]
enum SumAcc {
    Empty,
    Int(i64),
    Float(f64),
}

impl AggregateMerger {
    pub fn new(spec: AggregateSpec) -> Self {
        Self { spec }
    }

    pub fn merge(&self, partials: Vec<(ShardId, ScalarPartial)>) -> Result<ScalarValue, ShardedQueryError> {
        for (shard, partial) in &partials {
            if partial.function() != self.spec.function {
                return Err(ShardedQueryError::Merge(format!(
                    "{shard} returned a {} partial for {}",
                    partial.function(),
                    self.spec
                )));
            }
        }

        let merged = match self.spec.function {
            AggregateFunction::Count => Self::merge_count(&partials)?,
            AggregateFunction::Sum => Self::merge_sum(&partials)?,
            AggregateFunction::Avg => Self::merge_avg(&partials)?,
            AggregateFunction::Min => Self::merge_extreme(&partials, Ordering::Less),
            AggregateFunction::Max => Self::merge_extreme(&partials, Ordering::Greater),
        };

        debug!(
            target: "shard_query::merge",
            aggregate = %self.spec,
            shards = partials.len(),
            result = %merged,
            "Merged aggregate"
        );
        Ok(merged)
    }

    fn merge_count(partials: &[(ShardId, ScalarPartial)]) -> Result<ScalarValue, ShardedQueryError> {
        let mut total: u64 = 0;
        for (shard, partial) in partials {
            if let ScalarPartial::Count(count) = partial {
                total = total.checked_add(*count).ok_or_else(|| {
                    ShardedQueryError::Merge(format!("count overflow at {shard}"))
                })?;
            }
        }
        i64::try_from(total)
            .map(ScalarValue::Int64)
            .map_err(|_| ShardedQueryError::Merge(format!("count {total} exceeds i64")))
    }

    fn merge_sum(partials: &[(ShardId, ScalarPartial)]) -> Result<ScalarValue, ShardedQueryError> {
        let mut acc = SumAcc::Empty;
        for (shard, partial) in partials {
            let ScalarPartial::Sum(value) = partial else {
                continue;
            };
            acc = match (acc, value) {
                (acc, ScalarValue::Null) => acc,
                (SumAcc::Empty, ScalarValue::Int64(v)) => SumAcc::Int(*v),
                (SumAcc::Int(total), ScalarValue::Int64(v)) => {
                    SumAcc::Int(total.checked_add(*v).ok_or_else(|| {
                        ShardedQueryError::Merge(format!("sum overflow at {shard}"))
                    })?)
                }
                (SumAcc::Float(total), ScalarValue::Int64(v)) => SumAcc::Float(total + *v as f64),
                (acc, other) => {
                    let v = other.as_f64().ok_or_else(|| {
                        ShardedQueryError::Merge(format!(
                            "{shard} returned non-numeric sum {other}"
                        ))
                    })?;
                    match acc {
                        SumAcc::Empty => SumAcc::Float(v),
                        SumAcc::Int(total) => SumAcc::Float(total as f64 + v),
                        SumAcc::Float(total) => SumAcc::Float(total + v),
                    }
                }
            };
        }

        Ok(match acc {
            SumAcc::Empty => ScalarValue::Null,
            SumAcc::Int(total) => ScalarValue::Int64(total),
            SumAcc::Float(total) => ScalarValue::Float64(total),
        })
    }

    fn merge_avg(partials: &[(ShardId, ScalarPartial)]) -> Result<ScalarValue, ShardedQueryError> {
        let mut sum = 0.0f64;
        let mut count: u64 = 0;
        for (shard, partial) in partials {
            if let ScalarPartial::Avg { sum: s, count: c } = partial {
                sum += *s;
                count = count.checked_add(*c).ok_or_else(|| {
                    ShardedQueryError::Merge(format!("avg count overflow at {shard}"))
                })?;
            }
        }

        if count == 0 {
            Ok(ScalarValue::Null)
        } else {
            Ok(ScalarValue::Float64(sum / count as f64))
        }
    }

    fn merge_extreme(partials: &[(ShardId, ScalarPartial)], keep: Ordering) -> ScalarValue {
        partials
            .iter()
            .filter_map(|(_, partial)| match partial {
                ScalarPartial::Min(v) | ScalarPartial::Max(v) if !v.is_null() => Some(v),
                _ => None,
            })
            .fold(None::<&ScalarValue>, |best, candidate| match best {
                Some(current) if candidate.compare(current) != keep => Some(current),
                _ => Some(candidate),
            })
            .cloned()
            .unwrap_or(ScalarValue::Null)
    }
}
