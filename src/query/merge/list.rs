use std::collections::HashSet;

use tracing::debug;

use super::exit_operations::{Distinct, ExitOperations};
use super::row_comparator::RowComparator;
use crate::engine::types::{Row, ScalarValue, ShardId};

/// Concatenates per-shard rows, then applies distinct, order, first-result
/// and max-results to the merged sequence, in that order.
pub struct ListMerger {
    ops: ExitOperations,
}

impl ListMerger {
    pub fn new(ops: ExitOperations) -> Self {
        Self { ops }
    }

    pub fn merge(&self, shard_rows: Vec<(ShardId, Vec<Row>)>) -> Vec<Row> {
        let mut rows: Vec<Row> = shard_rows.into_iter().flat_map(|(_, rows)| rows).collect();
        let concatenated = rows.len();

        if let Some(distinct) = &self.ops.distinct {
            rows = Self::dedupe(rows, distinct);
        }

        if !self.ops.orders.is_empty() {
            // Stable, so ties keep resolution order.
            rows.sort_by(|a, b| RowComparator::compare(a, b, &self.ops.orders));
        }

        let rows = Self::paginate(rows, self.ops.first_result, self.ops.max_results);

        debug!(
            target: "shard_query::merge",
            concatenated,
            returned = rows.len(),
            "Merged list results"
        );
        rows
    }

    fn dedupe(rows: Vec<Row>, distinct: &Distinct) -> Vec<Row> {
        let mut seen: HashSet<Vec<ScalarValue>> = HashSet::with_capacity(rows.len());
        rows.into_iter()
            .filter(|row| {
                let identity = match distinct {
                    Distinct::By(column) => vec![row.get(column).clone()],
                    Distinct::Row => row
                        .columns()
                        .map(|column| ScalarValue::Utf8(column.to_string()))
                        .chain(row.values().cloned())
                        .collect(),
                };
                seen.insert(identity)
            })
            .collect()
    }

    pub fn paginate(rows: Vec<Row>, first: Option<usize>, max: Option<usize>) -> Vec<Row> {
        let mut result = rows;

        if let Some(first) = first {
            if first >= result.len() {
                result.clear();
            } else {
                result.drain(0..first);
            }
        }

        if let Some(max) = max {
            result.truncate(max);
        }

        result
    }
}
