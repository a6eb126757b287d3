use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderSpec {
    pub column: String,
    pub ascending: bool,
}

impl OrderSpec {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }
}

/// How rows that represent the same logical entity are collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Distinct {
    /// Rows equal in every column.
    Row,
    /// Rows sharing the value of an identity column.
    By(String),
}

/// Merge-level operations applied to the combined result, never to a
/// single shard's rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExitOperations {
    pub first_result: Option<usize>,
    pub max_results: Option<usize>,
    pub orders: Vec<OrderSpec>,
    pub distinct: Option<Distinct>,
}

impl ExitOperations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_first_result(mut self, first: usize) -> Self {
        self.first_result = Some(first);
        self
    }

    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = Some(max);
        self
    }

    pub fn with_order(mut self, order: OrderSpec) -> Self {
        self.orders.push(order);
        self
    }

    pub fn with_distinct(mut self, distinct: Distinct) -> Self {
        self.distinct = Some(distinct);
        self
    }

    /// Per-shard `first + max` limits are only sound when every shard's
    /// leading rows are also the merged result's candidates: no global
    /// sort and no dedupe.
    pub fn push_down_is_safe(&self) -> bool {
        self.max_results.is_some() && self.orders.is_empty() && self.distinct.is_none()
    }
}
