use crate::engine::types::{Row, ScalarValue};

pub struct RowFactory {
    row: Row,
}

impl RowFactory {
    pub fn new() -> Self {
        Self { row: Row::new() }
    }

    pub fn with(mut self, column: &str, value: impl Into<ScalarValue>) -> Self {
        self.row.insert(column, value);
        self
    }

    pub fn with_id(self, id: i64) -> Self {
        self.with("id", id)
    }

    pub fn create(self) -> Row {
        self.row
    }

    /// One row per id, each with a single `id` column.
    pub fn ids(ids: &[i64]) -> Vec<Row> {
        ids.iter()
            .map(|id| RowFactory::new().with_id(*id).create())
            .collect()
    }

    pub fn column(rows: &[Row], column: &str) -> Vec<ScalarValue> {
        rows.iter().map(|row| row.get(column).clone()).collect()
    }

    pub fn id_values(rows: &[Row]) -> Vec<i64> {
        rows.iter().filter_map(|row| row.get("id").as_i64()).collect()
    }
}
