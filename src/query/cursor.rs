use crate::engine::types::Row;

/// Bidirectional cursor over a merged result.
///
/// The merged rows are fully materialized, so every movement is an index
/// update. Row numbers are zero-based; the cursor starts before the first
/// row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollableResults {
    rows: Vec<Row>,
    position: Option<usize>,
}

impl ScrollableResults {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            position: None,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Advances one row. Returns `false` and parks after the last row when
    /// there is nothing further.
    pub fn next(&mut self) -> bool {
        let target = self.position.map_or(0, |p| p.saturating_add(1));
        self.move_to(target as isize)
    }

    pub fn previous(&mut self) -> bool {
        match self.position {
            Some(p) if p > 0 => self.move_to(p as isize - 1),
            _ => {
                self.position = None;
                false
            }
        }
    }

    pub fn first(&mut self) -> bool {
        self.move_to(0)
    }

    pub fn last(&mut self) -> bool {
        if self.rows.is_empty() {
            self.position = None;
            return false;
        }
        self.move_to(self.rows.len() as isize - 1)
    }

    /// Moves `offset` rows relative to the current row. An offset past
    /// either end parks the cursor there.
    pub fn scroll(&mut self, offset: isize) -> bool {
        let current = self.position.map_or(-1, |p| p as isize);
        let target = current
            .checked_add(offset)
            .unwrap_or(if offset < 0 { -1 } else { isize::MAX });
        self.move_to(target)
    }

    pub fn set_row_number(&mut self, row: usize) -> bool {
        self.move_to(isize::try_from(row).unwrap_or(isize::MAX))
    }

    /// Current row, if the cursor is on one.
    pub fn get(&self) -> Option<&Row> {
        self.position.and_then(|p| self.rows.get(p))
    }

    pub fn row_number(&self) -> Option<usize> {
        self.position.filter(|p| *p < self.rows.len())
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    fn move_to(&mut self, target: isize) -> bool {
        if target < 0 {
            self.position = None;
            return false;
        }
        let target = target as usize;
        if target >= self.rows.len() {
            self.position = Some(self.rows.len());
            return false;
        }
        self.position = Some(target);
        true
    }
}
