use std::cmp::Ordering;

use super::exit_operations::OrderSpec;
use crate::engine::types::Row;

/// Compares rows by a list of ORDER BY keys.
///
/// Nulls sort first ascending and last descending, as `ScalarValue::compare`
/// places `Null` below every value.
pub struct RowComparator;

impl RowComparator {
    pub fn compare(a: &Row, b: &Row, orders: &[OrderSpec]) -> Ordering {
        for order in orders {
            let ord = a.get(&order.column).compare(b.get(&order.column));
            let ord = if order.ascending { ord } else { ord.reverse() };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}
