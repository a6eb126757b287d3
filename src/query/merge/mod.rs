mod aggregate;
mod exit_operations;
mod exit_strategy;
mod list;
mod row_comparator;
mod unique;
mod update;


pub use aggregate::AggregateMerger;
pub use exit_operations::{Distinct, ExitOperations, OrderSpec};
pub use exit_strategy::{ExitStrategy, MergedResult};
pub use list::ListMerger;
pub use row_comparator::RowComparator;
pub use unique::UniqueMerger;
pub use update::UpdateCountMerger;
