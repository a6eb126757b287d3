mod kinds;
mod operation_log;
mod record;


pub use kinds::{CacheMode, FlushMode, LockMode, OperationKind, ParamKey};
pub use operation_log::{OperationLog, PaginationPolicy};
pub use record::Operation;
