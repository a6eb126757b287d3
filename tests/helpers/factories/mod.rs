pub mod memory_backend;
pub mod recording_query;
pub mod row_factory;

#[cfg(test)]
mod memory_backend_test;
#[cfg(test)]
mod row_factory_test;

pub use memory_backend::MemoryBackend;
pub use recording_query::{RecordingQuery, ShardFixture};
pub use row_factory::RowFactory;
