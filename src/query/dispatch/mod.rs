mod builder;
mod executor;
mod outcome;
mod parallel;
mod sequential;
mod traits;

#[cfg(test)]
mod executor_test;
#[cfg(test)]
mod sequential_test;

pub use builder::ShardDispatcherBuilder;
pub use executor::ShardExecutor;
pub use outcome::FanOutOutcome;
pub use parallel::ParallelShardDispatcher;
pub use sequential::SequentialShardDispatcher;
pub use traits::ShardDispatch;
