use super::parallel::ParallelShardDispatcher;
use super::sequential::SequentialShardDispatcher;
use super::traits::ShardDispatch;
use crate::shared::config::{AccessStrategy, FanOutConfig};

/// Builds the dispatcher selected by configuration.
pub struct ShardDispatcherBuilder<'a> {
    config: &'a FanOutConfig,
}

impl<'a> ShardDispatcherBuilder<'a> {
    pub fn new(config: &'a FanOutConfig) -> Self {
        Self { config }
    }

    pub fn build(self) -> Box<dyn ShardDispatch> {
        match self.config.access_strategy {
            AccessStrategy::Parallel => {
                Box::new(ParallelShardDispatcher::new(self.config.max_concurrency))
            }
            AccessStrategy::Sequential => Box::new(SequentialShardDispatcher::new()),
        }
    }
}
