use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use super::context::ExecutionContext;
use super::dispatch::{FanOutOutcome, ShardDispatch, ShardDispatcherBuilder};
use super::merge::{ExitStrategy, MergedResult};
use super::output::ShardedOutput;
use super::resolver::{ResolutionContext, ShardResolver, ShardResolverBuilder};
use crate::engine::errors::ShardedQueryError;
use crate::shared::config::FanOutConfig;

/// Resolve, fan out, collect and merge one logical execution.
pub struct QueryExecutionPipeline<'a> {
    ctx: Arc<ExecutionContext>,
    resolution: ResolutionContext<'a>,
    resolver: Box<dyn ShardResolver>,
    dispatcher: Box<dyn ShardDispatch>,
    exit: ExitStrategy,
    config: &'a FanOutConfig,
    timeout: Option<Duration>,
}

impl<'a> QueryExecutionPipeline<'a> {
    pub fn new(
        ctx: Arc<ExecutionContext>,
        resolution: ResolutionContext<'a>,
        exit: ExitStrategy,
        config: &'a FanOutConfig,
    ) -> Self {
        let resolver = ShardResolverBuilder::new(&resolution).build();
        let dispatcher = ShardDispatcherBuilder::new(config).build();
        Self {
            ctx,
            resolution,
            resolver,
            dispatcher,
            exit,
            config,
            timeout: config.execution_timeout(),
        }
    }

    /// Overrides the configured deadline for this execution only.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        if timeout.is_some() {
            self.timeout = timeout;
        }
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Box<dyn ShardDispatch>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub async fn execute(&self) -> Result<ShardedOutput<MergedResult>, ShardedQueryError> {
        let resolution = self.resolver.resolve(&self.resolution)?;
        info!(
            target: "shard_query::pipeline",
            intent = self.ctx.intent.as_str(),
            shards = resolution.len(),
            narrowed = resolution.is_narrowed(),
            "Executing sharded query"
        );

        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        let results = self.dispatcher.dispatch(&self.ctx, &resolution, deadline).await;
        self.ctx.sessions.release_all().await;

        let outcome = FanOutOutcome::collect(results, self.config.failure_policy, self.timeout)?;
        debug!(
            target: "shard_query::pipeline",
            merged_shards = outcome.payloads.len(),
            skipped = outcome.skipped.len(),
            "Merging shard results"
        );

        let merged = self.exit.merge(outcome.payloads)?;
        Ok(ShardedOutput {
            value: merged,
            skipped: outcome.skipped,
        })
    }
}
