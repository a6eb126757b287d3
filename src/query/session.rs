use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use super::facade::ShardedQuery;
use super::resolver::ShardAffinity;
use crate::engine::errors::ShardedQueryError;
use crate::engine::session::{QueryDefinition, SessionProvider};
use crate::engine::types::ShardId;
use crate::shared::config::FanOutConfig;

pub(crate) struct SessionShared {
    pub provider: Arc<dyn SessionProvider>,
    pub shard_ids: Vec<ShardId>,
    pub affinity: Option<Arc<dyn ShardAffinity>>,
    pub config: FanOutConfig,
}

/// Entry point for sharded queries: the set of shards, how to reach them,
/// and how to fan out across them.
#[derive(Clone)]
pub struct ShardedSession {
    shared: Arc<SessionShared>,
}

impl ShardedSession {
    pub fn builder(provider: Arc<dyn SessionProvider>) -> ShardedSessionBuilder {
        ShardedSessionBuilder::new(provider)
    }

    pub fn shard_ids(&self) -> &[ShardId] {
        &self.shared.shard_ids
    }

    pub fn config(&self) -> &FanOutConfig {
        &self.shared.config
    }

    pub fn create_query(&self, statement: impl Into<String>) -> ShardedQuery {
        self.query(QueryDefinition::hql(statement))
    }

    pub fn create_sql_query(&self, sql: impl Into<String>) -> ShardedQuery {
        self.query(QueryDefinition::sql(sql))
    }

    pub fn named_query(&self, name: impl Into<String>) -> ShardedQuery {
        self.query(QueryDefinition::named(name))
    }

    pub fn query(&self, definition: QueryDefinition) -> ShardedQuery {
        ShardedQuery::new(Arc::clone(&self.shared), definition)
    }
}

pub struct ShardedSessionBuilder {
    provider: Arc<dyn SessionProvider>,
    shard_ids: Vec<ShardId>,
    affinity: Option<Arc<dyn ShardAffinity>>,
    config: FanOutConfig,
}

impl ShardedSessionBuilder {
    pub fn new(provider: Arc<dyn SessionProvider>) -> Self {
        Self {
            provider,
            shard_ids: Vec::new(),
            affinity: None,
            config: FanOutConfig::default(),
        }
    }

    pub fn shard(mut self, shard: ShardId) -> Self {
        self.shard_ids.push(shard);
        self
    }

    pub fn shards(mut self, shards: impl IntoIterator<Item = ShardId>) -> Self {
        self.shard_ids.extend(shards);
        self
    }

    pub fn affinity(mut self, affinity: Arc<dyn ShardAffinity>) -> Self {
        self.affinity = Some(affinity);
        self
    }

    pub fn config(mut self, config: FanOutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<ShardedSession, ShardedQueryError> {
        if self.shard_ids.is_empty() {
            return Err(ShardedQueryError::Configuration(
                "no shards configured".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.shard_ids.len());
        if let Some(duplicate) = self.shard_ids.iter().find(|shard| !seen.insert(**shard)) {
            return Err(ShardedQueryError::Configuration(format!(
                "{duplicate} configured more than once"
            )));
        }

        info!(
            target: "shard_query::session",
            shards = self.shard_ids.len(),
            strategy = ?self.config.access_strategy,
            failure_policy = ?self.config.failure_policy,
            "Sharded session ready"
        );

        Ok(ShardedSession {
            shared: Arc::new(SessionShared {
                provider: self.provider,
                shard_ids: self.shard_ids,
                affinity: self.affinity,
                config: self.config,
            }),
        })
    }
}
