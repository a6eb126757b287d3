use std::env;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub fan_out: FanOutConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessStrategy {
    Sequential,
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Any failed shard fails the whole call.
    FailFast,
    /// Failed shards are skipped and reported next to the merged result.
    Partial,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FanOutConfig {
    pub access_strategy: AccessStrategy,
    /// Upper bound on concurrently running shard executions (parallel only)
    pub max_concurrency: usize,
    /// Deadline for the whole fan-out; unset means no deadline
    pub execution_timeout_ms: Option<u64>,
    pub failure_policy: FailurePolicy,
    /// Forward `first + max` as a per-shard limit when the merge allows it
    pub limit_push_down: bool,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            access_strategy: AccessStrategy::Parallel,
            max_concurrency: default_max_concurrency(),
            execution_timeout_ms: None,
            failure_policy: FailurePolicy::FailFast,
            limit_push_down: true,
        }
    }
}

fn default_max_concurrency() -> usize {
    16
}

impl FanOutConfig {
    /// Fan-out settings from the process-wide configuration file.
    pub fn from_global() -> Self {
        crate::shared::config::CONFIG.fan_out.clone()
    }

    pub fn execution_timeout(&self) -> Option<Duration> {
        self.execution_timeout_ms.map(Duration::from_millis)
    }

    pub fn sequential(mut self) -> Self {
        self.access_strategy = AccessStrategy::Sequential;
        self
    }

    pub fn parallel(mut self, max_concurrency: usize) -> Self {
        self.access_strategy = AccessStrategy::Parallel;
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_limit_push_down(mut self, enabled: bool) -> Self {
        self.limit_push_down = enabled;
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("SHARD_QUERY_CONFIG").unwrap_or_else(|_| "config".to_string());
    load_settings_from(&config_path)
}

pub fn load_settings_from(path: &str) -> Result<Settings, config::ConfigError> {
    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
