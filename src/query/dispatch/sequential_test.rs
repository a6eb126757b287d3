use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use super::sequential::SequentialShardDispatcher;
use super::traits::ShardDispatch;
use crate::engine::errors::{ShardFailure, ShardQueryError};
use crate::engine::operation::OperationLog;
use crate::engine::session::QueryDefinition;
use crate::query::context::{ExecutionContext, QueryIntent};
use crate::query::resolver::ShardResolution;
use crate::test_helpers::Factory;
use crate::test_helpers::factories::{MemoryBackend, RowFactory};

fn update_context(backend: &MemoryBackend) -> Arc<ExecutionContext> {
    Arc::new(ExecutionContext::new(
        QueryDefinition::sql("update item set seen = true"),
        OperationLog::new(),
        QueryIntent::Update,
        Arc::new(backend.clone()),
    ))
}

#[tokio::test]
async fn visits_shards_in_resolution_order() {
    let backend = MemoryBackend::new()
        .with_update_count(2, 4)
        .with_update_count(1, 1);
    let resolution = ShardResolution::all(Factory::shard_ids(&[2, 1]));

    let results = SequentialShardDispatcher::new()
        .dispatch(&update_context(&backend), &resolution, None)
        .await;

    let positions: Vec<usize> = results.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![0, 1]);
    assert_eq!(results[0].shard_id, Factory::shard_ids(&[2])[0]);
    assert!(results.iter().all(|r| r.is_success()));
}

#[tokio::test]
async fn a_failing_shard_does_not_stop_the_rest() {
    let backend = MemoryBackend::new()
        .with_failure(1, ShardQueryError::Backend("down".into()))
        .with_rows(2, RowFactory::ids(&[1, 2]));
    let resolution = ShardResolution::all(Factory::shard_ids(&[1, 2]));

    let results = SequentialShardDispatcher::new()
        .dispatch(&update_context(&backend), &resolution, None)
        .await;

    assert!(!results[0].is_success());
    assert!(results[1].is_success());
}

#[tokio::test]
async fn shards_after_the_deadline_are_not_contacted() {
    let backend = MemoryBackend::new()
        .with_delay(1, Duration::from_secs(5))
        .with_rows(2, RowFactory::ids(&[1]));
    let resolution = ShardResolution::all(Factory::shard_ids(&[1, 2]));

    let results = SequentialShardDispatcher::new()
        .dispatch(
            &update_context(&backend),
            &resolution,
            Some(Instant::now() + Duration::from_millis(50)),
        )
        .await;

    assert_eq!(results[0].outcome, Err(ShardFailure::TimedOut));
    assert_eq!(results[1].outcome, Err(ShardFailure::TimedOut));
    assert!(!backend.opened().contains(&Factory::shard_ids(&[2])[0]));
}
