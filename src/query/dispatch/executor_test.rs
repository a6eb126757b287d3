use std::sync::Arc;

use super::executor::ShardExecutor;
use crate::engine::errors::{ShardFailure, ShardQueryError};
use crate::engine::operation::{Operation, OperationKind, OperationLog, PaginationPolicy, ParamKey};
use crate::engine::session::{AggregateSpec, QueryDefinition, ScalarPartial};
use crate::engine::types::{ScalarValue, ShardId};
use crate::query::context::{ExecutionContext, QueryIntent};
use crate::query::shard_result::ShardPayload;
use crate::test_helpers::factories::{MemoryBackend, RowFactory};

fn context(backend: &MemoryBackend, log: OperationLog, intent: QueryIntent) -> ExecutionContext {
    ExecutionContext::new(
        QueryDefinition::hql("from Item"),
        log,
        intent,
        Arc::new(backend.clone()),
    )
}

#[tokio::test]
async fn replays_log_then_runs_list() {
    let backend = MemoryBackend::new().with_rows(1, RowFactory::ids(&[1, 2]));
    let mut log = OperationLog::new();
    log.append(Operation::SetFetchSize(100));
    log.append(Operation::SetMaxResults(1));
    let ctx = context(&backend, log, QueryIntent::List);

    let result = ShardExecutor::execute(&ctx, ShardId(1), 0).await;

    assert_eq!(result.shard_id, ShardId(1));
    assert_eq!(result.position, 0);
    match result.outcome {
        Ok(ShardPayload::Rows(rows)) => assert_eq!(RowFactory::id_values(&rows), vec![1, 2]),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(backend.journal_for(1), vec![Operation::SetFetchSize(100)]);
    assert_eq!(
        backend.definitions(),
        vec![(ShardId(1), QueryDefinition::hql("from Item"))]
    );
}

#[tokio::test]
async fn push_down_policy_limits_the_shard() {
    let backend = MemoryBackend::new().with_rows(1, RowFactory::ids(&[1, 2, 3, 4]));
    let mut log = OperationLog::new();
    log.append(Operation::SetFirstResult(1));
    log.append(Operation::SetMaxResults(2));
    let ctx = context(&backend, log, QueryIntent::List)
        .with_pagination(PaginationPolicy::PushDown { first_result: 1 });

    let result = ShardExecutor::execute(&ctx, ShardId(1), 0).await;

    match result.outcome {
        Ok(ShardPayload::Rows(rows)) => assert_eq!(RowFactory::id_values(&rows), vec![1, 2, 3]),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn runs_aggregate_intent() {
    let backend = MemoryBackend::new().with_rows(
        2,
        vec![
            RowFactory::new().with("amount", 5).create(),
            RowFactory::new().with("amount", 7).create(),
        ],
    );
    let ctx = context(
        &backend,
        OperationLog::new(),
        QueryIntent::Aggregate(AggregateSpec::sum("amount")),
    );

    let result = ShardExecutor::execute(&ctx, ShardId(2), 1).await;

    assert_eq!(
        result.outcome,
        Ok(ShardPayload::Scalar(ScalarPartial::Sum(ScalarValue::Int64(12))))
    );
}

#[tokio::test]
async fn backend_failure_is_captured_with_the_shard() {
    let backend =
        MemoryBackend::new().with_failure(3, ShardQueryError::Backend("disk full".into()));
    let ctx = context(&backend, OperationLog::new(), QueryIntent::Update);

    let result = ShardExecutor::execute(&ctx, ShardId(3), 2).await;

    assert_eq!(result.shard_id, ShardId(3));
    assert_eq!(
        result.outcome,
        Err(ShardFailure::Execution(ShardQueryError::Backend("disk full".into())))
    );
}

#[tokio::test]
async fn unsupported_replay_is_reported_as_unsupported() {
    let backend = MemoryBackend::new().without_handle_support(OperationKind::SetString);
    let mut log = OperationLog::new();
    log.append(Operation::SetString {
        key: ParamKey::Position(0),
        value: "x".into(),
    });
    let ctx = context(&backend, log, QueryIntent::Unique);

    let result = ShardExecutor::execute(&ctx, ShardId(1), 0).await;

    let failure = result.outcome.unwrap_err();
    assert_eq!(failure.unsupported_kind(), Some(OperationKind::SetString));
}

#[tokio::test]
async fn session_is_reused_within_one_context() {
    let backend = MemoryBackend::new();
    let ctx = context(&backend, OperationLog::new(), QueryIntent::List);

    ShardExecutor::execute(&ctx, ShardId(1), 0).await;
    ShardExecutor::execute(&ctx, ShardId(1), 0).await;

    assert_eq!(backend.opened(), vec![ShardId(1)]);
    assert_eq!(ctx.sessions.open_count(), 1);
}
