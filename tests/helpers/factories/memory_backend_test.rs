use super::memory_backend::MemoryBackend;
use super::row_factory::RowFactory;
use crate::engine::errors::ShardQueryError;
use crate::engine::operation::{Operation, OperationKind, ParamKey};
use crate::engine::session::{QueryDefinition, SessionProvider, ShardQuery, ShardSession};
use crate::engine::types::ShardId;

#[tokio::test]
async fn sessions_answer_from_their_own_fixture_and_journal_calls() {
    let backend = MemoryBackend::new()
        .with_rows(1, RowFactory::ids(&[1, 2]))
        .with_rows(2, RowFactory::ids(&[3]));

    let mut session = backend.open_session(ShardId(2)).await.unwrap();
    let mut query = session
        .create_query(&QueryDefinition::hql("from Item"))
        .unwrap();
    query.set_fetch_size(10).unwrap();
    let rows = query.list().await.unwrap();
    session.close().await.unwrap();

    assert_eq!(RowFactory::id_values(&rows), vec![3]);
    assert_eq!(backend.journal_for(2), vec![Operation::SetFetchSize(10)]);
    assert!(backend.journal_for(1).is_empty());
    assert_eq!(backend.opened(), vec![ShardId(2)]);
    assert_eq!(backend.closed(), vec![ShardId(2)]);
}

#[tokio::test]
async fn named_bind_filters_rows_on_matching_column() {
    let backend = MemoryBackend::new().with_rows(1, RowFactory::ids(&[1, 2, 3]));

    let mut session = backend.open_session(ShardId(1)).await.unwrap();
    let mut query = session.create_query(&QueryDefinition::sql("select")).unwrap();
    query.set_long(&ParamKey::from("id"), 2).unwrap();

    let row = query.unique_result().await.unwrap();
    assert_eq!(row, Some(RowFactory::new().with_id(2).create()));
}

#[tokio::test]
async fn handle_support_gaps_surface_on_replay() {
    let backend = MemoryBackend::new().without_handle_support(OperationKind::SetComment);
    assert!(backend.supports(OperationKind::SetComment));

    let mut session = backend.open_session(ShardId(1)).await.unwrap();
    let mut query = session.create_query(&QueryDefinition::hql("q")).unwrap();
    assert_eq!(
        query.set_comment("hint"),
        Err(ShardQueryError::Unsupported(OperationKind::SetComment))
    );
}
