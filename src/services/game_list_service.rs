use std::sync::Arc;

use tracing::debug;

use crate::{
    dao::{game_list_store::GameListStore, storage::TxScope},
    dto::game_list::GameListSummary,
    error::ServiceError,
    state::SharedState,
};

/// Read-only access to the persisted game lists.
#[derive(Clone)]
pub struct GameListService {
    store: Arc<dyn GameListStore>,
}

impl GameListService {
    /// Build the service around an explicit storage collaborator.
    pub fn new(store: Arc<dyn GameListStore>) -> Self {
        Self { store }
    }

    /// Return a summary of every stored game list, in storage order.
    ///
    /// Storage failures are returned unchanged inside [`ServiceError::Unavailable`]; no partial
    /// result is produced.
    pub async fn find_all(&self) -> Result<Vec<GameListSummary>, ServiceError> {
        let records = self.store.fetch_all(TxScope::ReadOnly).await?;
        let summaries: Vec<GameListSummary> = records.iter().map(GameListSummary::from).collect();
        debug!(count = summaries.len(), "listed game lists");
        Ok(summaries)
    }
}

/// List every game list using the store currently installed in the shared state.
pub async fn find_all(state: &SharedState) -> Result<Vec<GameListSummary>, ServiceError> {
    let store = state.require_store().await?;
    GameListService::new(store).find_all().await
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use futures::future::BoxFuture;

    use super::*;
    use crate::{
        dao::{
            game_list_store::memory::InMemoryGameListStore,
            models::GameListEntity,
            storage::{StorageError, StorageResult},
        },
        state::AppState,
    };

    /// Store that records the scope it was asked for and can be told to fail.
    #[derive(Default)]
    struct ScriptedStore {
        records: Vec<GameListEntity>,
        fail: bool,
        calls: AtomicUsize,
        read_only_calls: AtomicUsize,
    }

    impl GameListStore for ScriptedStore {
        fn fetch_all(
            &self,
            scope: TxScope,
        ) -> BoxFuture<'static, StorageResult<Vec<GameListEntity>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if scope == TxScope::ReadOnly {
                self.read_only_calls.fetch_add(1, Ordering::SeqCst);
            }
            let outcome = if self.fail {
                Err(StorageError::unavailable(
                    "failed to list game lists".into(),
                    io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
                ))
            } else {
                Ok(self.records.clone())
            };
            Box::pin(async move { outcome })
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }

        fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
            Box::pin(async { Ok(()) })
        }
    }

    fn service_over(records: Vec<GameListEntity>) -> GameListService {
        GameListService::new(Arc::new(InMemoryGameListStore::with_records(records)))
    }

    fn summary(id: i64, name: &str) -> GameListSummary {
        GameListSummary {
            id,
            name: name.into(),
        }
    }

    #[tokio::test]
    async fn empty_storage_yields_empty_sequence() {
        let service = service_over(Vec::new());
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn single_record_is_summarized() {
        let service = service_over(vec![GameListEntity::new(1, "Favorites")]);
        assert_eq!(
            service.find_all().await.unwrap(),
            vec![summary(1, "Favorites")]
        );
    }

    #[tokio::test]
    async fn every_record_has_exactly_one_matching_summary() {
        let records = vec![
            GameListEntity::new(1, "Adventure").with_games([1, 2, 3]),
            GameListEntity::new(2, "Platformers").with_games([6, 7]),
            GameListEntity::new(3, "Puzzle"),
        ];
        let service = service_over(records.clone());

        let summaries = service.find_all().await.unwrap();
        assert_eq!(summaries.len(), records.len());
        for record in &records {
            let matching = summaries
                .iter()
                .filter(|s| s.id == record.id && s.name == record.name)
                .count();
            assert_eq!(matching, 1, "record {} must appear exactly once", record.id);
        }
        assert!(
            summaries
                .iter()
                .all(|s| records.iter().any(|r| r.id == s.id && r.name == s.name))
        );
    }

    #[tokio::test]
    async fn storage_order_is_preserved() {
        let store = ScriptedStore {
            records: vec![
                GameListEntity::new(9, "Last added"),
                GameListEntity::new(4, "First added"),
            ],
            ..Default::default()
        };
        let service = GameListService::new(Arc::new(store));

        let ids: Vec<i64> = service
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![9, 4]);
    }

    #[tokio::test]
    async fn repeated_calls_are_idempotent() {
        let service = service_over(vec![
            GameListEntity::new(1, "Adventure"),
            GameListEntity::new(2, "Platformers"),
        ]);

        let first = service.find_all().await.unwrap();
        let second = service.find_all().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn concurrent_callers_see_the_same_listing() {
        let service = service_over(vec![
            GameListEntity::new(2, "Platformers"),
            GameListEntity::new(1, "Adventure"),
        ]);
        let other = service.clone();

        let (first, second) = tokio::join!(service.find_all(), other.find_all());
        let first = first.unwrap();
        assert_eq!(first, second.unwrap());
        assert_eq!(
            first,
            vec![summary(1, "Adventure"), summary(2, "Platformers")]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_tasks_share_one_service() {
        let service = service_over(vec![GameListEntity::new(1, "Favorites")]);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.find_all().await })
            })
            .collect();
        for handle in handles {
            assert_eq!(
                handle.await.unwrap().unwrap(),
                vec![summary(1, "Favorites")]
            );
        }
    }

    #[tokio::test]
    async fn reads_use_read_only_scope() {
        let store = Arc::new(ScriptedStore::default());
        let service = GameListService::new(store.clone());

        service.find_all().await.unwrap();
        service.find_all().await.unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.read_only_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn storage_failure_is_propagated_without_partial_result() {
        let store = ScriptedStore {
            records: vec![GameListEntity::new(1, "Favorites")],
            fail: true,
            ..Default::default()
        };
        let service = GameListService::new(Arc::new(store));

        match service.find_all().await {
            Err(ServiceError::Unavailable(StorageError::Unavailable { message, .. })) => {
                assert_eq!(message, "failed to list game lists");
            }
            other => panic!("expected storage failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn degraded_state_is_reported() {
        let state = AppState::new();
        assert!(matches!(
            find_all(&state).await,
            Err(ServiceError::Degraded)
        ));
    }

    #[tokio::test]
    async fn installed_store_is_used() {
        let state = AppState::new();
        state
            .install_store(Arc::new(InMemoryGameListStore::with_records([
                GameListEntity::new(1, "Favorites"),
            ])))
            .await;

        assert_eq!(
            find_all(&state).await.unwrap(),
            vec![summary(1, "Favorites")]
        );
    }
}
