use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{game_list_store::GameListStore, storage::StorageError},
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Connect the storage backend and keep the shared state in degraded mode while it is unavailable.
///
/// Runs forever; spawn it on the runtime.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn GameListStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        match connect().await {
            Ok(store) => {
                state.install_store(store.clone()).await;
                info!("storage connection established; leaving degraded mode");
                delay = INITIAL_DELAY;

                supervise(&state, store.as_ref()).await;

                warn!("exhausted storage reconnect attempts; dropping backend");
                state.clear_store().await;
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
            Err(err) => {
                warn!(error = %err, "storage connection attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }
}

/// Poll the store until it fails and cannot be reconnected.
async fn supervise(state: &SharedState, store: &dyn GameListStore) {
    loop {
        match store.health_check().await {
            Ok(()) => {
                if state.is_degraded() {
                    info!("storage healthy again; leaving degraded mode");
                    state.update_degraded(false);
                }
                sleep(HEALTH_POLL_INTERVAL).await;
            }
            Err(err) => {
                warn!(error = %err, "storage health check failed");
                if !reconnect(state, store).await {
                    return;
                }
                state.update_degraded(false);
                sleep(HEALTH_POLL_INTERVAL).await;
            }
        }
    }
}

async fn reconnect(state: &SharedState, store: &dyn GameListStore) -> bool {
    let mut reconnect_delay = INITIAL_DELAY;

    for attempt in 0..MAX_RECONNECT_ATTEMPTS {
        match store.try_reconnect().await {
            Ok(()) => {
                info!(attempt, "storage reconnection succeeded after health check failure");
                return true;
            }
            Err(err) => {
                if attempt == 0 {
                    warn!(
                        attempt, error = %err,
                        "storage reconnect first attempt failed; entering degraded mode"
                    );
                    state.update_degraded(true);
                } else {
                    warn!(attempt, error = %err, "storage reconnect attempt failed");
                }
                sleep(reconnect_delay).await;
                reconnect_delay = (reconnect_delay * 2).min(MAX_DELAY);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use std::{
        io,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use futures::future::BoxFuture;
    use tokio::time::timeout;

    use super::*;
    use crate::{
        dao::{
            game_list_store::memory::InMemoryGameListStore,
            models::GameListEntity,
            storage::{StorageResult, TxScope},
        },
        state::AppState,
    };

    fn refused(message: &str) -> StorageError {
        StorageError::unavailable(
            message.into(),
            io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
        )
    }

    /// Store whose first health checks and reconnects fail a configurable number of times.
    struct FlakyStore {
        failing_health_checks: usize,
        failing_reconnects: usize,
        health_checks: AtomicUsize,
        reconnects: AtomicUsize,
    }

    impl FlakyStore {
        fn new(failing_health_checks: usize, failing_reconnects: usize) -> Arc<Self> {
            Arc::new(Self {
                failing_health_checks,
                failing_reconnects,
                health_checks: AtomicUsize::new(0),
                reconnects: AtomicUsize::new(0),
            })
        }
    }

    impl GameListStore for FlakyStore {
        fn fetch_all(
            &self,
            _scope: TxScope,
        ) -> BoxFuture<'static, StorageResult<Vec<GameListEntity>>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
            let call = self.health_checks.fetch_add(1, Ordering::SeqCst);
            let fail = call < self.failing_health_checks;
            Box::pin(async move {
                if fail {
                    Err(refused("ping failed"))
                } else {
                    Ok(())
                }
            })
        }

        fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
            let call = self.reconnects.fetch_add(1, Ordering::SeqCst);
            let fail = call < self.failing_reconnects;
            Box::pin(async move {
                if fail {
                    Err(refused("reconnect failed"))
                } else {
                    Ok(())
                }
            })
        }
    }

    #[tokio::test]
    async fn successful_connect_installs_store() {
        let state = AppState::new();
        let mut watcher = state.degraded_watcher();
        let store = InMemoryGameListStore::with_records([GameListEntity::new(1, "Favorites")]);

        let task = tokio::spawn(run(state.clone(), move || {
            let store = store.clone();
            async move { Ok::<_, StorageError>(Arc::new(store) as Arc<dyn GameListStore>) }
        }));

        timeout(Duration::from_secs(1), watcher.wait_for(|degraded| !degraded))
            .await
            .expect("store installed in time")
            .unwrap();
        assert!(state.store().await.is_some());

        task.abort();
    }

    #[tokio::test]
    async fn failed_connect_stays_degraded() {
        let state = AppState::new();
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();

        let task = tokio::spawn(run(state.clone(), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async {
                Err::<Arc<dyn GameListStore>, _>(StorageError::unavailable(
                    "connect".into(),
                    io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"),
                ))
            }
        }));

        sleep(Duration::from_millis(100)).await;
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(state.is_degraded());
        assert!(state.store().await.is_none());

        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_reconnects_drop_the_backend() {
        let state = AppState::new();
        let store = FlakyStore::new(usize::MAX, usize::MAX);
        let connects = Arc::new(AtomicUsize::new(0));

        let installed = store.clone();
        let counter = connects.clone();
        let task = tokio::spawn(run(state.clone(), move || {
            let first = counter.fetch_add(1, Ordering::SeqCst) == 0;
            let store = installed.clone();
            async move {
                if first {
                    Ok::<_, StorageError>(store as Arc<dyn GameListStore>)
                } else {
                    Err(refused("connect"))
                }
            }
        }));

        // Reconnect backoff is 1s + 2s + 4s before the backend is dropped.
        sleep(Duration::from_secs(9)).await;
        assert_eq!(store.reconnects.load(Ordering::SeqCst), 3);
        assert!(state.is_degraded());
        assert!(state.store().await.is_none());
        assert!(connects.load(Ordering::SeqCst) >= 2);

        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_on_second_attempt_keeps_the_backend() {
        let state = AppState::new();
        let store = FlakyStore::new(1, 1);

        let installed = store.clone();
        let task = tokio::spawn(run(state.clone(), move || {
            let store = installed.clone();
            async move { Ok::<_, StorageError>(store as Arc<dyn GameListStore>) }
        }));

        sleep(Duration::from_millis(500)).await;
        assert_eq!(store.reconnects.load(Ordering::SeqCst), 1);
        assert!(state.is_degraded());
        assert!(state.store().await.is_some());

        sleep(Duration::from_secs(2)).await;
        assert_eq!(store.reconnects.load(Ordering::SeqCst), 2);
        assert!(!state.is_degraded());
        assert!(state.store().await.is_some());

        task.abort();
    }
}
