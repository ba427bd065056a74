use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{dao::game_list_store::GameListStore, error::ServiceError};

/// Cheaply clonable handle shared with every request handler.
pub type SharedState = Arc<AppState>;

/// Central application state holding the storage backend and the degraded flag.
pub struct AppState {
    store: RwLock<Option<Arc<dyn GameListStore>>>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new() -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            store: RwLock::new(None),
            degraded: degraded_tx,
        })
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn GameListStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current store or fail with [`ServiceError::Degraded`].
    pub async fn require_store(&self) -> Result<Arc<dyn GameListStore>, ServiceError> {
        self.store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new store implementation and leave degraded mode.
    pub async fn install_store(&self, store: Arc<dyn GameListStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current store and enter degraded mode.
    pub async fn clear_store(&self) {
        {
            let mut guard = self.store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::game_list_store::memory::InMemoryGameListStore;

    #[tokio::test]
    async fn starts_degraded_without_store() {
        let state = AppState::new();
        assert!(state.is_degraded());
        assert!(matches!(
            state.require_store().await,
            Err(ServiceError::Degraded)
        ));
    }

    #[tokio::test]
    async fn installing_and_clearing_toggles_degraded() {
        let state = AppState::new();
        let mut watcher = state.degraded_watcher();

        state
            .install_store(Arc::new(InMemoryGameListStore::default()))
            .await;
        assert!(!state.is_degraded());
        assert!(watcher.has_changed().unwrap());
        assert!(!*watcher.borrow_and_update());
        assert!(state.require_store().await.is_ok());

        state.clear_store().await;
        assert!(state.is_degraded());
        assert!(*watcher.borrow_and_update());
        assert!(state.store().await.is_none());
    }

    #[tokio::test]
    async fn unchanged_flag_is_not_rebroadcast() {
        let state = AppState::new();
        let mut watcher = state.degraded_watcher();
        watcher.mark_unchanged();

        state.update_degraded(true);
        assert!(!watcher.has_changed().unwrap());
    }
}
