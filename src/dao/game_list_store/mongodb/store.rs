use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Collection, Database, bson::doc, options::ReadConcern};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::MongoGameListDocument,
};
use crate::dao::{
    game_list_store::GameListStore,
    models::GameListEntity,
    storage::{StorageResult, TxScope},
};

const GAME_LIST_COLLECTION_NAME: &str = "game_lists";

/// Game list store backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoGameListStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let database =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.database = database;
        Ok(())
    }
}

impl MongoGameListStore {
    /// Establish a connection to MongoDB.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let database =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { database }),
            config,
        });

        Ok(Self { inner })
    }

    async fn collection(&self) -> Collection<MongoGameListDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoGameListDocument>(GAME_LIST_COLLECTION_NAME)
    }

    async fn fetch_all(&self, scope: TxScope) -> MongoResult<Vec<GameListEntity>> {
        let collection = self.collection().await;
        let read_concern = match scope {
            // Majority reads only observe committed data and never block writers.
            TxScope::ReadOnly => ReadConcern::majority(),
        };

        let documents: Vec<MongoGameListDocument> = collection
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .read_concern(read_concern)
            .await
            .map_err(|source| MongoDaoError::ListGameLists { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListGameLists { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }
}

impl GameListStore for MongoGameListStore {
    fn fetch_all(&self, scope: TxScope) -> BoxFuture<'static, StorageResult<Vec<GameListEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.fetch_all(scope).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
