//! dslist-back binary entrypoint wiring the REST layer to the configured storage backend.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use dslist_back::{
    config::{AppConfig, StorageBackend},
    dao::{
        game_list_store::{GameListStore, memory::InMemoryGameListStore},
        storage::StorageError,
    },
    routes,
    services::storage_supervisor,
    state::{AppState, SharedState},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let backend = StorageBackend::from_env().context("selecting storage backend")?;
    let app_state = AppState::new();

    spawn_storage(app_state.clone(), backend);
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, ?backend, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Start the storage supervisor for the selected backend.
fn spawn_storage(state: SharedState, backend: StorageBackend) {
    match backend {
        StorageBackend::Memory => {
            let config = AppConfig::load();
            let store = InMemoryGameListStore::with_records(config.seed_lists().to_vec());
            tokio::spawn(storage_supervisor::run(state, move || {
                let store = store.clone();
                async move { Ok::<_, StorageError>(Arc::new(store) as Arc<dyn GameListStore>) }
            }));
        }
        #[cfg(feature = "mongo-store")]
        StorageBackend::Mongo => {
            use dslist_back::dao::game_list_store::mongodb::{MongoConfig, MongoGameListStore};

            tokio::spawn(storage_supervisor::run(state, || async {
                let config = MongoConfig::from_env().await?;
                let store = MongoGameListStore::connect(config).await?;
                Ok::<_, StorageError>(Arc::new(store) as Arc<dyn GameListStore>)
            }));
        }
        #[cfg(feature = "couch-store")]
        StorageBackend::Couch => {
            use dslist_back::dao::game_list_store::couchdb::{CouchConfig, CouchGameListStore};

            tokio::spawn(storage_supervisor::run(state, || async {
                let store = CouchGameListStore::connect(CouchConfig::from_env()).await?;
                Ok::<_, StorageError>(Arc::new(store) as Arc<dyn GameListStore>)
            }));
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
