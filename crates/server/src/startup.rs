use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging;
use configs::{AppConfig, StoreConfig};
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::{
    identity::RandomHexGenerator,
    password::PasswordScheme,
    runtime,
    storage::{InMemoryBackend, JsonFileBackend, PersistenceBackend},
    UserStore,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the configured backend and load the user store from it.
pub async fn build_state(store: &StoreConfig) -> Result<ServerState, StartupError> {
    let backend: Arc<dyn PersistenceBackend> = match store.backend.as_str() {
        "memory" => Arc::new(InMemoryBackend::new()),
        "file" => Arc::new(JsonFileBackend::new(PathBuf::from(&store.path)).await?),
        other => return Err(StartupError::InvalidConfig(format!("unknown store backend `{other}`"))),
    };
    let scheme: PasswordScheme = store.password_scheme.parse()?;
    let users = UserStore::new(backend, Arc::new(RandomHexGenerator), scheme).await?;
    Ok(ServerState::new(users))
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_or_env()?;
    init_logging(&cfg.logging.format);

    let data_dir = cfg.store.data_dir().unwrap_or_default();
    runtime::ensure_env(&cfg.frontend.dir, &data_dir).await?;

    let state = build_state(&cfg.store).await?;
    info!(backend = %cfg.store.backend, path = %cfg.store.path, "user store ready");

    let app: Router = routes::build_router(state, build_cors(), &cfg.frontend.dir);

    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    info!(%addr, "starting favorites server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
