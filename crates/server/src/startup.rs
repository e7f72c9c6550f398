use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, AppState};
use service::{
    products::{seed, ProductStore},
    runtime,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load configuration from `config.toml` (or `CONFIG_PATH`), falling back to env vars.
pub fn load_config() -> Result<AppConfig, StartupError> {
    AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

/// Open the catalog and build the router around it.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let products_file = PathBuf::from(&cfg.storage.products_file);
    runtime::ensure_env(&products_file).await?;

    let store = ProductStore::new(products_file).await;
    if cfg.storage.seed_demo {
        seed::seed_if_empty(store.as_ref()).await?;
    }

    let state = AppState { products: Arc::clone(&store) as Arc<dyn service::products::ProductRepository> };
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = load_config()?;
    let app = build_app(&cfg).await?;

    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    info!(%addr, products_file = %cfg.storage.products_file, "starting product catalog server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
