//! DecoFire Storefront - Self-hosted storefront with a local cart

use anyhow::Result;
use decofire_storefront::{router, AppConfig, AppState, CatalogStore, FileKeyValueStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");
    let catalog = CatalogStore::open(config.catalog_path()).await?;
    let cart_store = FileKeyValueStore::new(config.storage_dir());
    let state = AppState::new(catalog, Box::new(cart_store), config.checkout_options(), config.admin_password.as_str());

    let addr = config.socket_addr();
    tracing::info!("🚀 DecoFire storefront listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;
    Ok(())
}
