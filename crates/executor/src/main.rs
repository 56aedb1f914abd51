use std::env;
use std::sync::Arc;

use anyhow::Context;
use common::config::Settings;
use common::logger;
use exchange::OkxClient;
use storage::{JsonFileStore, OrderStore, SqliteOrderStore};
use tokio::net::TcpListener;
use tracing::info;

use crate::router::AppState;
use crate::services::order_sequencer::OrderSequencer;

mod router;
mod services;

fn load_env() -> anyhow::Result<()> {
    match env::var("ENV_FILE") {
        Ok(path) => {
            dotenvy::from_path(&path).with_context(|| format!("failed to load {}", path))?;
        }
        Err(_) => {
            dotenvy::dotenv().ok();
        }
    }
    Ok(())
}

async fn open_store(settings: &Settings) -> anyhow::Result<Arc<dyn OrderStore>> {
    let store: Arc<dyn OrderStore> = match &settings.order_db {
        Some(path) => Arc::new(
            SqliteOrderStore::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?,
        ),
        None => {
            info!("Tracking current order in {}", settings.order_file.display());
            Arc::new(JsonFileStore::new(settings.order_file.clone()))
        }
    };
    Ok(store)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env()?;
    logger::setup_logger();

    let settings = Settings::from_env().context("invalid configuration")?;
    info!("OKX limit bot starting up...");
    info!("Configuration: {:?}", settings);

    let api = Arc::new(OkxClient::new(&settings.exchange).context("failed to build OKX client")?);
    let store = open_store(&settings).await?;
    let sequencer = Arc::new(OrderSequencer::new(api, store));

    let app = router::app(AppState::new(sequencer, settings.webhook_secret.clone()));
    let listener = TcpListener::bind(("0.0.0.0", settings.port))
        .await
        .with_context(|| format!("failed to bind port {}", settings.port))?;

    info!("Listening on http://0.0.0.0:{}", settings.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
