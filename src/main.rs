use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use priority_tasks::api;
use priority_tasks::config::Config;
use priority_tasks::db::{self, SqliteTaskStore, TaskStore};
use priority_tasks::shutdown::Shutdown;
use priority_tasks::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "priority_tasks=debug,tower_http=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = db::connect(&config.database_url, config.max_connections).await?;
    let store: Arc<dyn TaskStore> = Arc::new(SqliteTaskStore::new(pool));

    let app = api::app(AppState::new(store.clone()), &config.static_dir);

    info!("serving static files from {}", config.static_dir.display());
    info!("listening on http://{}", config.bind_addr);

    let shutdown = Shutdown::install()?;
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.wait())
        .await?;

    store.close().await;
    info!("database closed, bye");

    Ok(())
}
