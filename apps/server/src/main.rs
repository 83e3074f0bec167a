use anyhow::{Context, Result};
use catalog::db::CatalogDb;
use catalog::CatalogService;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portfolio_server::config::ServerConfig;
use portfolio_server::router::build_app_router;
use portfolio_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portfolio_server=info,catalog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load().context("failed to load settings")?;
    tracing::info!(
        addr = %config.addr,
        data_dir = %config.data_dir.display(),
        database = %config.database_path.display(),
        "loaded server configuration"
    );

    let db = CatalogDb::open(&config.database_path)
        .with_context(|| format!("failed to open catalog {}", config.database_path.display()))?;
    let service = CatalogService::new(db);
    service
        .seed_default_categories()
        .context("failed to seed default categories")?;

    let addr = config.addr;
    let app = build_app_router(AppState::new(service, config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "starting server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl-C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
