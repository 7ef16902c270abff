use axum::Server;
use config::Config;
use environment::HostEnvironment;
use errors::ApiError;
use once_cell::sync::OnceCell;
use services::SeedWorker;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod api;
mod app;
mod cache;
mod catalogs;
mod config;
mod container;
mod db;
mod environment;
mod errors;
mod logging;
mod schema;
mod services;

/// Result type for API
pub type Result<T> = std::result::Result<T, errors::ApiError>;

/// Configuration, loaded once at startup
static CONFIG: OnceCell<Config> = OnceCell::new();

/// Cancels `shutdown` on Ctrl+C or SIGTERM
async fn wait_for_shutdown(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
    shutdown.cancel();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = CONFIG.get_or_try_init(Config::from_env)?;

    // Initialize logging
    logging::setup_logging(config)?;
    let environment = HostEnvironment::new(config.app_environment.as_str());
    info!("Starting in '{}' environment", environment.name());

    // Initialize database and Redis connections
    let db_client =
        db::DbClient::new(&config.database_url, &config.redis_url, config.db_pool_size)?;

    // Register endpoints and seeders from the application manifest
    let app_part = app::application_part();
    let mut services = container::ServiceCollection::new();
    services
        .add_minimal_endpoints(&app_part, &[])
        .add_data_seeders(&app_part, &[]);
    let provider = services.build();
    info!(
        "Registered {} endpoint(s) and {} seeder(s)",
        provider.endpoint_count(),
        provider.seeder_count()
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(wait_for_shutdown(shutdown.clone()));

    // Seed before accepting traffic
    let mut seed_worker = SeedWorker::new(provider.clone(), db_client.clone(), environment);
    seed_worker.execute(&shutdown).await?;
    info!("Seed worker finished with status {:?}", seed_worker.status());

    // Setup API router and start server
    let app = api::initialize_router(db_client, &provider, config)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server starting on {}", addr);

    let graceful = shutdown.clone();
    let served = Server::try_bind(&addr)
        .map_err(|e| ApiError::Server(e.to_string()))?
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move { graceful.cancelled().await })
        .await
        .map_err(|e| ApiError::Server(e.to_string()));

    seed_worker.stop();
    info!("Server stopped");
    served
}
