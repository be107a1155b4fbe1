mod api;
mod clock;
mod config;
mod db;
mod engine;
mod error;
mod geo;
mod kafka;
mod models;
mod processor;

use clock::{Clock, SystemClock};
use config::AppConfig;
use db::postgres::PgAlertStore;
use db::AlertStore;
use engine::{AlertLifecycle, AnalyticsAggregator, RetentionSweeper};
use geo::GeoResolver;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config
    let config = AppConfig::load()?;

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .init();

    info!("Starting SOS Dispatch Service...");

    // Init DB
    let pool = db::init_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Connected to database");

    let zones = config.load_zones()?;
    info!("Loaded {} location zones", zones.len());

    let store: Arc<dyn AlertStore> = Arc::new(PgAlertStore::new(pool));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let geo = Arc::new(GeoResolver::new(zones, config.station));

    let lifecycle = Arc::new(AlertLifecycle::new(store.clone(), geo, clock.clone()));
    let analytics = Arc::new(AnalyticsAggregator::new(store.clone(), clock.clone()));
    let sweeper = RetentionSweeper::new(
        store,
        clock,
        chrono::Duration::minutes(config.retention_window_minutes),
        Duration::from_secs(config.sweep_interval_minutes * 60),
    );

    let cancel = CancellationToken::new();

    let sweeper_cancel = cancel.clone();
    let sweeper_handle = tokio::spawn(async move { sweeper.run(sweeper_cancel).await });

    let kafka_handle = if config.kafka_enabled {
        let config = config.clone();
        let lifecycle = lifecycle.clone();
        let kafka_cancel = cancel.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = kafka::start_kafka_consumer(&config, lifecycle, kafka_cancel).await {
                error!("Kafka consumer failed: {}", e);
            }
        }))
    } else {
        info!("Kafka intake disabled");
        None
    };

    // Start HTTP
    let app = api::router(api::AppState {
        lifecycle,
        analytics,
    });
    let addr = format!("{}:{}", config.http_host, config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
            shutdown.cancel();
        })
        .await?;

    cancel.cancel();
    let _ = sweeper_handle.await;
    if let Some(handle) = kafka_handle {
        let _ = handle.await;
    }

    info!("SOS Dispatch Service stopped");
    Ok(())
}
