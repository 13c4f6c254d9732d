//! # aerotechd: aerotech hub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Wrap the state, targets and readings stores so every write reaches the
//!   change feed
//! - Construct application services, injecting repositories via port traits
//! - Provision configured devices
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use aerotech_adapter_http_axum::state::{AppState, Services};
use aerotech_adapter_identity_jwt::JwtIdentityProvider;
use aerotech_adapter_storage_sqlite_sqlx::{
    Config as StorageConfig, SqliteActuatorStateRepository, SqliteDeviceRepository,
    SqliteReadingRepository, SqliteTargetsRepository, SqliteTransitionLog,
};
use aerotech_app::change_feed::Notifying;
use aerotech_app::event_bus::InProcessEventBus;
use aerotech_app::services::actuator_service::ActuatorService;
use aerotech_app::services::device_service::DeviceService;
use aerotech_app::services::targets_service::TargetsService;
use aerotech_app::services::telemetry_service::TelemetryService;

use crate::config::Config;

/// Buffered changes per SSE subscriber before it starts lagging.
const EVENT_BUS_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Database
    let db = StorageConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("failed to open database")?;
    let pool = db.pool().clone();

    // Change feed
    let event_bus = Arc::new(InProcessEventBus::new(EVENT_BUS_CAPACITY));

    // Services
    let actuators = ActuatorService::new(
        Notifying::new(
            SqliteActuatorStateRepository::new(pool.clone()),
            Arc::clone(&event_bus),
        ),
        SqliteTransitionLog::new(pool.clone()),
    );
    let targets = TargetsService::new(Notifying::new(
        SqliteTargetsRepository::new(pool.clone()),
        Arc::clone(&event_bus),
    ));
    let telemetry = TelemetryService::new(
        Notifying::new(
            SqliteReadingRepository::new(pool.clone()),
            Arc::clone(&event_bus),
        ),
        SqliteDeviceRepository::new(pool.clone()),
    );
    let devices = DeviceService::new(SqliteDeviceRepository::new(pool));

    for device in config.devices()? {
        let device = devices
            .provision(device)
            .await
            .context("failed to provision device")?;
        tracing::info!(device_id = %device.id, name = %device.name, "device provisioned");
    }

    // HTTP
    let identity = JwtIdentityProvider::new(&config.auth.jwt_secret, config.auth.audience.as_deref());
    let state = AppState::new(
        Services {
            actuators,
            targets,
            telemetry,
            devices,
        },
        identity,
        event_bus,
    );
    let app = aerotech_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "aerotechd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("aerotechd stopped");
    Ok(())
}

/// Resolve once SIGINT (or SIGTERM on unix) is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(%err, "failed to listen for ctrl-c");
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
                tracing::warn!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
