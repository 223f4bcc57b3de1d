//! # medfleetd — medfleet daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize tracing
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Spawn the battery audit task
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve until shutdown
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use medfleet_adapter_http_axum::state::AppState;
use medfleet_adapter_storage_sqlite_sqlx::{
    SqliteAppUserRepository, SqliteDroneRepository, SqliteMedicationRepository,
};
use medfleet_app::battery_monitor::BatteryMonitor;
use medfleet_app::event_bus::InProcessEventBus;
use medfleet_app::services::auth_service::AuthService;
use medfleet_app::services::drone_service::DroneService;
use medfleet_app::token::TokenSigner;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = medfleet_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database.url.clone(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let drone_repo = SqliteDroneRepository::new(pool.clone());
    let medication_repo = SqliteMedicationRepository::new(pool.clone());
    let user_repo = SqliteAppUserRepository::new(pool.clone());

    // Event bus
    let event_bus = InProcessEventBus::new(256);

    // Services
    let signer = Arc::new(TokenSigner::new(
        &config.auth.secret,
        config.auth.token_ttl_hours,
    ));
    let drone_service = DroneService::new(drone_repo, medication_repo, event_bus)
        .with_serialized_operations();
    let auth_service = AuthService::new(user_repo, Arc::clone(&signer));

    // Background battery audit
    if config.battery_monitor.enabled {
        let monitor = BatteryMonitor::new(
            SqliteDroneRepository::new(pool),
            Duration::from_secs(config.battery_monitor.interval_seconds),
        );
        tokio::spawn(monitor.run());
    }

    // HTTP
    let state = AppState::new(drone_service, auth_service, signer);
    let app = medfleet_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "medfleetd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("medfleetd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
