//! Room Booking Service
//!
//! Reads configuration from TOML (`--config`, `$BOOKING_CONFIG`, or
//! ~/.config/room-booking/config.toml), migrates the database and serves
//! the REST API until SIGINT/SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use room_booking::application::BookingService;
use room_booking::config::Environment;
use room_booking::infrastructure::crypto::jwt::JwtConfig;
use room_booking::infrastructure::database::migrator::Migrator;
use room_booking::infrastructure::SeaOrmBookingRepository;
use room_booking::interfaces::http::modules::metrics::install_recorder;
use room_booking::shared::errors::InfraError;
use room_booking::shared::logging::init_tracing;
use room_booking::shared::shutdown::ShutdownCoordinator;
use room_booking::{create_api_router, default_config_path, init_database, AppConfig, DatabaseConfig};

#[derive(Debug, Parser)]
#[command(name = "room-booking", version, about = "Room booking REST API")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "BOOKING_CONFIG")]
    config: Option<PathBuf>,

    /// Runtime environment (development, test, production)
    #[arg(short, long)]
    env: Option<Environment>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let (mut app_cfg, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    app_cfg.apply_env_overrides();
    if let Some(env) = cli.env {
        app_cfg.environment = env;
    }
    if let Some(port) = cli.port {
        app_cfg.server.port = port;
    }

    init_tracing(&app_cfg.logging);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => warn!(
            "Could not load {}: {}. Using defaults.",
            config_path.display(),
            e
        ),
    }

    if let Err(problem) = app_cfg.validate() {
        error!("Invalid configuration: {}", problem);
        return Err(problem.into());
    }

    info!(
        environment = app_cfg.environment.as_str(),
        "Starting room booking service"
    );

    // ── Metrics ────────────────────────────────────────────────
    let prometheus_handle = match install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Metrics disabled: {}", e);
            None
        }
    };

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig::from(&app_cfg.database);
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(InfraError::from(e).into());
    }
    info!("Migrations completed");

    let repo = Arc::new(SeaOrmBookingRepository::new(
        db.clone(),
        app_cfg.database.query_timeout(),
    ));
    let service = Arc::new(BookingService::new(repo));

    let jwt_config = JwtConfig::from(&app_cfg.security);
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Shutdown ───────────────────────────────────────────────
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();
    shutdown.start_signal_listener();

    // ── HTTP server ────────────────────────────────────────────
    let router = create_api_router(service, jwt_config, prometheus_handle);

    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    let api_shutdown = shutdown_signal.clone();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        api_shutdown.wait().await;
        info!("REST API received shutdown signal");
    });

    let mut server_task = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut server_task => {
            match result {
                Ok(Ok(())) => info!("REST API stopped"),
                Ok(Err(e)) => error!("REST API error: {}", e),
                Err(e) => error!("REST API task panicked: {}", e),
            }
        }
        _ = shutdown_signal.wait() => {
            let grace = Duration::from_secs(shutdown.timeout_secs());
            if tokio::time::timeout(grace, &mut server_task).await.is_err() {
                warn!(
                    "In-flight requests still running after {}s, aborting",
                    grace.as_secs()
                );
                server_task.abort();
            }
        }
    }

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Room booking service shutdown complete");
    Ok(())
}
