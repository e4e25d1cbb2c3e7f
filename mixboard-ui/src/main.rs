//! mixboard-ui - playlist web service
//!
//! Serves the browser UI and JSON API for catalog browsing, account and
//! playlist management.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use mixboard_common::config::{self, ServiceConfig};
use mixboard_common::db::init_database;
use mixboard_ui::catalog::CatalogClient;
use mixboard_ui::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "mixboard-ui", about = "Mixboard playlist web service")]
struct Args {
    /// Root folder holding the database and mixboard.toml
    #[arg(long, env = "MIXBOARD_ROOT_FOLDER")]
    root_folder: Option<String>,

    /// Listen port (overrides the config file)
    #[arg(long, env = "MIXBOARD_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Mixboard (mixboard-ui) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root_folder =
        config::resolve_root_folder(args.root_folder.as_deref(), "MIXBOARD_ROOT_FOLDER");
    config::ensure_root_folder(&root_folder)?;
    info!("Root folder: {}", root_folder.display());

    let service_config = ServiceConfig::load(&root_folder)?;

    let db_path = config::database_path(&root_folder);
    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to database: {}", db_path.display());
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let catalog = CatalogClient::new(
        service_config.catalog.client_id.clone(),
        service_config.catalog.client_secret.clone(),
    )?;
    if catalog.is_configured() {
        info!("✓ Catalog credentials configured");
    } else {
        info!(
            "Catalog credentials not configured - search and recommendations disabled \
             (set MIXBOARD_CATALOG_CLIENT_ID / MIXBOARD_CATALOG_CLIENT_SECRET)"
        );
    }

    let state = AppState::new(pool, Arc::new(catalog));
    let app = build_router(state);

    let port = args.port.unwrap_or(service_config.server.port);
    let bind_addr = format!("{}:{}", service_config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("mixboard-ui listening on http://{}", bind_addr);
    info!("Health check: http://{}/api/health", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
