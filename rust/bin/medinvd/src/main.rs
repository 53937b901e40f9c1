//! `medinvd`: the medical device inventory server binary.
//!
//! Usage:
//!   medinvd [-c <name-or-path>] [--listen <addr>] [--data-dir <dir>] [--storage file|memory]
//!
//! A config name resolves to `/etc/medinv/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.
//! Without `-c`, built-in defaults apply.

mod bootstrap;
mod config;
mod routes;

use clap::Parser;
use medinv_core::{Module, StorageBackend};
use tracing::info;

use config::ServerConfig;
use inventory::InventoryModule;
use inventory::service::InventoryService;

/// Medical device inventory server.
#[derive(Parser, Debug)]
#[command(name = "medinvd", about = "Medical device inventory server", version)]
struct Cli {
    /// Config name or path to config file.
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// Listen address (overrides the config file).
    #[arg(long = "listen")]
    listen: Option<String>,

    /// Data directory (overrides the config file).
    #[arg(long = "data-dir")]
    data_dir: Option<String>,

    /// Record storage backend: file or memory (overrides the config file).
    #[arg(long = "storage")]
    storage: Option<StorageBackend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let mut server_config = match &cli.config {
        Some(name) => {
            let config_path = ServerConfig::resolve_path(name);
            info!("Loading configuration from {}", config_path.display());
            ServerConfig::load(&config_path)?
        }
        None => {
            info!("No configuration file given, using defaults");
            ServerConfig::default()
        }
    };
    server_config.apply_overrides(cli.listen, cli.data_dir, cli.storage);
    server_config.verify()?;

    let core_config = server_config.service_config();
    info!("Storage backend: {}", core_config.backend);

    // Initialize storage.
    let (doc, blob) = bootstrap::open_storage(&core_config)?;

    let inventory_module = InventoryModule::new(
        InventoryService::new(doc, blob),
        core_config.max_upload_bytes,
    );
    info!("Inventory module initialized");

    let module_routes = vec![(inventory_module.name(), inventory_module.routes())];

    // Build router.
    let app = routes::build_router(module_routes);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    info!("Medical device inventory listening on {}", core_config.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
