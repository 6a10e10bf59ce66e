//! menon-admin - catalog administration service
//!
//! Manages the products and offers collections of a hosted record store and
//! notifies a webhook when a product is created.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use menon_common::config::{ensure_directory_exists, resolve_root_folder};
use menon_common::store::{Catalog, MemoryStore, RecordStore, RestStore};
use menon_common::webhook::WebhookNotifier;
use menon_admin::prefs::PreferencesStore;
use menon_admin::startup::load_config_logged;
use menon_admin::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for menon-admin
#[derive(Parser, Debug)]
#[command(name = "menon-admin")]
#[command(about = "Product and offer administration service")]
#[command(version)]
struct Args {
    /// TOML config file (default: ~/.config/menon/config.toml)
    #[arg(short, long, env = "MENON_CONFIG")]
    config: Option<PathBuf>,

    /// Folder for local state such as preferences
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, env = "MENON_BIND")]
    bind: Option<String>,

    /// Keep records in memory instead of the remote store
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config_logged(args.config.as_deref())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting menon-admin v{}", env!("CARGO_PKG_VERSION"));

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &config);
    ensure_directory_exists(&root_folder).context("Failed to create root folder")?;
    info!("Root folder: {}", root_folder.display());

    let store: Arc<dyn RecordStore> = if args.memory {
        warn!("Using in-memory store, records are lost on exit");
        Arc::new(
            MemoryStore::new()
                .with_primary_key(&config.store.products_table, "product_id")
                .with_identity(&config.store.offers_table, "id"),
        )
    } else {
        let credentials = config.store.resolve_credentials()?;
        info!("Remote store: {}", credentials.url);
        Arc::new(RestStore::new(&credentials).context("Failed to build store client")?)
    };
    let catalog = Catalog::new(store, &config.store);

    let webhook_url = config.webhook.resolve_url();
    if webhook_url.is_none() {
        info!("No webhook URL configured, new-product notifications disabled");
    }
    let webhook = WebhookNotifier::new(webhook_url, Duration::from_secs(config.webhook.timeout_secs))
        .context("Failed to build webhook client")?;

    let preferences = PreferencesStore::load(&root_folder);

    let app = build_router(AppState::new(catalog, webhook, preferences));

    let bind = args.bind.unwrap_or(config.server.bind);
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind to {}", bind))?;
    info!("menon-admin listening on http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
