//! Redirect service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request    ┌─────────┐    ┌────────────────┐    ┌──────────────┐
//!     ─────────────────▶│  http   │───▶│ RedirectRouter │───▶│   engine     │
//!                       │ server  │    │ (ArcSwap table)│    │ group→routing│
//!     302 / 404 / 503   └─────────┘    └───────▲────────┘    └──────────────┘
//!     ◀─────────────────                       │
//!                            ┌─────────────────┴──────────────┐
//!                            │ config loader + validation     │
//!                            │ watcher (file) / SIGHUP reload │
//!                            └────────────────────────────────┘
//! ```

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use redirect_router::config::watcher::ConfigWatcher;
use redirect_router::config::{load_routing_config, load_settings, RoutingConfiguration, ServiceSettings};
use redirect_router::http::HttpServer;
use redirect_router::lifecycle::{spawn_signal_handler, Shutdown, ShutdownListener};
use redirect_router::observability::{logging, metrics};
use redirect_router::routing::RedirectRouter;

#[derive(Parser)]
#[command(name = "redirect-router")]
#[command(about = "Resolve request URLs to redirect targets from a routing table", version)]
struct Cli {
    /// Service settings file (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve redirects over HTTP
    Serve {
        /// Routing table file, overrides the settings file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Bind address, overrides the settings file
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Validate a routing table and print a summary
    Check { config: PathBuf },
    /// Resolve one URL against a routing table
    Resolve { config: PathBuf, url: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => load_settings(path)?,
        None => ServiceSettings::default(),
    };
    logging::init_logging(&settings.observability);

    match cli.command {
        Commands::Serve { config, bind } => {
            if let Some(config) = config {
                settings.routing.config_path = config;
            }
            if let Some(bind) = bind {
                settings.listener.bind_address = bind;
            }
            serve(settings).await
        }
        Commands::Check { config } => check(&config),
        Commands::Resolve { config, url } => resolve_once(&config, &url),
    }
}

async fn serve(settings: ServiceSettings) -> Result<(), Box<dyn Error>> {
    tracing::info!("redirect-router v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = settings.routing.config_path.clone();
    let router = Arc::new(RedirectRouter::new());
    router.initialize_with(load_routing_config(&config_path)?)?;

    if settings.observability.metrics_enabled {
        match settings.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %settings.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let (reload_tx, reload_rx) = mpsc::unbounded_channel();
    spawn_signal_handler(shutdown.clone(), reload_tx);

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, updates) = if settings.routing.watch {
        let (watcher, updates) = ConfigWatcher::new(
            &config_path,
            Duration::from_secs(settings.routing.watch_interval_secs),
        );
        (Some(watcher.run()?), updates)
    } else {
        (None, mpsc::unbounded_channel().1)
    };

    spawn_reload_task(
        router.clone(),
        config_path,
        updates,
        reload_rx,
        shutdown.subscribe(),
    );

    let listener = TcpListener::bind(&settings.listener.bind_address).await?;
    let server = HttpServer::new(router, &settings.listener)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Apply tables from the file watcher and reload from disk on SIGHUP.
fn spawn_reload_task(
    router: Arc<RedirectRouter>,
    config_path: PathBuf,
    mut updates: mpsc::UnboundedReceiver<RoutingConfiguration>,
    mut reload_requests: mpsc::UnboundedReceiver<()>,
    mut shutdown: ShutdownListener,
) {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(config) = updates.recv() => {
                    let _ = router.initialize_with(config);
                }
                Some(()) = reload_requests.recv() => {
                    match load_routing_config(&config_path) {
                        Ok(config) => {
                            let _ = router.initialize_with(config);
                        }
                        Err(e) => {
                            metrics::record_reload(false);
                            tracing::error!(error = %e, "Reload failed, keeping current routing table");
                        }
                    }
                }
                _ = shutdown.wait() => break,
            }
        }
    });
}

fn check(path: &Path) -> Result<(), Box<dyn Error>> {
    let config = load_routing_config(path)?;

    println!("{}: valid (version {})", path.display(), config.version);
    for group in &config.groups {
        println!("  {} ({} routings)", group.name, group.routings.len());
    }
    Ok(())
}

fn resolve_once(path: &Path, url: &str) -> Result<(), Box<dyn Error>> {
    let router = RedirectRouter::new();
    router.initialize_with(load_routing_config(path)?)?;

    match router.resolve_match(url) {
        Ok(found) => {
            println!("{}", found.target_url);
            tracing::debug!(group = %found.group_name, routing = %found.routing_name, "Resolved");
            Ok(())
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
