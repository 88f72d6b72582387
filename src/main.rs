//! Sitemap-learning reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ timeout ─▶ seo middleware ─┬─▶ sitemap.xml (synthesized)
//!                                                                        ├─▶ robots.txt  (synthesized)
//!                                                                        └─▶ proxy_handler ─▶ Upstream
//!                                                                                │
//!     Client Response                                                           ▼
//!     ◀────────────── capture ◀── rewrite (HTML + analytics) ◀── record URL (200, not ignored)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use sitemap_proxy::config::{load_config, ProxyConfig};
use sitemap_proxy::lifecycle::{shutdown_signal, Shutdown};
use sitemap_proxy::observability::{logging, metrics};
use sitemap_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "sitemap-proxy")]
#[command(about = "Reverse proxy that learns a sitemap from live traffic", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(long)]
    bind: Option<String>,

    /// Override upstream.address.
    #[arg(long)]
    upstream: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(upstream) = cli.upstream {
        config.upstream.address = upstream;
    }

    logging::init_logging(&config.observability);

    tracing::info!("sitemap-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        sitemap_path = %config.sitemap.sitemap_path,
        robots_path = %config.sitemap.robots_path,
        ignore_patterns = config.sitemap.ignore.len(),
        analytics = config.sitemap.analytics_id().is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(config.clone())?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
