use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use portfolio_edge::config::loader::load_from_env;
use portfolio_edge::config::watcher;
use portfolio_edge::lifecycle::shutdown::drain_within;
use portfolio_edge::lifecycle::{signals, startup, Shutdown};
use portfolio_edge::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("PORTFOLIO_CONFIG").ok().map(PathBuf::from);
    let config = load_from_env(config_path.as_deref())?;

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "portfolio-edge starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_domain = ?config.domain.base_domain,
        site_url = ?config.domain.site_url,
        local_development = config.domain.local_development,
        request_timeout_secs = config.timeouts.request_secs,
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

    // Hot reload only applies when a config file is in use. The watch must
    // stay alive for as long as the server runs.
    let (update_tx, config_updates) = mpsc::unbounded_channel();
    let _watch = config_path.as_deref().and_then(|path| {
        watcher::watch(path, update_tx)
            .inspect_err(|e| tracing::warn!(error = %e, "Config watcher unavailable, hot reload disabled"))
            .ok()
    });

    let grace = Duration::from_secs(config.timeouts.shutdown_grace_secs);
    let (server, listener) = startup::start(config).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let mut server_task = tokio::spawn(server.run(listener, config_updates, shutdown.subscribe()));

    tokio::select! {
        result = &mut server_task => {
            result??;
            return Ok(());
        }
        _ = signals::shutdown_on_signal(&shutdown) => {}
    }

    match drain_within(server_task, grace).await {
        Some(result) => result??,
        None => tracing::warn!("Forcing exit with connections still open"),
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
