//! Hot reload of the config file.
//!
//! A reload goes through [`load_from_env`], so environment overrides and
//! validation apply exactly as they did at startup. Rejected files are
//! logged and never reach the server.

use std::path::Path;
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::UnboundedSender;

use crate::config::loader::{load_from_env, ConfigError};
use crate::config::schema::PortfolioConfig;

const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Live file watch. Reloads stop when this is dropped.
pub struct ConfigWatch {
    _watcher: RecommendedWatcher,
}

/// Watch `path` and send every valid reloaded config to `updates`.
pub fn watch(
    path: &Path,
    updates: UnboundedSender<PortfolioConfig>,
) -> Result<ConfigWatch, notify::Error> {
    let watched = path.to_path_buf();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| on_event(&watched, &updates, res),
        Config::default().with_poll_interval(POLL_INTERVAL),
    )?;
    watcher.watch(path, RecursiveMode::NonRecursive)?;

    tracing::info!(path = %path.display(), "Watching config file");
    Ok(ConfigWatch { _watcher: watcher })
}

/// Writes and re-creates (editors that save by rename) trigger a reload.
pub fn is_reload_event(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Modify(_) | EventKind::Create(_))
}

pub fn reload(path: &Path) -> Result<PortfolioConfig, ConfigError> {
    load_from_env(Some(path))
}

fn on_event(
    path: &Path,
    updates: &UnboundedSender<PortfolioConfig>,
    res: notify::Result<Event>,
) {
    let event = match res {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(error = %e, "Config watch error");
            return;
        }
    };
    if !is_reload_event(&event.kind) {
        return;
    }

    match reload(path) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "Config file reloaded");
            if updates.send(config).is_err() {
                tracing::debug!("Config update receiver closed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Config reload failed, keeping current configuration");
        }
    }
}
