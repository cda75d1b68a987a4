//! Route file watcher for hot reload.
//!
//! # Responsibilities
//! - Watch the directory holding the route file, so editors that replace
//!   the file (write to a temp file, then rename) are still seen
//! - Reload, validate and compile the table off the request path
//! - Hand only compiled routers to the server
//!
//! # Design Decisions
//! - A file that fails to parse, validate or compile is logged and dropped;
//!   the receiver never sees it and the live table stays in place

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{build_router, load_config, ConfigError};
use crate::routing::Router;

/// Watches a route file and publishes freshly compiled routers.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<Router>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiver of compiled route tables.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<Router>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. Keep the returned watcher alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = self.path.file_name().map(OsString::from);
        let tx = self.update_tx;
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    let touches_file = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(OsString::from) == file_name);
                    if !touches_file {
                        return;
                    }
                    match reload(&path) {
                        Ok(router) => {
                            tracing::info!(path = ?path, routes = router.len(), "Route file compiled");
                            let _ = tx.send(router);
                        }
                        Err(e) => {
                            tracing::error!(path = ?path, error = %e, "Route file rejected, keeping current table");
                        }
                    }
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Route file watcher started");
        Ok(watcher)
    }
}

/// Load and compile the route file at `path`.
pub fn reload(path: &Path) -> Result<Router, ConfigError> {
    let config = load_config(path)?;
    build_router(&config)
}
