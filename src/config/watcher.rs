//! Configuration file watcher for hot reload.
//!
//! Only the backend origin and the outbound timeouts can change at runtime;
//! they are what the backend client is built from. Edits to any other
//! section are logged and take effect on the next restart.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::GatewayConfig;

/// Decides which reloaded configurations are worth forwarding.
///
/// Editors often emit several events per save; a file that parses to the
/// same backend settings as last time is dropped.
#[derive(Debug)]
pub struct ReloadFilter {
    current: GatewayConfig,
}

impl ReloadFilter {
    pub fn new(current: GatewayConfig) -> Self {
        Self { current }
    }

    /// Returns the config to apply, or `None` when nothing reloadable changed.
    pub fn accept(&mut self, next: GatewayConfig) -> Option<GatewayConfig> {
        let previous = &self.current;
        let restart_only = [
            ("listener", previous.listener != next.listener),
            ("observability", previous.observability != next.observability),
            ("security", previous.security != next.security),
        ];
        for (section, changed) in restart_only {
            if changed {
                tracing::warn!(section, "Config section changed; restart to apply");
            }
        }

        let reloadable =
            previous.backend != next.backend || previous.timeouts != next.timeouts;
        self.current = next;
        reloadable.then(|| self.current.clone())
    }
}

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    filter: ReloadFilter,
    update_tx: mpsc::UnboundedSender<GatewayConfig>,
}

impl ConfigWatcher {
    /// Watch `path`, starting from the configuration already in use.
    ///
    /// Returns the watcher and a receiver for backend-relevant updates.
    pub fn new(
        path: &Path,
        current: GatewayConfig,
    ) -> (Self, mpsc::UnboundedReceiver<GatewayConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            filter: ReloadFilter::new(current),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as updates are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            mut filter,
            update_tx,
        } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = %e, "Config watch error");
                        return;
                    }
                };
                if !(event.kind.is_modify() || event.kind.is_create()) {
                    return;
                }

                let next = match load_config(&path) {
                    Ok(next) => next,
                    Err(e) => {
                        tracing::error!(error = %e, "Invalid config on disk, keeping current");
                        return;
                    }
                };

                if let Some(update) = filter.accept(next) {
                    tracing::info!(backend = %update.backend.base_url, "Backend settings changed");
                    let _ = update_tx.send(update);
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&watched, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?watched, "Config watcher started");
        Ok(watcher)
    }
}
