//! Routing table watcher for hot reload.
//!
//! notify calls back on its own thread. Each write or create event reloads
//! the file and, when the new table validates, forwards it to the async side
//! over an unbounded channel. The router is never touched from here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::config::loader::load_routing_config;
use crate::config::schema::RoutingConfiguration;
use crate::observability::metrics;

/// Watches one routing table file.
pub struct ConfigWatcher {
    path: PathBuf,
    poll_interval: Duration,
    tables: UnboundedSender<RoutingConfiguration>,
}

/// What a filesystem event led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Not a write or create; nothing was read.
    Ignored,
    /// A valid table was sent to the receiver.
    Forwarded,
    /// The file did not load or validate; the running table stays.
    Rejected,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end for validated tables.
    pub fn new(path: &Path, poll_interval: Duration) -> (Self, UnboundedReceiver<RoutingConfiguration>) {
        let (tables, receiver) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            poll_interval,
            tables,
        };
        (watcher, receiver)
    }

    /// Start watching. Events stop once the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            poll_interval,
            tables,
        } = self;

        let handler_path = path.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    reload_on_change(&handler_path, &event, &tables);
                }
                Err(e) => tracing::error!(error = %e, "Routing table watch error"),
            },
            Config::default().with_poll_interval(poll_interval),
        )?;
        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), "Watching routing table");
        Ok(watcher)
    }
}

/// Reloads `path` if `event` wrote to it and forwards a valid table.
pub fn reload_on_change(
    path: &Path,
    event: &Event,
    tables: &UnboundedSender<RoutingConfiguration>,
) -> ReloadOutcome {
    if !(event.kind.is_modify() || event.kind.is_create()) {
        return ReloadOutcome::Ignored;
    }

    tracing::info!(path = %path.display(), "Routing table changed on disk");
    match load_routing_config(path) {
        Ok(table) => {
            if tables.send(table).is_err() {
                tracing::warn!("Reload task is gone, dropping new routing table");
            }
            ReloadOutcome::Forwarded
        }
        Err(e) => {
            metrics::record_reload(false);
            tracing::error!(error = %e, "Changed routing table rejected, keeping current one");
            ReloadOutcome::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, EventKind, ModifyKind};

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("redirect-router-watch-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    const TABLE: &str = r#"{
        "version": "3.0",
        "groups": [{ "name": "G", "routings": [{ "name": "r", "redirectTarget": "https://x/g" }] }]
    }"#;

    #[test]
    fn test_modify_forwards_valid_table() {
        let path = temp_file("valid.json", TABLE);
        let (watcher, mut rx) = ConfigWatcher::new(&path, Duration::from_secs(1));
        let event = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(path.clone());

        assert_eq!(reload_on_change(&path, &event, &watcher.tables), ReloadOutcome::Forwarded);
        assert_eq!(rx.try_recv().unwrap().version, "3.0");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_create_counts_as_change() {
        let path = temp_file("created.json", TABLE);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let event = Event::new(EventKind::Create(CreateKind::File));

        assert_eq!(reload_on_change(&path, &event, &tx), ReloadOutcome::Forwarded);
        assert!(rx.try_recv().is_ok());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_edit_is_not_forwarded() {
        let path = temp_file("broken.json", r#"{ "version": "1.0", "groups": [] }"#);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let event = Event::new(EventKind::Modify(ModifyKind::Any));

        assert_eq!(reload_on_change(&path, &event, &tx), ReloadOutcome::Rejected);
        assert!(rx.try_recv().is_err());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_access_event_is_ignored() {
        let path = std::env::temp_dir().join("redirect-router-watch-never-written.json");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let event = Event::new(EventKind::Access(AccessKind::Any));

        assert_eq!(reload_on_change(&path, &event, &tx), ReloadOutcome::Ignored);
        assert!(rx.try_recv().is_err());
    }
}
