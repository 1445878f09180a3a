//! Status file watcher.
//!
//! Watches the directory that holds the status file (Talon replaces the file
//! rather than editing it in place, so watching the file itself would lose
//! track of it) and reports changes to that one file name.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::{AccessKind, AccessMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, trace, warn};

use crate::bridge::Bridge;
use crate::config::is_status_path;
use crate::error::{BridgeError, Result};

/// Something the bridge should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// The status file was created, written, renamed or removed.
    Changed(PathBuf),
    /// The notification source failed; current status can't be trusted.
    Error(String),
}

/// Reduce a raw notification to a [`WatchEvent`], or `None` if it doesn't
/// concern the status file.
#[must_use]
pub fn classify(result: notify::Result<Event>, file_name: &str) -> Option<WatchEvent> {
    let event = match result {
        Ok(event) => event,
        Err(e) => return Some(WatchEvent::Error(e.to_string())),
    };

    // Our own reads show up as access events.
    if matches!(event.kind, EventKind::Access(kind) if kind != AccessKind::Close(AccessMode::Write))
    {
        return None;
    }

    event
        .paths
        .into_iter()
        .find(|path| is_status_path(path, file_name))
        .map(WatchEvent::Changed)
}

/// Running watcher. Dropping it stops notifications.
pub struct StatusWatcher {
    _watcher: RecommendedWatcher,
    dir: PathBuf,
}

impl StatusWatcher {
    /// Watch `status_path` and call `handler` for every relevant event.
    ///
    /// The handler runs on the notification thread.
    pub fn start<F>(status_path: &Path, handler: F) -> Result<Self>
    where
        F: Fn(WatchEvent) + Send + 'static,
    {
        let watch_error = |reason: String| BridgeError::WatchFailed {
            path: status_path.display().to_string(),
            reason,
        };
        let file_name = status_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| watch_error("no file name".to_string()))?;
        let dir = match status_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = notify::recommended_watcher(move |result| {
            trace!(?result, "File system event");
            if let Some(event) = classify(result, &file_name) {
                handler(event);
            }
        })
        .map_err(|e| watch_error(e.to_string()))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| watch_error(e.to_string()))?;
        debug!(dir = %dir.display(), "Watching status directory");

        Ok(Self {
            _watcher: watcher,
            dir,
        })
    }

    /// Watch the bridge's status file, reloading on change and clearing on
    /// watcher errors.
    pub fn for_bridge(bridge: Arc<Bridge>) -> Result<Self> {
        let status_path = bridge.status_path().to_path_buf();
        Self::start(&status_path, move |event| apply(&bridge, &event))
    }

    /// Directory being watched.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Apply a watch event to the bridge.
pub fn apply(bridge: &Bridge, event: &WatchEvent) {
    match event {
        WatchEvent::Changed(path) => {
            info!(path = %path.display(), "Talon status file modified");
            // Failures are logged and leave the snapshot cleared.
            let _ = bridge.reload();
        }
        WatchEvent::Error(reason) => {
            warn!(reason = %reason, "Status watcher error");
            bridge.clear();
        }
    }
}
