//! The status store and key reconciler.
//!
//! [`Bridge`] owns the last parsed [`StatusSnapshot`] and the table of
//! visible keys behind a single mutex. Every change to either ends with the
//! visible keys being re-rendered on the [`Surface`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::action::{ActionDispatcher, ActionOutcome};
use crate::error::Result;
use crate::keys::{KeyDisplay, KeyInfo, TitleTarget};
use crate::status::{SnapshotSummary, StatusSnapshot};
use crate::surface::SharedSurface;

/// State guarded by the bridge lock.
#[derive(Debug, Default)]
struct BridgeState {
    snapshot: StatusSnapshot,
    keys: HashMap<String, KeyInfo>,
}

/// Status store plus key reconciler. Public methods are thread-safe.
pub struct Bridge {
    status_path: PathBuf,
    surface: SharedSurface,
    dispatcher: ActionDispatcher,
    state: Mutex<BridgeState>,
}

impl Bridge {
    #[must_use]
    pub fn new(
        status_path: impl Into<PathBuf>,
        surface: SharedSurface,
        dispatcher: ActionDispatcher,
    ) -> Self {
        Self {
            status_path: status_path.into(),
            surface,
            dispatcher,
            state: Mutex::new(BridgeState::default()),
        }
    }

    /// Path of the status file this bridge reads.
    #[must_use]
    pub fn status_path(&self) -> &Path {
        &self.status_path
    }

    fn lock(&self) -> MutexGuard<'_, BridgeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // === Status Store ===

    /// Re-read the status file and push the result to every visible key.
    ///
    /// On any read or parse failure the snapshot is cleared (never partially
    /// applied) and the error is returned for reporting only.
    pub fn reload(&self) -> Result<SnapshotSummary> {
        match StatusSnapshot::load(&self.status_path) {
            Ok(snapshot) => {
                let summary = snapshot.summary();
                let mut state = self.lock();
                state.snapshot = snapshot;
                self.reconcile_locked(&state);
                drop(state);
                info!(
                    modes = summary.modes,
                    tags = summary.tags,
                    apps = summary.apps,
                    "Status file read"
                );
                Ok(summary)
            }
            Err(e) => {
                warn!(path = %self.status_path.display(), error = %e, "Clearing status");
                self.clear();
                Err(e)
            }
        }
    }

    /// Drop all active status and re-render keys in their fallback state.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.snapshot.clear();
        self.reconcile_locked(&state);
        debug!("Status cleared");
    }

    /// Copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        self.lock().snapshot.clone()
    }

    // === Key table ===

    /// A key became visible. Replaces any previous record for `context`.
    pub fn key_appeared(&self, context: &str, key: KeyInfo) {
        debug!(context, watch = ?key.watch, value = %key.watch_value, "Key appeared");
        let mut state = self.lock();
        state.keys.insert(context.to_string(), key);
        self.reconcile_locked(&state);
    }

    /// A key is no longer visible.
    pub fn key_disappeared(&self, context: &str) {
        let mut state = self.lock();
        if state.keys.remove(context).is_some() {
            debug!(context, "Key disappeared");
        }
        self.reconcile_locked(&state);
    }

    /// Record for a visible key.
    #[must_use]
    pub fn key(&self, context: &str) -> Option<KeyInfo> {
        self.lock().keys.get(context).cloned()
    }

    /// Number of visible keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.lock().keys.len()
    }

    /// A key was released. Dispatches its press action, if it has one.
    ///
    /// Unknown contexts and keys without an action are ignored. Must be
    /// called from within a Tokio runtime.
    pub fn key_released(&self, context: &str) -> Option<JoinHandle<ActionOutcome>> {
        let action = {
            let state = self.lock();
            state.keys.get(context)?.action()?.to_string()
        };
        Some(self.dispatcher.dispatch(action))
    }

    // === Key Reconciler ===

    /// Re-render every visible key from the current snapshot.
    pub fn reconcile(&self) {
        let state = self.lock();
        self.reconcile_locked(&state);
    }

    fn reconcile_locked(&self, state: &BridgeState) {
        if state.keys.is_empty() || !self.surface.is_connected() {
            return;
        }

        for (context, key) in &state.keys {
            let rendered = KeyDisplay::for_key(key, &state.snapshot);
            trace!(context, ?rendered, "Rendering key");

            if let Some(display_state) = rendered.state {
                if let Err(e) = self.surface.set_state(context, display_state) {
                    warn!(context, error = %e, "Failed to set key state");
                }
            }
            if let Some(title) = rendered.title {
                if let Err(e) = self
                    .surface
                    .set_title(context, title, TitleTarget::HardwareAndSoftware)
                {
                    warn!(context, error = %e, "Failed to set key title");
                }
            }
        }
    }
}
