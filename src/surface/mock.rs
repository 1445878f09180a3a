//! Mock surface for unit testing.
//!
//! Records every state and title update so tests can assert on exactly what
//! the bridge asked the host to render.
//!
//! # Example
//!
//! ```rust,ignore
//! use talon_deck::surface::mock::{MockSurface, SurfaceOp};
//!
//! let surface = MockSurface::new();
//! // ... drive a Bridge built on `surface` ...
//! surface.assert_operations(&[SurfaceOp::SetState {
//!     context: "ctx".to_string(),
//!     state: DisplayState::Active,
//! }]);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::trace;

use super::Surface;
use crate::error::{BridgeError, Result};
use crate::keys::{DisplayState, TitleTarget};

/// Recorded surface call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceOp {
    SetState {
        context: String,
        state: DisplayState,
    },
    SetTitle {
        context: String,
        title: String,
        target: TitleTarget,
    },
}

impl SurfaceOp {
    /// Context the operation was addressed to.
    #[must_use]
    pub fn context(&self) -> &str {
        match self {
            Self::SetState { context, .. } | Self::SetTitle { context, .. } => context,
        }
    }
}

/// Mock surface for tests without a Stream Deck application.
pub struct MockSurface {
    connected: AtomicBool,
    operation_log: Mutex<Vec<SurfaceOp>>,
    failing_contexts: Mutex<Vec<String>>,
}

impl Default for MockSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSurface {
    /// Create a connected mock surface.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            operation_log: Mutex::new(Vec::new()),
            failing_contexts: Mutex::new(Vec::new()),
        }
    }

    /// Create a connected mock surface wrapped in an `Arc`.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Set the surface as disconnected.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Set the surface as connected.
    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    /// Make every update addressed to `context` fail.
    pub fn fail_context(&self, context: &str) {
        self.failing_contexts
            .lock()
            .unwrap()
            .push(context.to_string());
    }

    // === Assertions ===

    /// Get all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<SurfaceOp> {
        self.operation_log.lock().unwrap().clone()
    }

    /// Operations addressed to a single context, in order.
    #[must_use]
    pub fn operations_for(&self, context: &str) -> Vec<SurfaceOp> {
        self.operations()
            .into_iter()
            .filter(|op| op.context() == context)
            .collect()
    }

    fn states(&self) -> HashMap<String, DisplayState> {
        let mut states = HashMap::new();
        for op in self.operations() {
            if let SurfaceOp::SetState { context, state } = op {
                states.insert(context, state);
            }
        }
        states
    }

    /// Last state set for a context.
    #[must_use]
    pub fn state_of(&self, context: &str) -> Option<DisplayState> {
        self.states().get(context).copied()
    }

    /// Last title set for a context.
    #[must_use]
    pub fn title_of(&self, context: &str) -> Option<String> {
        self.operations_for(context)
            .into_iter()
            .rev()
            .find_map(|op| match op {
                SurfaceOp::SetTitle { title, .. } => Some(title),
                SurfaceOp::SetState { .. } => None,
            })
    }

    /// Assert specific operations were performed.
    ///
    /// # Panics
    ///
    /// Panics if the operations don't match.
    pub fn assert_operations(&self, expected: &[SurfaceOp]) {
        let actual = self.operations();
        assert_eq!(
            actual, expected,
            "Operation mismatch.\nExpected: {expected:#?}\nActual: {actual:#?}",
        );
    }

    /// Assert no operations were performed.
    ///
    /// # Panics
    ///
    /// Panics if any operations were recorded.
    pub fn assert_no_operations(&self) {
        let ops = self.operations();
        assert!(ops.is_empty(), "Expected no operations, but found: {ops:#?}");
    }

    /// Clear the operation log for fresh assertions.
    pub fn clear_operations(&self) {
        self.operation_log.lock().unwrap().clear();
    }

    // === Internal Helpers ===

    fn record_op(&self, op: SurfaceOp) -> Result<()> {
        trace!(?op, "Recording surface operation");
        if self
            .failing_contexts
            .lock()
            .unwrap()
            .iter()
            .any(|c| c == op.context())
        {
            return Err(BridgeError::HostProtocol(format!(
                "Mock context {} configured to fail",
                op.context()
            )));
        }
        self.operation_log.lock().unwrap().push(op);
        Ok(())
    }
}

impl Surface for MockSurface {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn set_state(&self, context: &str, state: DisplayState) -> Result<()> {
        self.record_op(SurfaceOp::SetState {
            context: context.to_string(),
            state,
        })
    }

    fn set_title(&self, context: &str, title: &str, target: TitleTarget) -> Result<()> {
        self.record_op(SurfaceOp::SetTitle {
            context: context.to_string(),
            title: title.to_string(),
            target,
        })
    }
}
