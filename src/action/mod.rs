//! Dispatch of key-press actions to Talon's REPL.
//!
//! An action is the text of a REPL command configured on a key (for example
//! `actions.speech.toggle()`). Dispatch runs as its own task so a slow REPL
//! never stalls the host connection; the task's [`ActionOutcome`] can be
//! awaited or ignored.

pub mod mock;
mod repl;

pub use repl::ReplSink;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{BridgeError, Result};

/// Default bound on a single action run.
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Destination for key-press actions.
#[async_trait]
pub trait ActionSink: Send + Sync {
    /// Deliver `action` and wait until the sink has finished with it.
    ///
    /// Returns the interpreter's exit code when one is available.
    async fn execute(&self, action: &str) -> Result<Option<i32>>;
}

/// Observable result of one dispatched action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Completed { exit_code: Option<i32> },
    Failed { reason: String },
    TimedOut,
}

impl ActionOutcome {
    /// True if the sink accepted and finished the action.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Runs actions on a sink with a bounded timeout.
#[derive(Clone)]
pub struct ActionDispatcher {
    sink: Arc<dyn ActionSink>,
    timeout: Duration,
}

impl ActionDispatcher {
    #[must_use]
    pub fn new(sink: Arc<dyn ActionSink>, timeout: Duration) -> Self {
        Self { sink, timeout }
    }

    /// Configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `action` to completion (or timeout) on the current task.
    pub async fn run(&self, action: &str) -> ActionOutcome {
        debug!(action, "Dispatching action");
        let outcome = match tokio::time::timeout(self.timeout, self.sink.execute(action)).await {
            Ok(Ok(exit_code)) => ActionOutcome::Completed { exit_code },
            Ok(Err(e)) => ActionOutcome::Failed {
                reason: e.to_string(),
            },
            Err(_) => ActionOutcome::TimedOut,
        };

        match &outcome {
            ActionOutcome::Completed { exit_code } => {
                info!(action, ?exit_code, "Action delivered");
            }
            ActionOutcome::Failed { reason } => {
                warn!(action, reason = %reason, "Action failed");
            }
            ActionOutcome::TimedOut => {
                let err = BridgeError::ActionTimeout {
                    millis: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                };
                warn!(action, error = %err, "Action abandoned");
            }
        }
        outcome
    }

    /// Spawn `action` as a background task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(&self, action: impl Into<String>) -> JoinHandle<ActionOutcome> {
        let action = action.into();
        let dispatcher = self.clone();
        tokio::spawn(async move { dispatcher.run(&action).await })
    }
}
