//! Recording action sink for tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use super::ActionSink;
use crate::error::{BridgeError, Result};

/// Sink that records every action instead of running it.
#[derive(Default)]
pub struct RecordingSink {
    actions: Mutex<Vec<String>>,
    delay: Option<Duration>,
    failure: Option<String>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink whose every execution fails with `reason`.
    #[must_use]
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    /// Sleep for `delay` after recording each action.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Actions received so far, in order.
    #[must_use]
    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActionSink for RecordingSink {
    async fn execute(&self, action: &str) -> Result<Option<i32>> {
        trace!(action, "Recording action");
        self.actions.lock().unwrap().push(action.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(reason) => Err(BridgeError::ActionLaunch {
                program: "mock".to_string(),
                reason: reason.clone(),
            }),
            None => Ok(Some(0)),
        }
    }
}
