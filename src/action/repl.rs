//! Talon REPL subprocess sink.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, trace};

use super::ActionSink;
use crate::error::{BridgeError, Result};

/// Pipes each action into a fresh REPL process.
///
/// The REPL reads commands from stdin until EOF, so the action is written
/// verbatim and stdin is closed. Output is discarded. The child is killed if
/// the dispatching task is dropped (e.g. on timeout).
#[derive(Debug, Clone)]
pub struct ReplSink {
    program: PathBuf,
    args: Vec<String>,
}

impl ReplSink {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments passed to the interpreter before it reads stdin.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Path of the interpreter this sink launches.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn launch_error(&self, reason: impl ToString) -> BridgeError {
        BridgeError::ActionLaunch {
            program: self.program.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl ActionSink for ReplSink {
    async fn execute(&self, action: &str) -> Result<Option<i32>> {
        trace!(program = %self.program.display(), args = ?self.args, "Launching REPL");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.launch_error(e))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| self.launch_error("stdin not captured"))?;
        stdin
            .write_all(action.as_bytes())
            .await
            .map_err(|e| BridgeError::ActionPipe(format!("write failed: {e}")))?;
        stdin
            .shutdown()
            .await
            .map_err(|e| BridgeError::ActionPipe(format!("close failed: {e}")))?;
        drop(stdin);

        let status = child
            .wait()
            .await
            .map_err(|e| BridgeError::ActionPipe(format!("wait failed: {e}")))?;
        debug!(?status, "REPL exited");
        Ok(status.code())
    }
}
