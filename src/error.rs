//! Error types for the Talon status bridge.

use thiserror::Error;

/// Why a status file was rejected.
///
/// Any of these discards the whole file; the snapshot is cleared rather than
/// partially applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatusParseError {
    #[error("status file is empty")]
    Empty,

    #[error("status file not properly terminated, last line: {last_line:?}")]
    Unterminated { last_line: String },

    #[error("badly formatted line {line_no}: {line:?}")]
    BadLine { line_no: usize, line: String },

    #[error("unrecognized entry type {entry_type:?} on line {line_no}")]
    UnknownEntryType { line_no: usize, entry_type: String },
}

/// Primary error type for bridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    // Status file errors
    #[error("Unable to open status file '{path}': {reason}")]
    StatusUnreadable { path: String, reason: String },

    #[error("Malformed status file: {0}")]
    StatusMalformed(#[from] StatusParseError),

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    // Host (Stream Deck application) errors
    #[error("Failed to connect to Stream Deck on port {port}: {reason}")]
    HostConnect { port: u16, reason: String },

    #[error("Stream Deck connection closed")]
    HostDisconnected,

    #[error("Stream Deck protocol error: {0}")]
    HostProtocol(String),

    // Watcher errors
    #[error("Failed to watch '{path}': {reason}")]
    WatchFailed { path: String, reason: String },

    // Action errors
    #[error("Failed to launch '{program}': {reason}")]
    ActionLaunch { program: String, reason: String },

    #[error("Failed to deliver action to interpreter: {0}")]
    ActionPipe(String),

    #[error("Action timed out after {millis} ms")]
    ActionTimeout { millis: u64 },

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl BridgeError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::StatusUnreadable { .. }
                | Self::StatusMalformed(_)
                | Self::ConfigNotFound { .. }
                | Self::ConfigParse(_)
                | Self::ConfigInvalid(_)
                | Self::ActionLaunch { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::StatusUnreadable { .. } => {
                Some("Make sure Talon is running with the status-file script installed")
            }
            Self::StatusMalformed(_) => Some("The file may be mid-write; try again"),
            Self::ConfigNotFound { .. } => Some("Check --config or TALON_DECK_CONFIG"),
            Self::HostConnect { .. } => {
                Some("This binary is normally launched by the Stream Deck application")
            }
            Self::ActionLaunch { .. } => Some("Check --repl points at Talon's REPL"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using BridgeError.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| BridgeError::Other(format!("{}: {e}", f().into())))
    }
}
