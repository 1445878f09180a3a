//! Plugin configuration.
//!
//! Settings come from an optional TOML file, then CLI flags/environment
//! override individual fields. Every field has a default matching a stock
//! Talon install, so no file is required.
//!
//! ```toml
//! status_dir = "/tmp"
//! status_file_name = "talon-status"
//! repl_path = "~/.talon/.venv/bin/repl"
//! repl_args = []
//! action_timeout_ms = 5000
//! ```

mod path;

pub use path::{expand_home, home_dir, is_status_path, status_dir};

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::action::ReplSink;
use crate::error::{BridgeError, Result};
use crate::status::STATUS_FILE_NAME;

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "talon-deck";
/// Config file name inside [`CONFIG_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Default location of Talon's REPL.
pub const DEFAULT_REPL_PATH: &str = "~/.talon/.venv/bin/repl";

/// Resolved plugin settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory containing the status file. Defaults to `$TMPDIR`.
    pub status_dir: Option<PathBuf>,
    /// Name of the status file.
    pub status_file_name: String,
    /// Interpreter that receives key-press actions.
    pub repl_path: PathBuf,
    /// Extra arguments for the interpreter.
    pub repl_args: Vec<String>,
    /// Upper bound on a single action run.
    pub action_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            status_dir: None,
            status_file_name: STATUS_FILE_NAME.to_string(),
            repl_path: PathBuf::from(DEFAULT_REPL_PATH),
            repl_args: Vec::new(),
            action_timeout_ms: 5_000,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Self =
            toml::from_str(content).map_err(|e| BridgeError::ConfigParse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from an explicit file. The file must exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(BridgeError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_toml(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(settings)
    }

    /// Load from `explicit` if given, else from the default location if a
    /// file exists there, else return defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let name = self.status_file_name.as_str();
        if name.is_empty() || name.contains('/') || name.contains('\\') {
            return Err(BridgeError::ConfigInvalid(format!(
                "status_file_name must be a bare file name, got {name:?}"
            )));
        }
        if self.action_timeout_ms == 0 {
            return Err(BridgeError::ConfigInvalid(
                "action_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Override the status file location from a full path.
    pub fn set_status_file(&mut self, path: &Path) -> Result<()> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                BridgeError::ConfigInvalid(format!(
                    "Status file path has no file name: {}",
                    path.display()
                ))
            })?;
        self.status_file_name = name.to_string();
        self.status_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => Some(dir.to_path_buf()),
            _ => Some(PathBuf::from(".")),
        };
        Ok(())
    }

    /// Full path of the status file.
    pub fn status_path(&self) -> Result<PathBuf> {
        let dir = match &self.status_dir {
            Some(dir) => expand_home(dir)?,
            None => status_dir(),
        };
        Ok(dir.join(&self.status_file_name))
    }

    /// REPL path with `~` expanded.
    pub fn repl_path(&self) -> Result<PathBuf> {
        expand_home(&self.repl_path)
    }

    /// Sink that pipes actions into the configured REPL.
    pub fn repl_sink(&self) -> Result<ReplSink> {
        Ok(ReplSink::new(self.repl_path()?).with_args(self.repl_args.iter().cloned()))
    }

    #[must_use]
    pub const fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }
}

/// `<config_dir>/talon-deck/config.toml`, if the platform has a config dir.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
