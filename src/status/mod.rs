//! Talon status snapshot.
//!
//! Talon writes a small text file describing which modes, tags and apps are
//! currently active. This module holds the parsed form of that file and the
//! rules for reading it.

mod parse;

pub use parse::{parse_line, Entry, EntryKind, TERMINATOR};

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{BridgeError, Result, StatusParseError};

/// Default name of the status file Talon writes.
pub const STATUS_FILE_NAME: &str = "talon-status";

/// Active Talon state as last read from the status file.
///
/// Only membership matters; the sets are ordered so that printed snapshots
/// are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    /// Active modes (e.g. "command", "sleep", "dictation").
    pub modes: BTreeSet<String>,
    /// Active tags.
    pub tags: BTreeSet<String>,
    /// Active apps.
    pub apps: BTreeSet<String>,
}

impl StatusSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the full contents of a status file.
    ///
    /// Parsing is all-or-nothing: a single bad line rejects the whole input.
    pub fn parse(content: &str) -> std::result::Result<Self, StatusParseError> {
        let mut lines: Vec<&str> = content.lines().collect();

        match lines.last() {
            None => return Err(StatusParseError::Empty),
            Some(&last) if last != TERMINATOR => {
                return Err(StatusParseError::Unterminated {
                    last_line: last.to_string(),
                });
            }
            Some(_) => {}
        }
        lines.pop();

        let mut snapshot = Self::new();
        for (idx, line) in lines.into_iter().enumerate() {
            let entry = parse_line(idx + 1, line)?;
            trace!(kind = ?entry.kind, value = %entry.value, "Parsed status entry");
            snapshot.insert(entry);
        }

        Ok(snapshot)
    }

    /// Read and parse the status file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Reading status file");
        let content =
            std::fs::read_to_string(path).map_err(|e| BridgeError::StatusUnreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::parse(&content)?)
    }

    /// Add a parsed entry to the matching set.
    pub fn insert(&mut self, entry: Entry) {
        let set = match entry.kind {
            EntryKind::Mode => &mut self.modes,
            EntryKind::Tag => &mut self.tags,
            EntryKind::App => &mut self.apps,
        };
        set.insert(entry.value);
    }

    /// Check whether `value` is active for the given entry kind.
    #[must_use]
    pub fn contains(&self, kind: EntryKind, value: &str) -> bool {
        match kind {
            EntryKind::Mode => self.modes.contains(value),
            EntryKind::Tag => self.tags.contains(value),
            EntryKind::App => self.apps.contains(value),
        }
    }

    /// Drop all active state.
    pub fn clear(&mut self) {
        self.modes.clear();
        self.tags.clear();
        self.apps.clear();
    }

    /// True if nothing is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty() && self.tags.is_empty() && self.apps.is_empty()
    }

    /// Summary counts for reporting.
    #[must_use]
    pub fn summary(&self) -> SnapshotSummary {
        SnapshotSummary {
            modes: self.modes.len(),
            tags: self.tags.len(),
            apps: self.apps.len(),
        }
    }
}

/// Entry counts of a snapshot, for log lines and robot output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapshotSummary {
    pub modes: usize,
    pub tags: usize,
    pub apps: usize,
}
