//! Line grammar of the status file.
//!
//! ```text
//! mode command
//! tag user.vscode
//! app Code
//! end
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::StatusParseError;

/// Literal last line marking a completely written status file.
pub const TERMINATOR: &str = "end";

/// Which set a status entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Mode,
    Tag,
    App,
}

impl EntryKind {
    /// Keyword used in the status file.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Mode => "mode",
            Self::Tag => "tag",
            Self::App => "app",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for EntryKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mode" => Ok(Self::Mode),
            "tag" => Ok(Self::Tag),
            "app" => Ok(Self::App),
            _ => Err(()),
        }
    }
}

/// A single `<type> <value>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,
    pub value: String,
}

/// Parse one non-terminator line. `line_no` is 1-based and only used for
/// error reporting.
///
/// Only the first space separates type from value; it may be neither the
/// first nor the last character of the line.
pub fn parse_line(line_no: usize, line: &str) -> Result<Entry, StatusParseError> {
    let bad_line = || StatusParseError::BadLine {
        line_no,
        line: line.to_string(),
    };

    let sep = line.find(' ').ok_or_else(bad_line)?;
    if sep == 0 || sep + 1 >= line.len() {
        return Err(bad_line());
    }

    let (entry_type, rest) = line.split_at(sep);
    let kind = entry_type
        .parse::<EntryKind>()
        .map_err(|()| StatusParseError::UnknownEntryType {
            line_no,
            entry_type: entry_type.to_string(),
        })?;

    Ok(Entry {
        kind,
        value: rest[1..].to_string(),
    })
}
