//! Visible keys and the rules that turn a status snapshot into key displays.

use serde::{Deserialize, Serialize};

use crate::status::{EntryKind, StatusSnapshot};

/// Action UUID of the speech status key.
pub const SPEECH_STATUS_ACTION: &str = "com.talon.speech.speechstatus";
/// Action UUID of the tag status key.
pub const TAG_STATUS_ACTION: &str = "com.talon.speech.tagstatus";
/// Action UUID of the mode status key.
pub const MODE_STATUS_ACTION: &str = "com.talon.speech.modestatus";
/// Action UUID of the app status key.
pub const APP_STATUS_ACTION: &str = "com.talon.speech.appstatus";

const MODE_SLEEP: &str = "sleep";
const MODE_COMMAND: &str = "command";

/// What a key is configured to reflect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WatchKind {
    /// Speech on/asleep, from the `command` and `sleep` modes.
    SpeechStatus,
    TagStatus,
    ModeStatus,
    AppStatus,
    /// An action UUID this plugin does not know.
    Unknown { action: String },
}

impl WatchKind {
    /// Map a Stream Deck action UUID to a watch kind.
    #[must_use]
    pub fn from_action(action: &str) -> Self {
        match action {
            SPEECH_STATUS_ACTION => Self::SpeechStatus,
            TAG_STATUS_ACTION => Self::TagStatus,
            MODE_STATUS_ACTION => Self::ModeStatus,
            APP_STATUS_ACTION => Self::AppStatus,
            other => Self::Unknown {
                action: other.to_string(),
            },
        }
    }
}

/// Two-valued key indicator. The discriminants are the Stream Deck state
/// indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    Active = 0,
    Inactive = 1,
}

impl DisplayState {
    /// State index sent to the host.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    const fn from_active(active: bool) -> Self {
        if active { Self::Active } else { Self::Inactive }
    }
}

/// Where a title is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleTarget {
    #[default]
    HardwareAndSoftware,
    Hardware,
    Software,
}

impl TitleTarget {
    /// Target code used by the Stream Deck protocol.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::HardwareAndSoftware => 0,
            Self::Hardware => 1,
            Self::Software => 2,
        }
    }
}

/// Per-visible-key record, created on `willAppear`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyInfo {
    pub watch: WatchKind,
    /// Tag, mode or app name to watch. Empty when not configured.
    pub watch_value: String,
    /// REPL command to run on release. Empty when not configured.
    pub press_action: String,
    pub device_id: String,
    pub row: Option<u32>,
    pub column: Option<u32>,
}

impl KeyInfo {
    /// Create a key for an action UUID with no settings.
    #[must_use]
    pub fn new(action: &str, device_id: impl Into<String>) -> Self {
        Self {
            watch: WatchKind::from_action(action),
            watch_value: String::new(),
            press_action: String::new(),
            device_id: device_id.into(),
            row: None,
            column: None,
        }
    }

    #[must_use]
    pub fn with_watch_value(mut self, value: impl Into<String>) -> Self {
        self.watch_value = value.into();
        self
    }

    #[must_use]
    pub fn with_press_action(mut self, action: impl Into<String>) -> Self {
        self.press_action = action.into();
        self
    }

    #[must_use]
    pub const fn at(mut self, row: u32, column: u32) -> Self {
        self.row = Some(row);
        self.column = Some(column);
        self
    }

    /// The REPL action to run on release, if any.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        (!self.press_action.is_empty()).then_some(self.press_action.as_str())
    }
}

/// What should be shown on a key for a given snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyDisplay {
    /// New state, if the key's state should change.
    pub state: Option<DisplayState>,
    /// Fallback title, if one should be forced.
    pub title: Option<&'static str>,
}

impl KeyDisplay {
    const fn state(state: DisplayState) -> Self {
        Self {
            state: Some(state),
            title: None,
        }
    }

    const fn fallback(title: &'static str) -> Self {
        Self {
            state: Some(DisplayState::Inactive),
            title: Some(title),
        }
    }

    /// Decide the display of `key` under `snapshot`.
    #[must_use]
    pub fn for_key(key: &KeyInfo, snapshot: &StatusSnapshot) -> Self {
        match &key.watch {
            WatchKind::SpeechStatus => {
                if snapshot.modes.contains(MODE_COMMAND) {
                    Self::state(DisplayState::Active)
                } else if snapshot.modes.contains(MODE_SLEEP) {
                    Self::state(DisplayState::Inactive)
                } else {
                    Self::fallback("No Status")
                }
            }
            WatchKind::TagStatus => Self::membership(EntryKind::Tag, &key.watch_value, snapshot),
            WatchKind::ModeStatus => Self::membership(EntryKind::Mode, &key.watch_value, snapshot),
            WatchKind::AppStatus => Self::membership(EntryKind::App, &key.watch_value, snapshot),
            WatchKind::Unknown { .. } => Self {
                state: None,
                title: Some("Unk Action"),
            },
        }
    }

    fn membership(kind: EntryKind, value: &str, snapshot: &StatusSnapshot) -> Self {
        if value.is_empty() {
            return Self::fallback(match kind {
                EntryKind::Tag => "No Tag",
                EntryKind::Mode => "No Mode",
                EntryKind::App => "No App",
            });
        }
        Self::state(DisplayState::from_active(snapshot.contains(kind, value)))
    }
}
