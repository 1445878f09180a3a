//! Stream Deck plugin protocol messages (SDK v2, JSON over WebSocket).

use serde::{Deserialize, Serialize};

use crate::keys::{DisplayState, KeyInfo, TitleTarget};

/// First message sent after connecting.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub event: String,
    pub uuid: String,
}

/// Key settings configured in the property inspector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySettings {
    #[serde(default)]
    pub monitor_value: Option<String>,
    #[serde(default)]
    pub press_action: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Coordinates {
    pub column: u32,
    pub row: u32,
}

/// Payload of key events (`keyDown`, `keyUp`, `willAppear`, `willDisappear`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPayload {
    #[serde(default)]
    pub settings: KeySettings,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub state: Option<u8>,
    #[serde(default)]
    pub is_in_multi_action: bool,
}

impl KeyPayload {
    /// Build the key record for a `willAppear` event.
    #[must_use]
    pub fn to_key_info(&self, action: &str, device: &str) -> KeyInfo {
        let mut key = KeyInfo::new(action, device);
        if let Some(value) = &self.settings.monitor_value {
            key = key.with_watch_value(value.clone());
        }
        if let Some(press) = &self.settings.press_action {
            key = key.with_press_action(press.clone());
        }
        if let Some(coords) = self.coordinates {
            key = key.at(coords.row, coords.column);
        }
        key
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceSize {
    pub columns: u32,
    pub rows: u32,
}

/// Device description sent with `deviceDidConnect` and in the launch info.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<u32>,
    #[serde(default)]
    pub size: Option<DeviceSize>,
}

/// Event received from the Stream Deck application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum InboundEvent {
    KeyDown {
        action: String,
        context: String,
        #[serde(default)]
        device: String,
        #[serde(default)]
        payload: KeyPayload,
    },
    KeyUp {
        action: String,
        context: String,
        #[serde(default)]
        device: String,
        #[serde(default)]
        payload: KeyPayload,
    },
    WillAppear {
        action: String,
        context: String,
        #[serde(default)]
        device: String,
        #[serde(default)]
        payload: KeyPayload,
    },
    WillDisappear {
        action: String,
        context: String,
        #[serde(default)]
        device: String,
    },
    DeviceDidConnect {
        device: String,
        #[serde(default, rename = "deviceInfo")]
        device_info: Option<DeviceInfo>,
    },
    DeviceDidDisconnect {
        device: String,
    },
    SendToPlugin {
        action: String,
        context: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
    /// Any event this plugin does not handle.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatePayload {
    pub state: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitlePayload {
    pub title: String,
    pub target: u8,
}

/// Message sent to the Stream Deck application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum OutboundMessage {
    SetState {
        context: String,
        payload: StatePayload,
    },
    SetTitle {
        context: String,
        payload: TitlePayload,
    },
}

impl OutboundMessage {
    #[must_use]
    pub fn set_state(context: &str, state: DisplayState) -> Self {
        Self::SetState {
            context: context.to_string(),
            payload: StatePayload {
                state: state.index(),
            },
        }
    }

    #[must_use]
    pub fn set_title(context: &str, title: &str, target: TitleTarget) -> Self {
        Self::SetTitle {
            context: context.to_string(),
            payload: TitlePayload {
                title: title.to_string(),
                target: target.code(),
            },
        }
    }
}

/// Application info passed with `-info` on launch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LaunchInfo {
    #[serde(default)]
    pub application: Option<ApplicationInfo>,
    #[serde(default)]
    pub devices: Vec<DeviceInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationInfo {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}
