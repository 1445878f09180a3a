//! Stream Deck application connection.
//!
//! The Stream Deck application launches the plugin with a port and a
//! registration token, then talks to it over a local WebSocket. Inbound
//! events are translated into [`Bridge`] calls; the bridge's surface updates
//! flow back through [`StreamDeckSurface`].

pub mod protocol;
mod surface;

pub use surface::StreamDeckSurface;

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, trace, warn};

use self::protocol::{InboundEvent, LaunchInfo, Registration};
use crate::action::{ActionDispatcher, ActionOutcome};
use crate::bridge::Bridge;
use crate::config::Settings;
use crate::error::{BridgeError, Result};
use crate::watcher::StatusWatcher;

/// Arguments the Stream Deck application passes on launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchArgs {
    pub port: u16,
    pub plugin_uuid: String,
    pub register_event: String,
    pub info: Option<String>,
}

impl LaunchArgs {
    /// Parse the `-info` JSON, if present and well formed.
    #[must_use]
    pub fn launch_info(&self) -> Option<LaunchInfo> {
        let raw = self.info.as_deref()?;
        match serde_json::from_str(raw) {
            Ok(info) => Some(info),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed launch info");
                None
            }
        }
    }
}

/// Translate one inbound text frame into bridge calls.
///
/// Returns the action task when a key release dispatched one.
pub fn handle_message(bridge: &Bridge, text: &str) -> Option<JoinHandle<ActionOutcome>> {
    let event: InboundEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "Ignoring unparseable message");
            return None;
        }
    };
    handle_event(bridge, event)
}

/// Apply a decoded event to the bridge.
pub fn handle_event(bridge: &Bridge, event: InboundEvent) -> Option<JoinHandle<ActionOutcome>> {
    match event {
        InboundEvent::WillAppear {
            action,
            context,
            device,
            payload,
        } => {
            let key = payload.to_key_info(&action, &device);
            bridge.key_appeared(&context, key);
            None
        }
        InboundEvent::WillDisappear { context, .. } => {
            bridge.key_disappeared(&context);
            None
        }
        InboundEvent::KeyUp { context, .. } => bridge.key_released(&context),
        InboundEvent::KeyDown { context, .. } => {
            trace!(context, "Key down");
            None
        }
        InboundEvent::DeviceDidConnect {
            device,
            device_info,
        } => {
            info!(device, info = ?device_info, "Device connected");
            None
        }
        InboundEvent::DeviceDidDisconnect { device } => {
            info!(device, "Device disconnected");
            None
        }
        InboundEvent::SendToPlugin {
            action, context, ..
        } => {
            debug!(action, context, "Message from property inspector");
            None
        }
        InboundEvent::Other => {
            trace!("Unhandled event");
            None
        }
    }
}

/// Connect to the Stream Deck application and serve until it disconnects.
pub async fn run(args: &LaunchArgs, settings: &Settings) -> Result<()> {
    if let Some(info) = args.launch_info() {
        let app = info.application.unwrap_or_default();
        info!(
            version = app.version.as_deref().unwrap_or("unknown"),
            platform = app.platform.as_deref().unwrap_or("unknown"),
            devices = info.devices.len(),
            "Launched by Stream Deck"
        );
    }

    let url = format!("ws://127.0.0.1:{}", args.port);
    let (ws, _) = connect_async(url.as_str())
        .await
        .map_err(|e| BridgeError::HostConnect {
            port: args.port,
            reason: e.to_string(),
        })?;
    let (mut ws_tx, mut ws_rx) = ws.split();

    let registration = serde_json::to_string(&Registration {
        event: args.register_event.clone(),
        uuid: args.plugin_uuid.clone(),
    })?;
    ws_tx
        .send(Message::Text(registration.into()))
        .await
        .map_err(|e| BridgeError::HostProtocol(format!("registration failed: {e}")))?;
    info!(port = args.port, "Registered with Stream Deck");

    let (surface, mut outbound) = StreamDeckSurface::channel();
    let surface = Arc::new(surface);
    let sink = settings.repl_sink()?;
    let repl = sink.program().display().to_string();
    let dispatcher = ActionDispatcher::new(Arc::new(sink), settings.action_timeout());
    info!(
        repl = %repl,
        timeout_ms = u64::try_from(dispatcher.timeout().as_millis()).unwrap_or(u64::MAX),
        "Action sink ready"
    );
    let bridge = Arc::new(Bridge::new(
        settings.status_path()?,
        surface.clone(),
        dispatcher,
    ));

    // The watcher must be live before the first read.
    let watcher = StatusWatcher::for_bridge(Arc::clone(&bridge))?;
    info!(dir = %watcher.dir().display(), "Watching Talon status");
    // Failure just leaves keys in their fallback display.
    let _ = bridge.reload();

    let writer = tokio::spawn(async move {
        while let Some(msg) = outbound.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Failed to encode outbound message");
                    continue;
                }
            };
            if let Err(e) = ws_tx.send(Message::Text(text.into())).await {
                warn!(error = %e, "Failed to send to Stream Deck");
                break;
            }
        }
    });

    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                trace!(text = %text.as_str(), "Inbound message");
                // Action tasks run detached; their outcome is logged.
                let _ = handle_message(&bridge, text.as_str());
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Stream Deck connection error");
                break;
            }
        }
    }

    info!("Stream Deck disconnected");
    surface.mark_disconnected();
    writer.abort();
    Ok(())
}
