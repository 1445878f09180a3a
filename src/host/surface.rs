//! [`Surface`] backed by the Stream Deck WebSocket connection.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

use super::protocol::OutboundMessage;
use crate::error::{BridgeError, Result};
use crate::keys::{DisplayState, TitleTarget};
use crate::surface::Surface;

/// Queues outbound messages for the connection's writer task.
///
/// Sending never blocks, so it is safe to call with the bridge lock held.
pub struct StreamDeckSurface {
    tx: UnboundedSender<OutboundMessage>,
    connected: AtomicBool,
}

impl StreamDeckSurface {
    /// Create a surface and the receiver its writer task drains.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<OutboundMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let surface = Self {
            tx,
            connected: AtomicBool::new(true),
        };
        (surface, rx)
    }

    /// Stop accepting updates (connection closed).
    pub fn mark_disconnected(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    fn send(&self, msg: OutboundMessage) -> Result<()> {
        trace!(?msg, "Queueing outbound message");
        self.tx.send(msg).map_err(|_| BridgeError::HostDisconnected)
    }
}

impl Surface for StreamDeckSurface {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst) && !self.tx.is_closed()
    }

    fn set_state(&self, context: &str, state: DisplayState) -> Result<()> {
        self.send(OutboundMessage::set_state(context, state))
    }

    fn set_title(&self, context: &str, title: &str, target: TitleTarget) -> Result<()> {
        self.send(OutboundMessage::set_title(context, title, target))
    }
}
