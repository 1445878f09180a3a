//! Abstraction over the control surface that renders key state.
//!
//! The bridge never talks to hardware directly; it asks the host (the Stream
//! Deck application) to change a key's state or title. This trait is that
//! seam, implemented by the WebSocket connection in [`crate::host`] and by
//! [`mock::MockSurface`] for tests.

pub mod mock;

use std::sync::Arc;

use crate::error::Result;
use crate::keys::{DisplayState, TitleTarget};

/// Outbound calls the bridge makes to the host surface.
///
/// # Implementation Notes
///
/// - Calls are made while the bridge's lock is held, so they must not block
/// - `context` is the opaque per-key identity the host handed out on
///   `willAppear`
pub trait Surface: Send + Sync {
    /// Check whether the host is connected and accepting updates.
    fn is_connected(&self) -> bool;

    /// Set a key's display state.
    ///
    /// # Errors
    ///
    /// Returns an error if the update could not be queued for the host.
    fn set_state(&self, context: &str, state: DisplayState) -> Result<()>;

    /// Set a key's title text.
    ///
    /// # Errors
    ///
    /// Returns an error if the update could not be queued for the host.
    fn set_title(&self, context: &str, title: &str, target: TitleTarget) -> Result<()>;
}

/// Shared trait object used by the bridge.
pub type SharedSurface = Arc<dyn Surface>;
