//! Talon Deck library - Talon voice-control status on Stream Deck keys.
//!
//! This library exposes the core of the `talon-deck` plugin for use in tests
//! and the CLI diagnostics.
//!
//! # Modules
//!
//! - `status`: Status file parsing and the active-entry snapshot
//! - `keys`: Key kinds, settings and display rules
//! - `bridge`: Status store and key reconciler
//! - `surface`: Key display abstraction (Stream Deck or mock)
//! - `action`: Key-press action dispatch to the Talon REPL
//! - `watcher`: Status file change notifications
//! - `host`: Stream Deck plugin WebSocket protocol
//! - `config`: Settings file handling
//! - `error`: Error types with user-recoverable hints
#![forbid(unsafe_code)]

pub mod action;
pub mod bridge;
pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod keys;
pub mod logging;
pub mod status;
pub mod surface;
pub mod watcher;
