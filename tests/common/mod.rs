//! Common test utilities for talon-deck.
//!
//! - `cli`: CLI runner with output verification and fluent assertions
//! - `env`: Serialized environment variable overrides
//! - `fixtures`: Temporary status and config files
#![allow(dead_code)]


use tracing_subscriber::EnvFilter;

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
