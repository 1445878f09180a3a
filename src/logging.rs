//! Structured logging initialization.
//!
//! Logs always go to stderr: in plugin mode the Stream Deck application
//! captures the plugin's stderr into its log directory, and in CLI mode
//! stdout is reserved for command output.

use std::io::{self, IsTerminal};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` replaces the filter chosen from `verbose`/`quiet` (e.g.
/// `talon_deck=debug,notify=warn`). JSON lines are used with `--robot`;
/// otherwise colored text on a terminal and compact plain text when stderr
/// is captured, as it is when the Stream Deck application launches us.
pub fn init_logging(json: bool, verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(io::stderr),
            )
            .init();
        return;
    }

    let interactive = io::stderr().is_terminal();
    let text = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(interactive)
        .with_target(!interactive);
    if interactive {
        registry.with(text).init();
    } else {
        registry.with(text.compact()).init();
    }
}

/// Filter directive used when `RUST_LOG` is unset.
#[must_use]
pub const fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "talon_deck=error";
    }
    match verbose {
        0 => "talon_deck=info",
        1 => "talon_deck=debug",
        _ => "talon_deck=trace",
    }
}
