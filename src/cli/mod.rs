//! CLI argument definitions.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::host::LaunchArgs;

/// Talon Deck - Mirrors Talon voice-control status onto Stream Deck keys.
///
/// Launched without a subcommand by the Stream Deck application (with -port,
/// -pluginUUID, -registerEvent and -info), it runs as a plugin. The
/// subcommands are diagnostics for use from a terminal.
#[derive(Parser, Debug)]
#[command(name = "talon-deck", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (text for humans, json for scripts)
    #[arg(
        long,
        short = 'f',
        default_value = "text",
        global = true,
        env = "TALON_DECK_FORMAT"
    )]
    pub format: OutputFormat,

    /// Robot mode: equivalent to --format=json
    #[arg(long, global = true)]
    pub robot: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only log errors)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output (any non-falsey NO_COLOR also disables it)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Configuration file (TOML)
    #[arg(long, global = true, env = "TALON_DECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Status file to read instead of $TMPDIR/talon-status
    #[arg(long, global = true, env = "TALON_DECK_STATUS_FILE")]
    pub status_file: Option<PathBuf>,

    /// Interpreter that receives key-press actions
    #[arg(long, global = true, env = "TALON_DECK_REPL")]
    pub repl: Option<PathBuf>,

    #[command(flatten)]
    pub plugin: PluginArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format selection.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output for scripts
    Json,
    /// Compact JSON (single line)
    JsonCompact,
}

impl Cli {
    /// Parse process arguments, accepting the Stream Deck single-dash flags.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Returns true if output should be JSON (robot mode or explicit --format=json).
    pub const fn use_json(&self) -> bool {
        self.robot || matches!(self.format, OutputFormat::Json | OutputFormat::JsonCompact)
    }

    /// Returns true if output should be compact JSON.
    pub const fn use_compact_json(&self) -> bool {
        matches!(self.format, OutputFormat::JsonCompact)
    }
}

/// Flags the Stream Deck application passes when launching the plugin.
#[derive(Args, Debug, Default)]
pub struct PluginArgs {
    /// WebSocket port of the Stream Deck application
    #[arg(long)]
    pub port: Option<u16>,

    /// Registration UUID assigned to this plugin instance
    #[arg(long = "plugin-uuid", requires = "port")]
    pub plugin_uuid: Option<String>,

    /// Event name to register with
    #[arg(long = "register-event", requires = "port")]
    pub register_event: Option<String>,

    /// Application and device info (JSON)
    #[arg(long, requires = "port")]
    pub info: Option<String>,
}

impl PluginArgs {
    /// Launch arguments, if this process was started by Stream Deck.
    #[must_use]
    pub fn launch(&self) -> Option<LaunchArgs> {
        Some(LaunchArgs {
            port: self.port?,
            plugin_uuid: self.plugin_uuid.clone().unwrap_or_default(),
            register_event: self
                .register_event
                .clone()
                .unwrap_or_else(|| "registerPlugin".to_string()),
            info: self.info.clone(),
        })
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read the status file once and show the active modes, tags and apps
    Status(StatusArgs),

    /// Watch the status file and show each change
    Watch(WatchArgs),

    /// Send one action to the REPL, as a key press would
    RunAction(RunActionArgs),

    /// Show version and build information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
pub struct StatusArgs {}

#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Exit after the first change
    #[arg(long)]
    pub once: bool,

    /// Timeout in seconds (0 = no timeout)
    #[arg(long, short = 't', default_value = "0")]
    pub timeout: u64,
}

#[derive(Parser, Debug)]
pub struct RunActionArgs {
    /// REPL command text, e.g. "actions.speech.toggle()"
    pub action: String,
}

#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

/// Stream Deck launch flags and their clap spellings.
const SINGLE_DASH_FLAGS: [(&str, &str); 4] = [
    ("-port", "--port"),
    ("-pluginUUID", "--plugin-uuid"),
    ("-registerEvent", "--register-event"),
    ("-info", "--info"),
];

/// Rewrite the single-dash long flags Stream Deck uses (`-port 28196`) into
/// the `--port` form clap understands. Values are never rewritten.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut expect_value = false;
    for arg in args {
        let arg: OsString = arg.into();
        if expect_value {
            expect_value = false;
            out.push(arg);
            continue;
        }
        let replacement = arg.to_str().and_then(|s| {
            SINGLE_DASH_FLAGS
                .iter()
                .find(|(from, _)| *from == s)
                .map(|(_, to)| *to)
        });
        match replacement {
            Some(long) => {
                expect_value = true;
                out.push(OsString::from(long));
            }
            None => out.push(arg),
        }
    }
    out
}
