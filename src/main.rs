//! Talon Deck - Stream Deck plugin mirroring Talon voice-control status.
//!
//! Runs as a plugin when launched by the Stream Deck application, and offers
//! a few diagnostics (status, watch, run-action) when run from a terminal.
#![forbid(unsafe_code)]

use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use clap::CommandFactory;
use console::style;
use serde::Serialize;
use tracing::error;

use talon_deck::action::{ActionDispatcher, ActionOutcome};
use talon_deck::cli::{self, Cli, Commands};
use talon_deck::config::Settings;
use talon_deck::error::{BridgeError, Result, ResultExt};
use talon_deck::host::{self, LaunchArgs};
use talon_deck::logging::init_logging;
use talon_deck::status::StatusSnapshot;
use talon_deck::watcher::{StatusWatcher, WatchEvent};

/// Build information embedded at compile time.
mod build_info {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    pub fn git_sha() -> &'static str {
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    }

    pub fn git_dirty() -> &'static str {
        option_env!("VERGEN_GIT_DIRTY").unwrap_or("false")
    }

    pub fn build_timestamp() -> &'static str {
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown")
    }

    pub fn rustc_semver() -> &'static str {
        option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown")
    }

    pub fn target() -> &'static str {
        option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown")
    }
}

fn main() {
    let cli = Cli::parse_args();

    if cli.no_color || !io::stdout().is_terminal() {
        console::set_colors_enabled(false);
    }
    init_logging(cli.use_json(), cli.verbose, cli.quiet);

    if let Err(e) = run(&cli) {
        output_error(&cli, &e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        None => match cli.plugin.launch() {
            Some(launch) => cmd_plugin(cli, &launch),
            None => print_quick_start(cli),
        },
        Some(Commands::Status(args)) => cmd_status(cli, args),
        Some(Commands::Watch(args)) => cmd_watch(cli, args),
        Some(Commands::RunAction(args)) => cmd_run_action(cli, args),
        Some(Commands::Version) => cmd_version(cli),
        Some(Commands::Completions(args)) => cmd_completions(cli, args),
    }
}

/// Settings from the config file with CLI overrides applied.
fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(path) = &cli.status_file {
        settings.set_status_file(path)?;
    }
    if let Some(repl) = &cli.repl {
        settings.repl_path.clone_from(repl);
    }
    Ok(settings)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_context(|| "Failed to start async runtime")
}

// === Quick Start ===

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn print_quick_start(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({
                "tool": "talon-deck",
                "version": build_info::VERSION,
                "description": "Stream Deck plugin mirroring Talon status onto keys",
                "plugin_launch": "talon-deck -port <PORT> -pluginUUID <UUID> -registerEvent <EVENT> -info <JSON>",
                "commands": {
                    "status": "talon-deck status --robot",
                    "watch": "talon-deck watch --robot",
                    "run_action": "talon-deck run-action <TEXT>",
                },
                "status_file": "$TMPDIR/talon-status (override with --status-file)",
            }),
        );
        return Ok(());
    }

    println!(
        "{} {} - Talon status for Stream Deck\n",
        style("talon-deck").bold().cyan(),
        build_info::VERSION
    );
    println!("{}", style("USAGE").bold().underlined());
    println!();
    println!("  Normally launched by the Stream Deck application.");
    println!();
    println!("  {}  Show current Talon status", style("talon-deck status").green());
    println!("  {}  Follow status changes", style("talon-deck watch").green());
    println!(
        "  {}  Send an action to the REPL",
        style("talon-deck run-action 'actions.speech.toggle()'").green()
    );
    println!();
    println!("Run {} for full help", style("talon-deck --help").yellow());
    Ok(())
}

// === Command Implementations ===

fn cmd_plugin(cli: &Cli, launch: &LaunchArgs) -> Result<()> {
    let settings = load_settings(cli)?;
    runtime()?
        .block_on(host::run(launch, &settings))
        .inspect_err(|e| error!(error = %e, "Plugin stopped"))
}

/// Snapshot report printed by `status` and `watch`.
#[derive(Serialize)]
struct StatusReport<'a> {
    path: String,
    read_at: DateTime<Local>,
    #[serde(flatten)]
    snapshot: &'a StatusSnapshot,
}

fn print_snapshot(cli: &Cli, path: &Path, snapshot: &StatusSnapshot) {
    if cli.use_json() {
        output_json(
            cli,
            &StatusReport {
                path: path.display().to_string(),
                read_at: Local::now(),
                snapshot,
            },
        );
        return;
    }

    let join = |set: &std::collections::BTreeSet<String>| {
        if set.is_empty() {
            style("-").dim().to_string()
        } else {
            set.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    };
    println!("{}: {}", style("Modes").bold(), join(&snapshot.modes));
    println!("{}: {}", style("Tags").bold(), join(&snapshot.tags));
    println!("{}: {}", style("Apps").bold(), join(&snapshot.apps));
}

fn cmd_status(cli: &Cli, _args: &cli::StatusArgs) -> Result<()> {
    let path = load_settings(cli)?.status_path()?;
    let snapshot = StatusSnapshot::load(&path)?;
    print_snapshot(cli, &path, &snapshot);
    Ok(())
}

fn cmd_watch(cli: &Cli, args: &cli::WatchArgs) -> Result<()> {
    let path = load_settings(cli)?.status_path()?;
    let (tx, rx) = mpsc::channel();
    let watcher = StatusWatcher::start(&path, move |event| {
        let _ = tx.send(event);
    })?;

    if !cli.quiet && !cli.use_json() {
        println!(
            "Watching {} for {} (Ctrl+C to stop)...",
            style(watcher.dir().display()).cyan(),
            path.file_name().map_or_else(String::new, |n| n.to_string_lossy().into_owned())
        );
    }

    let deadline = (args.timeout > 0).then(|| Instant::now() + Duration::from_secs(args.timeout));
    loop {
        let wait = deadline.map_or(Duration::from_secs(3600), |d| {
            d.saturating_duration_since(Instant::now())
        });
        let event = match rx.recv_timeout(wait) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) if deadline.is_some() => return Ok(()),
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                return Err(BridgeError::WatchFailed {
                    path: path.display().to_string(),
                    reason: "watcher stopped".to_string(),
                });
            }
        };

        match event {
            WatchEvent::Changed(_) => match StatusSnapshot::load(&path) {
                Ok(snapshot) => print_snapshot(cli, &path, &snapshot),
                Err(e) => print_cleared(cli, &e),
            },
            WatchEvent::Error(reason) => {
                print_cleared(cli, &BridgeError::WatchFailed {
                    path: path.display().to_string(),
                    reason,
                });
            }
        }

        if args.once {
            return Ok(());
        }
    }
}

/// Report a change that leaves the status cleared.
fn print_cleared(cli: &Cli, reason: &BridgeError) {
    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({
                "cleared": true,
                "reason": reason.to_string(),
                "read_at": Local::now(),
            }),
        );
    } else {
        println!("{}: {}", style("Cleared").yellow(), reason);
    }
}

fn cmd_run_action(cli: &Cli, args: &cli::RunActionArgs) -> Result<()> {
    let settings = load_settings(cli)?;
    let dispatcher = ActionDispatcher::new(Arc::new(settings.repl_sink()?), settings.action_timeout());
    let outcome = runtime()?.block_on(dispatcher.run(&args.action));

    if cli.use_json() {
        output_json(cli, &outcome);
    }
    match outcome {
        ActionOutcome::Completed { exit_code } => {
            if !cli.quiet && !cli.use_json() {
                match exit_code {
                    Some(code) => println!("Action sent (REPL exited with {code})"),
                    None => println!("Action sent"),
                }
            }
            Ok(())
        }
        ActionOutcome::Failed { reason } => Err(BridgeError::Other(reason)),
        ActionOutcome::TimedOut => Err(BridgeError::ActionTimeout {
            millis: u64::try_from(dispatcher.timeout().as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_version(cli: &Cli) -> Result<()> {
    if cli.use_json() {
        output_json(
            cli,
            &serde_json::json!({
                "version": build_info::VERSION,
                "git_sha": build_info::git_sha(),
                "git_dirty": build_info::git_dirty() == "true",
                "build_timestamp": build_info::build_timestamp(),
                "rustc_version": build_info::rustc_semver(),
                "target": build_info::target(),
            }),
        );
    } else {
        println!("talon-deck {}", build_info::VERSION);
        println!(
            "git: {}{}",
            build_info::git_sha(),
            if build_info::git_dirty() == "true" {
                " (dirty)"
            } else {
                ""
            }
        );
        println!("built: {}", build_info::build_timestamp());
        println!("rustc: {}", build_info::rustc_semver());
        println!("target: {}", build_info::target());
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Consistent return type with other commands
fn cmd_completions(_cli: &Cli, args: &cli::CompletionsArgs) -> Result<()> {
    clap_complete::generate(
        args.shell,
        &mut Cli::command(),
        "talon-deck",
        &mut io::stdout(),
    );
    Ok(())
}

// === Utility Functions ===

fn output_json<T: Serialize>(cli: &Cli, data: &T) {
    let json = if cli.use_compact_json() {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    match json {
        Ok(json) => println!("{json}"),
        Err(e) => error!(error = %e, "Failed to encode output"),
    }
}

fn output_error(cli: &Cli, error: &BridgeError) {
    if cli.use_json() {
        let json = serde_json::json!({
            "error": true,
            "message": error.to_string(),
            "suggestion": error.suggestion(),
            "recoverable": error.is_user_recoverable(),
        });
        eprintln!("{json:#}");
    } else {
        eprintln!("{}: {}", style("Error").red().bold(), error);
        if let Some(suggestion) = error.suggestion() {
            eprintln!("{}: {}", style("Hint").yellow(), suggestion);
        }
    }
}
