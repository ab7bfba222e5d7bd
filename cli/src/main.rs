//! MLB Money Maker CLI - score, finalize and review negotiations.
//!
//! `STATE` files are TOML with the negotiation sliders (camelCase keys, every
//! key optional). Without one the opening offer is used.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use moneymaker_config::{MoneymakerConfig, Settings, load_settings};
use moneymaker_core::{
    Glyphs, JsonFileStore, Negotiation, ResultHistory, SystemClock, render_outcome, render_status,
};
use moneymaker_types::{ClaimCode, NegotiationState, StoredResult};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than mixing logs into command output.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.moneymaker/logs/moneymaker.log
    if let Some(config_path) = MoneymakerConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("moneymaker.log"));
    }

    // Fallback: ./.moneymaker/logs/moneymaker.log
    candidates.push(PathBuf::from(".moneymaker").join("logs").join("moneymaker.log"));

    candidates
}

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "moneymaker")]
#[command(about = "Score and finalize MLB media-rights negotiations")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Config file (default ~/.moneymaker/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Result history file (overrides the config)
    #[arg(long, global = true, value_name = "PATH")]
    history: Option<PathBuf>,
    /// Show moods as emoji instead of ASCII faces
    #[arg(long, global = true)]
    emoji: bool,
    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn glyphs(&self) -> Glyphs {
        if self.emoji {
            Glyphs::Emoji
        } else {
            Glyphs::Ascii
        }
    }
}

#[derive(Debug, PartialEq, Subcommand)]
enum Commands {
    /// Live scores, stability and tier preview
    Score {
        /// Negotiation state file
        state: Option<PathBuf>,
    },
    /// Judge the deal, issue a claim code and store the result
    Finalize {
        /// Negotiation state file
        state: Option<PathBuf>,
        /// Mini-game bonus points added to every score
        #[arg(long, default_value_t = 0)]
        bonus: u8,
    },
    /// Stored results, oldest first
    History,
    /// Best stored result
    Best,
    /// Forget all stored results
    Clear,
    /// Check a claim code
    Verify {
        /// Code such as MLB-GOLD-JT4XJV-2025
        code: String,
    },
}

// ============================================================================
// Commands
// ============================================================================

fn load_state(path: Option<&Path>) -> Result<NegotiationState> {
    let Some(path) = path else {
        return Ok(NegotiationState::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read state file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse state file {}", path.display()))
}

fn history_path(cli: &Cli, settings: &Settings) -> PathBuf {
    cli.history
        .clone()
        .or_else(|| settings.app.history_path.clone())
        .unwrap_or_else(|| PathBuf::from(".moneymaker").join("results.json"))
}

fn open_session(
    settings: Settings,
    history: ResultHistory<JsonFileStore>,
    state: NegotiationState,
) -> Negotiation<JsonFileStore, SystemClock> {
    Negotiation::with_state(settings.tuning, history, state)
        .with_allocation_tolerance(settings.app.allocation_tolerance)
}

fn describe(entry: &StoredResult) -> String {
    let result = &entry.result;
    let code = result.code().map_or("-", ClaimCode::as_str);
    format!(
        "{}  {:<6}  {:>3}  {code}",
        entry.stored_at.format("%Y-%m-%d %H:%M"),
        result.tier(),
        result.overall()
    )
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref()).context("failed to load config")?;
    let path = history_path(&cli, &settings);
    tracing::debug!(path = %path.display(), "Using history file");
    let history = ResultHistory::new(JsonFileStore::new(path));

    match &cli.command {
        Commands::Score { state } => {
            let state = load_state(state.as_deref())?;
            let session = open_session(settings, history, state);
            if cli.json {
                let preview = session.tier_preview();
                print_json(&serde_json::json!({
                    "satisfactions": session.scores(),
                    "stability": session.stability(),
                    "tier": preview,
                    "lowest": session.lowest(),
                    "allocationValid": session.allocation_is_valid(),
                }))?;
            } else {
                println!("{}", render_status(&session, cli.glyphs()));
            }
        }
        Commands::Finalize { state, bonus } => {
            let state = load_state(state.as_deref())?;
            let mut session = open_session(settings, history, state);
            session.add_bonus(*bonus);
            let outcome = session.finalize().context("failed to issue claim code")?;
            if cli.json {
                print_json(&outcome.result)?;
            } else {
                println!("{}", render_outcome(&outcome, cli.glyphs()));
                if let Some(share) = outcome.share_text() {
                    println!("\n{share}");
                }
            }
        }
        Commands::History => {
            let entries = history.history();
            if cli.json {
                print_json(&entries)?;
            } else if entries.is_empty() {
                println!("No results yet.");
            } else {
                for entry in &entries {
                    println!("{}", describe(entry));
                }
            }
        }
        Commands::Best => match history.best_result() {
            Some(best) if cli.json => print_json(&best)?,
            Some(best) => println!("{}", describe(&best)),
            None if cli.json => println!("null"),
            None => println!("No results yet."),
        },
        Commands::Clear => {
            let mut history = history;
            if !history.clear() {
                bail!("could not clear result history");
            }
            if cli.json {
                print_json(&serde_json::json!({ "cleared": true }))?;
            } else {
                println!("History cleared.");
            }
        }
        Commands::Verify { code } => {
            let code = ClaimCode::parse(code.trim())
                .with_context(|| format!("invalid claim code: {code}"))?;
            if cli.json {
                print_json(&serde_json::json!({
                    "code": code,
                    "tier": code.tier(),
                    "hash": code.hash(),
                    "year": code.year(),
                }))?;
            } else {
                println!(
                    "Valid {} code from {} ({})",
                    code.tier().code_label(),
                    code.year(),
                    code.tier().title()
                );
            }
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    run(cli)
}
