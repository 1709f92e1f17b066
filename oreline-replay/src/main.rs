//! Oreline broadcast replay
//!
//! Feeds a JSON-lines capture of real-time broadcast messages through the
//! sync core, exactly as a live session would receive them, and prints the
//! resulting collections as JSON.
//!
//! Usage:
//!   oreline-replay --user <id> --input capture.jsonl
//!   tail -f capture.jsonl | oreline-replay --user <id> --kind sale
//!
//! Logs go to stderr; stdout carries only the report.

use anyhow::{Context, Result};
use clap::Parser;
use oreline_replay::{ReplayOptions, ReplayReport, replay};
use oreline_sync::SyncConfig;
use oreline_types::{EntityKind, UserId};
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber, filter::LevelFilter};

#[derive(Parser, Debug)]
#[command(name = "oreline-replay")]
#[command(about = "Replay captured broadcast traffic through the Oreline sync core")]
struct Args {
    /// Session user; messages it originated are treated as self-echoes
    #[arg(short, long)]
    user: String,

    /// JSON-lines capture to read (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Only replay messages of this kind (repeatable)
    #[arg(short, long = "kind")]
    kinds: Vec<EntityKind>,

    /// Page size of every collection
    #[arg(long, default_value = "10")]
    limit: u32,

    /// Apply messages originated by the session user as well
    #[arg(long)]
    keep_self_echo: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let options = ReplayOptions {
        user: UserId::parse(&args.user).context("Invalid --user")?,
        config: SyncConfig {
            default_limit: args.limit.max(1),
            suppress_self_echo: !args.keep_self_echo,
        },
        kinds: args.kinds,
    };

    let report: ReplayReport = match &args.input {
        Some(path) => {
            info!("Replaying {:?} as {}", path, options.user);
            let file = File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            replay(BufReader::new(file), &options).await
        }
        None => {
            info!("Replaying stdin as {}", options.user);
            replay(BufReader::new(tokio::io::stdin()), &options).await
        }
    }
    .context("Failed to read capture")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
