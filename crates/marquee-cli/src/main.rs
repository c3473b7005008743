//! Marquee CLI - Headless template resolution harness
//!
//! Features:
//! - Replay host notifications from a JSON file
//! - Resolve analytics templates against the resulting state
//! - List the tokens of a profile

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;

/// Marquee CLI - Player analytics template resolver
#[derive(Parser)]
#[command(name = "marquee")]
#[command(author = "Purple Squirrel Media")]
#[command(version)]
#[command(about = "Resolve player analytics templates against content metadata", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json); accepted before or after the subcommand
    #[arg(short, long, global = true, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one or more templates
    Resolve {
        /// Templates to resolve, e.g. "[SHOW_NAME]|[DAY_PART]"
        #[arg(required = true)]
        templates: Vec<String>,

        /// JSON facade configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// JSON array of notifications to apply, in order
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Token profile: full, reduced, or a comma-separated token list
        #[arg(short, long)]
        profile: Option<String>,

        /// Page query string, e.g. "?autoplay=true"
        #[arg(short, long)]
        query: Option<String>,

        /// User-agent string
        #[arg(long)]
        user_agent: Option<String>,

        /// Player address when running top-level
        #[arg(long, conflicts_with = "referrer")]
        player_url: Option<String>,

        /// Embedding page address when running in a frame
        #[arg(long)]
        referrer: Option<String>,
    },

    /// List the tokens of a profile
    Tokens {
        /// Token profile: full, reduced, or a comma-separated token list
        #[arg(short, long, default_value = "full")]
        profile: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_writer(std::io::stderr)
        .init();

    marquee_core::init();

    match cli.command {
        Commands::Resolve {
            templates,
            config,
            events,
            profile,
            query,
            user_agent,
            player_url,
            referrer,
        } => {
            let overrides = commands::Overrides {
                profile,
                query,
                user_agent,
                player_url,
                referrer,
            };
            commands::resolve(&templates, config, events, overrides, &cli.format)?;
        }
        Commands::Tokens { profile } => {
            commands::tokens(&profile, &cli.format)?;
        }
    }

    Ok(())
}
