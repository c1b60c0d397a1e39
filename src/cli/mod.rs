//! CLI command definitions and handlers

mod clean;
mod exclude;
mod follow_up;
mod inspect;
mod scan;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vbascout::config::load_bot_config;

/// vbascout - finds VBA code that GitHub mis-tags and line-ending setups
/// that break VBA imports
#[derive(Parser, Debug)]
#[command(name = "vbascout")]
#[command(
    version,
    about = "GitHub bot that flags mis-tagged VBA code and .gitattributes line-ending problems",
    long_about = "vbascout searches GitHub for repositories with VBA code saved under the \
wrong extension (.vb, .vbs, .txt, none) or with .gitattributes settings that check \
.frm/.cls files out with LF line endings, opens tracking issues about them and \
follows up until they are fixed.\n\n\
Network commands need GITHUB_TOKEN and GITHUB_REPOSITORY (the tracking repository).",
    after_help = "\
Examples:
  vbascout scan --pages 2                      Search, scan and open issues
  vbascout scan --query \"language:vbnet\" --dry-run
  vbascout follow-up                           Re-check every open tracking issue
  vbascout exclude --issue-id 12 --comment-id 345
  vbascout inspect ./my-workbook-repo          Run the checks on a local checkout"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Config file (default: vbascout.toml)
    #[arg(long, global = true, env = "VBASCOUT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Re-check open tracking issues and comment, close or relabel them
    FollowUp {
        /// Only look at the first N tracking issues
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search GitHub, scan each repository and open tracking issues
    Scan {
        /// Search query (default: search.query from the config)
        #[arg(long)]
        query: Option<String>,

        /// Number of result pages to scan (default: search.pages from the config)
        #[arg(long)]
        pages: Option<u32>,

        /// Scan and report, but do not open issues
        #[arg(long)]
        dry_run: bool,
    },

    /// Add the issue's user to the exclusion list if the comment says "stop"
    Exclude {
        /// Tracking issue number
        #[arg(long, alias = "issue_id")]
        issue_id: u64,

        /// Comment id
        #[arg(long, alias = "comment_id")]
        comment_id: u64,
    },

    /// Run the checks on a local checkout
    Inspect {
        /// Path to the checkout
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Language GitHub reports for the repository (enables the extension checks when not VBA)
        #[arg(long)]
        language: Option<String>,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Remove leftover checkouts from the scratch folder
    Clean {
        /// Show what would be removed
        #[arg(long)]
        dry_run: bool,
    },

    /// Show version
    Version,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = load_bot_config(cli.config.as_deref());

    match cli.command {
        Commands::FollowUp { limit } => follow_up::run(&config, limit),

        Commands::Scan {
            query,
            pages,
            dry_run,
        } => scan::run(&config, query, pages, dry_run),

        Commands::Exclude {
            issue_id,
            comment_id,
        } => exclude::run(&config, issue_id, comment_id),

        Commands::Inspect {
            path,
            language,
            json,
        } => inspect::run(&path, language, json),

        Commands::Clean { dry_run } => clean::run(&config.paths.scratch_dir, dry_run),

        Commands::Version => {
            println!("vbascout {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
