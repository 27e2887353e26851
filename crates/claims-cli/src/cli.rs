//! CLI argument definitions for the `claims` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use claims_model::FraudCategory;

#[derive(Parser)]
#[command(
    name = "claims",
    version,
    about = "Insurance claim ingestion and fraud risk review",
    long_about = "Load a claims file, score every claim for fraud risk against the mean \
                  amount of its diagnosis, and browse the stored results.\n\n\
                  Run `claims ingest` first; the other commands read what it stored."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Claims database (default: data/claims.db).
    #[arg(long = "database", value_name = "PATH", global = true)]
    pub database: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load, clean, score, and store a claims file.
    Ingest(IngestArgs),

    /// Show a page of stored claims.
    List(ListArgs),

    /// Print stored claims as JSON.
    Feed(FeedArgs),

    /// Show totals, the risk distribution, and the most suspicious claims.
    Dashboard,
}

#[derive(Args)]
pub struct IngestArgs {
    /// Claims file to load (default: data/claims.csv).
    #[arg(long = "input", value_name = "PATH")]
    pub input: Option<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Case-insensitive text matched against diagnosis or gender.
    #[arg(long = "search", short = 's', visible_alias = "q", value_name = "TEXT")]
    pub search: Option<String>,

    /// Only show claims in this risk category.
    #[arg(long = "category", value_enum)]
    pub category: Option<CategoryArg>,

    /// Page number, starting at 1.
    #[arg(long = "page", default_value_t = 1)]
    pub page: u64,

    /// Claims per page (default from config, otherwise 10).
    #[arg(long = "per-page", value_name = "N")]
    pub per_page: Option<u64>,
}

#[derive(Args)]
pub struct FeedArgs {
    /// Rows to skip.
    #[arg(long = "offset", default_value_t = 0)]
    pub offset: u64,

    /// Maximum rows to print (default from config, otherwise 100).
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<u64>,
}

/// CLI risk category choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Low,
    Medium,
    High,
}

impl From<CategoryArg> for FraudCategory {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Low => FraudCategory::Low,
            CategoryArg::Medium => FraudCategory::Medium,
            CategoryArg::High => FraudCategory::High,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
