use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// A tool to summarize and selectively expand NETCONF device trace logs
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Expansion expression (e.g. "%edit-config;/config/interfaces");
    /// may be given multiple times, any one matching is enough
    #[arg(short, long, global = true)]
    pub expand: Vec<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write a copy of the rendered output to this file
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Control colored output
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Path to a TOML config file overriding the built-in defaults
    #[arg(long, global = true, env = "TROVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Drop messages with no classifiable operation type
    #[arg(long, global = true)]
    pub drop_typeless: bool,

    /// Increase diagnostic verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress parse diagnostics on stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a per-message overview of one or more trace files
    Overview {
        /// Trace files to process, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Aggregate per-operation-type statistics across trace files
    Stats {
        /// Trace files to process, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
