//! Command-line interface definitions.

pub mod check;
pub mod run;
pub mod scan;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// sellwatch - GGSel seller notifications in Telegram.
#[derive(Parser, Debug)]
#[command(name = "sellwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the bot (foreground, ctrl-c to stop)
    Run(RunArgs),

    /// One-shot check with alerts printed to stdout
    Scan(ScanArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `sellwatch check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
    /// Probe seller-API access (login, chats, sales)
    Api(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,
}

/// Arguments for the `scan` subcommand.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Only check for unread buyer messages
    #[arg(long, conflicts_with = "orders")]
    pub messages: bool,

    /// Only check for new paid orders
    #[arg(long, conflicts_with = "messages")]
    pub orders: bool,
}
