//! Command-line interface for chat-overlay.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// chat-overlay - turns chat events on stdin into render effects on stdout
#[derive(Parser, Debug)]
#[command(name = "chat-overlay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: config.yaml in the platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level, overriding DEBUG_LEVEL
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    pub print_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Runtime options passed from CLI to the application
#[derive(Clone, Debug, Default)]
pub struct RuntimeOptions {
    pub config_path: Option<PathBuf>,
    pub log_level: Option<LevelFilter>,
}

/// Result of CLI processing
pub enum CliResult {
    /// Continue with normal startup
    Continue(RuntimeOptions),
    /// Print the effective config and exit
    PrintConfig(RuntimeOptions),
}

impl Cli {
    pub fn into_result(self) -> CliResult {
        let options = RuntimeOptions {
            config_path: self.config,
            log_level: self.log_level.map(LevelFilter::from),
        };
        if self.print_config {
            CliResult::PrintConfig(options)
        } else {
            CliResult::Continue(options)
        }
    }
}

/// Process CLI arguments
pub fn process_cli() -> CliResult {
    Cli::parse().into_result()
}
