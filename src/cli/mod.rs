//! Command-line interface

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Network Inspector - measure how long one HTTP request takes
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "nin")]
#[command(version, about, long_about = None)]
#[command(after_help = crate::config::EnvManager::display_env_help())]
pub struct Cli {
    /// Resource to fetch instead of the built-in colors.json
    #[arg(long)]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, value_parser = parse_timeout)]
    pub timeout: Option<u64>,

    /// Force the HTTP inspector on
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "no_inspect")]
    pub inspect: bool,

    /// Force the HTTP inspector off
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_inspect: bool,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error, fatal)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Measure once, print the result and exit without the TUI
    #[arg(long)]
    pub once: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Inspector override from the command line, if any
    pub fn inspector_override(&self) -> Option<bool> {
        match (self.inspect, self.no_inspect) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        !self.no_color && supports_color()
    }
}

/// Parse a timeout in whole seconds
fn parse_timeout(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid timeout: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid timeout: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Timeout must be greater than 0".to_string())
            } else if secs > 300 {
                Err("Timeout cannot exceed 300 seconds".to_string())
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    true
}
