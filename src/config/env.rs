//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::logging::LogLevel;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load `.env` from the current directory if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific env file; variables already set in the process win
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "NIN_TARGET_URL" => {
                let parsed = url::Url::parse(value.trim())
                    .map_err(|e| AppError::config(format!("Invalid NIN_TARGET_URL value '{}': {}", value, e)))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(AppError::config(format!("NIN_TARGET_URL must use http or https: {}", value)));
                }
            }
            "NIN_TIMEOUT_SECONDS" => {
                let timeout: u64 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid NIN_TIMEOUT_SECONDS value '{}': {}", value, e)))?;
                if timeout == 0 || timeout > 300 {
                    return Err(AppError::config(format!("NIN_TIMEOUT_SECONDS must be between 1 and 300, got: {}", timeout)));
                }
            }
            "NIN_INSPECT" | "NIN_ENABLE_COLOR" => {
                value.trim().parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            "NIN_LOG_LEVEL" => {
                value.parse::<LogLevel>()
                    .map_err(|e| AppError::config(format!("Invalid NIN_LOG_LEVEL value '{}': {}", value, e)))?;
            }
            "NIN_TICK_MS" => {
                let tick: u64 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid NIN_TICK_MS value '{}': {}", value, e)))?;
                if !(10..=1000).contains(&tick) {
                    return Err(AppError::config(format!("NIN_TICK_MS must be between 10 and 1000, got: {}", tick)));
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("NIN_TARGET_URL", "JSON resource fetched by each request", crate::defaults::TARGET_URL),
            ("NIN_TIMEOUT_SECONDS", "Request timeout in seconds (1-300)", "30"),
            ("NIN_INSPECT", "Attach the HTTP inspector (true/false)", "true"),
            ("NIN_LOG_FILE", "Log file path", "/tmp/network-inspector.log"),
            ("NIN_LOG_LEVEL", "Minimum log level (trace..fatal)", "info"),
            ("NIN_ENABLE_COLOR", "Enable colored output (true/false)", "true"),
            ("NIN_TICK_MS", "Screen refresh interval in ms (10-1000)", "100"),
        ]
    }

    /// Environment variable help, appended to `--help`
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Environment Variables:\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<20} {} (e.g. {})\n", var, description, example));
        }

        help.push_str("\nConfiguration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Warnings for every set variable that would fail to parse
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(name, _, _)| {
                let value = std::env::var(name).ok()?;
                Self::validate_env_var(name, &value).err().map(|e| e.to_string())
            })
            .collect()
    }
}
