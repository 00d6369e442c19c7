//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::{AppError, Result},
    logging::LogLevel,
    models::Config,
};
use std::path::PathBuf;

/// Layers defaults, `.env`, the process environment and CLI flags, in that order
pub struct ConfigParser {
    cli: Cli,
    env_file: PathBuf,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            env_file: PathBuf::from(".env"),
        }
    }

    /// Read a different env file instead of `./.env`
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file_from(&self.env_file, self.cli.debug)?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config)?;

        config.validate()?;
        Ok(config)
    }

    fn apply_cli_overrides(&self, config: &mut Config) -> Result<()> {
        if let Some(url) = &self.cli.url {
            config.target_url = url.clone();
        }

        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = timeout;
        }

        if let Some(enabled) = self.cli.inspector_override() {
            config.inspector_enabled = enabled;
        }

        if let Some(path) = &self.cli.log_file {
            config.log_file = Some(path.clone());
        }

        if let Some(level) = &self.cli.log_level {
            config.log_level = level
                .parse::<LogLevel>()
                .map_err(|e| AppError::config(format!("Invalid --log-level '{}': {}", level, e)))?;
        }

        if self.cli.no_color {
            config.enable_color = false;
        }

        // CLI-only
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        Ok(())
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let log_file = config
        .log_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(mode default)".to_string());

    [
        format!("Target URL: {}", config.target_url),
        format!("Channel URL: {}", config.channel_url),
        format!("Timeout: {}s", config.timeout_seconds),
        format!("Inspector: {}", if config.inspector_enabled { "enabled" } else { "disabled" }),
        format!("Log Level: {}", config.log_level.as_str()),
        format!("Log File: {}", log_file),
        format!("Tick: {}ms", config.tick_ms),
        format!("Color Output: {}", config.enable_color),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ]
    .join("\n")
}
