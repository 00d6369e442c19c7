//! Configuration data model and validation

use crate::logging::LogLevel;
use crate::types::{Result, AppError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON resource fetched by every measurement
    #[serde(default = "default_target_url")]
    pub target_url: String,

    /// Page opened by the floating action button
    #[serde(default = "default_channel_url")]
    pub channel_url: String,

    /// Request timeout duration
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Attach the header logger and profiler to the HTTP client
    #[serde(default = "default_inspector_enabled")]
    pub inspector_enabled: bool,

    /// Minimum level written to the log sink
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    /// Log destination; `None` means the mode-specific default
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// UI event poll interval in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: default_target_url(),
            channel_url: default_channel_url(),
            timeout_seconds: default_timeout_secs(),
            inspector_enabled: default_inspector_enabled(),
            log_level: default_log_level(),
            log_file: None,
            enable_color: default_enable_color(),
            tick_ms: default_tick_ms(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Get the UI tick as Duration
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Log file used by the interactive screen when none was configured
    pub fn tui_log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(crate::defaults::LOG_FILE_NAME))
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        Self::validate_web_url("target", &self.target_url)?;
        Self::validate_web_url("channel", &self.channel_url)?;

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > 300 {
            return Err(AppError::config("Timeout cannot exceed 300 seconds"));
        }

        if !(10..=1000).contains(&self.tick_ms) {
            return Err(AppError::config(format!("Tick must be between 10 and 1000 ms, got: {}", self.tick_ms)));
        }

        Ok(())
    }

    fn validate_web_url(label: &str, url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(AppError::config(format!("The {} URL cannot be empty", label)));
        }

        let parsed = url::Url::parse(url)
            .map_err(|e| AppError::config(format!("Invalid {} URL '{}': {}", label, url, e)))?;

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(AppError::config(format!("Unsupported {} URL scheme '{}': {}", label, scheme, url)));
            }
        }

        if parsed.host().is_none() {
            return Err(AppError::config(format!("The {} URL must have a host: {}", label, url)));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(target_url) = std::env::var("NIN_TARGET_URL") {
            let target_url = target_url.trim();
            if !target_url.is_empty() {
                self.target_url = target_url.to_string();
            }
        }

        if let Ok(timeout) = std::env::var("NIN_TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid NIN_TIMEOUT_SECONDS value '{}': {}", timeout, e)))?;
        }

        if let Ok(inspect) = std::env::var("NIN_INSPECT") {
            self.inspector_enabled = inspect.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid NIN_INSPECT value '{}': {}", inspect, e)))?;
        }

        if let Ok(level) = std::env::var("NIN_LOG_LEVEL") {
            self.log_level = level.parse()
                .map_err(|e| AppError::config(format!("Invalid NIN_LOG_LEVEL value '{}': {}", level, e)))?;
        }

        if let Ok(log_file) = std::env::var("NIN_LOG_FILE") {
            let log_file = log_file.trim();
            if !log_file.is_empty() {
                self.log_file = Some(PathBuf::from(log_file));
            }
        }

        if let Ok(enable_color) = std::env::var("NIN_ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid NIN_ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        if let Ok(tick) = std::env::var("NIN_TICK_MS") {
            self.tick_ms = tick.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid NIN_TICK_MS value '{}': {}", tick, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_target_url() -> String {
    crate::defaults::TARGET_URL.to_string()
}

fn default_channel_url() -> String {
    crate::defaults::CHANNEL_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_inspector_enabled() -> bool {
    crate::defaults::inspector_default()
}

fn default_log_level() -> LogLevel {
    crate::defaults::DEFAULT_LOG_LEVEL.parse().unwrap_or(LogLevel::Info)
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

fn default_tick_ms() -> u64 {
    crate::defaults::DEFAULT_TICK.as_millis() as u64
}
