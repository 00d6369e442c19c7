//! Non-fatal configuration checks

use crate::{error::Result, models::Config};
use colored::Colorize;

/// Runs the hard checks of [`Config::validate`] and collects soft warnings
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration, returning warnings for anything odd but allowed
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_target_url(&config.target_url));
        warnings.extend(Self::validate_inspector(config));
        warnings.extend(Self::validate_timing(config));
        Ok(warnings)
    }

    fn validate_target_url(target_url: &str) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        let Ok(parsed) = url::Url::parse(target_url) else {
            return warnings;
        };

        if parsed.scheme() == "http" {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Target '{}' uses HTTP instead of HTTPS; TLS setup is not part of the measurement", target_url),
            ));
        }

        let local = match parsed.host() {
            Some(url::Host::Ipv4(ip)) => ip.is_private() || ip.is_loopback(),
            Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
            Some(url::Host::Domain(domain)) => domain == "localhost",
            None => false,
        };
        if local {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Target '{}' is on a private or local network", target_url),
            ));
        }

        if target_url != crate::defaults::TARGET_URL && !parsed.path().ends_with(".json") {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Target '{}' does not look like a JSON resource; non-JSON bodies fail to decode", target_url),
            ));
        }

        warnings
    }

    fn validate_inspector(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.inspector_enabled && !cfg!(debug_assertions) {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                "HTTP inspector is enabled in a release build; request and response headers will be logged".to_string(),
            ));
        }

        warnings
    }

    fn validate_timing(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.timeout_seconds > 60 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Timeout of {}s is long; a stalled request keeps the busy indicator up until then", config.timeout_seconds),
            ));
        }

        if config.tick_ms > 500 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("UI tick of {}ms may make the screen feel sluggish", config.tick_ms),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        if !use_color {
            return format!("{} {}", tag, self.message);
        }

        let tag = match self.level {
            ValidationLevel::Info => tag.blue(),
            ValidationLevel::Warning => tag.yellow().bold(),
        };
        format!("{} {}", tag, self.message)
    }
}

/// Validate configuration and return warnings
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
