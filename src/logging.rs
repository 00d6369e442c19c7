//! Structured logging for the network inspector
//!
//! The interactive screen owns the terminal, so log output is routed through a
//! [`LogSink`]: the console in headless mode, an append-only file behind the
//! TUI, or an in-memory buffer in tests. Entries carry a session id shared by
//! every logger created from one [`LoggerFactory`], and optional correlation
//! ids that tie the lines of one HTTP exchange together.

use crate::error::{AppError, Result};
use crate::models::Config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Trace level - most detailed
    Trace = 0,
    /// Debug level - detailed information for debugging
    Debug = 1,
    /// Info level - general application information
    Info = 2,
    /// Warning level - potentially harmful situations
    Warn = 3,
    /// Error level - error events but application can continue
    Error = 4,
    /// Fatal level - severe error events that cause application termination
    Fatal = 5,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Trace => "\x1b[37m",
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
            LogLevel::Fatal => "\x1b[35m",
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Correlation ID for tracking related events
    pub correlation_id: Option<String>,
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

/// Where formatted log lines end up
#[derive(Debug, Clone)]
pub enum LogSink {
    /// stdout, or stderr for warnings and above
    Console,
    /// stderr for every level, leaving stdout to the program's output
    Stderr,
    /// Append to a file shared by every logger
    File(Arc<Mutex<File>>),
    /// Keep lines in memory
    Buffer(Arc<Mutex<Vec<String>>>),
    /// Drop everything
    Discard,
}

impl LogSink {
    /// Open (or create) an append-only log file
    pub fn file(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| AppError::io(format!("Failed to create log directory {}: {}", parent.display(), e)))?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::io(format!("Failed to open log file {}: {}", path.display(), e)))?;

        Ok(Self::File(Arc::new(Mutex::new(file))))
    }

    /// In-memory sink plus a handle to read what was written
    pub fn buffer() -> (Self, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        (Self::Buffer(lines.clone()), lines)
    }

    fn is_console(&self) -> bool {
        matches!(self, LogSink::Console | LogSink::Stderr)
    }

    fn write_line(&self, level: LogLevel, line: &str) {
        match self {
            LogSink::Console => {
                if level >= LogLevel::Warn {
                    let _ = writeln!(io::stderr(), "{}", line);
                } else {
                    let _ = writeln!(io::stdout(), "{}", line);
                }
            }
            LogSink::Stderr => {
                let _ = writeln!(io::stderr(), "{}", line);
            }
            LogSink::File(file) => {
                if let Ok(mut file) = file.lock() {
                    let _ = writeln!(file, "{}", line);
                }
            }
            LogSink::Buffer(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(line.to_string());
                }
            }
            LogSink::Discard => {}
        }
    }
}

/// Shared logging context for correlation and session tracking
#[derive(Debug, Default)]
struct LogContext {
    session_id: Option<String>,
    context_fields: BTreeMap<String, serde_json::Value>,
}

/// Logger implementation with multiple output formats
#[derive(Debug, Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    format: LogFormat,
    name: String,
    sink: LogSink,
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Create a console logger at info level
    pub fn new(name: String) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            format: LogFormat::Console,
            name,
            sink: LogSink::Console,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger with specific configuration
    pub fn with_config(name: String, config: &Config, sink: LogSink) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug.min(config.log_level)
        } else {
            config.log_level
        };

        Self {
            min_level,
            use_color: config.enable_color && sink.is_console(),
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name,
            sink,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set minimum log level
    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Set output format
    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }

    /// Enable or disable colored output
    pub fn set_color(&mut self, use_color: bool) {
        self.use_color = use_color;
    }

    /// Set session correlation ID
    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    /// Add context field for all subsequent log entries
    pub async fn add_context_field<T: Serialize>(&self, key: String, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            let mut context = self.context.write().await;
            context.context_fields.insert(key, json_value);
        }
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn trace(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Trace, message)
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    pub fn fatal(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Fatal, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    async fn write_entry(&self, mut entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }

        let context = self.context.read().await;
        if let Some(session_id) = &context.session_id {
            entry.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
        }
        for (key, value) in &context.context_fields {
            entry.fields.insert(key.clone(), value.clone());
        }
        drop(context);

        let output = match self.format {
            LogFormat::Console => self.format_console(&entry),
            LogFormat::Json => self.format_json(&entry),
            LogFormat::Compact => self.format_compact(&entry),
        };

        self.sink.write_line(entry.level, &output);
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        if let Some(correlation_id) = &entry.correlation_id {
            let short: String = correlation_id.chars().take(8).collect();
            output.push_str(&format!(" [{}]", short));
        }

        // session_id is noise on a console line; it stays in JSON output
        let fields: Vec<String> = entry.fields.iter()
            .filter(|(k, _)| k.as_str() != "session_id")
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        if !fields.is_empty() {
            output.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}", entry.message),
        }
    }

    fn format_compact(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%H:%M:%S");
        format!("{} {} {}: {}",
            timestamp,
            entry.level.as_str().chars().next().unwrap_or('?'),
            entry.logger,
            entry.message
        )
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                correlation_id: None,
                fields: BTreeMap::new(),
            },
        }
    }

    /// Add a correlation ID
    pub fn correlation_id(mut self, id: &str) -> Self {
        self.entry.correlation_id = Some(id.to_string());
        self
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_recoverable", error.is_recoverable())
            .field("error_exit_code", error.exit_code())
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        self.logger.write_entry(self.entry).await;
    }
}

/// Headers whose values never reach the log
pub const REDACTED_HEADERS: &[&str] = &["authorization", "proxy-authorization", "cookie", "set-cookie"];

fn redact_headers(headers: &[(String, String)]) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            if REDACTED_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
                (name.clone(), "██".to_string())
            } else {
                (name.clone(), value.clone())
            }
        })
        .collect()
}

/// Specialized logger for HTTP exchanges
#[derive(Debug, Clone)]
pub struct NetworkLogger {
    logger: Logger,
}

impl NetworkLogger {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Log the request line and request headers
    pub async fn log_request(&self, correlation_id: &str, method: &str, url: &str, headers: &[(String, String)]) {
        self.logger.info(&format!("--> {} {}", method, url))
            .correlation_id(correlation_id)
            .field("method", method)
            .field("url", url)
            .field("headers", redact_headers(headers))
            .log()
            .await;
    }

    /// Log the status line, response headers and elapsed time
    pub async fn log_response(
        &self,
        correlation_id: &str,
        url: &str,
        status_code: u16,
        headers: &[(String, String)],
        duration_ms: f64,
    ) {
        let success = (200..400).contains(&status_code);
        let level = if success { LogLevel::Info } else { LogLevel::Warn };

        self.logger.log(level, &format!("<-- {} {} ({:.0}ms)", status_code, url, duration_ms))
            .correlation_id(correlation_id)
            .field("status_code", status_code)
            .field("success", success)
            .field("duration_ms", duration_ms)
            .field("headers", redact_headers(headers))
            .log()
            .await;
    }

    /// Log an exchange that never produced a response
    pub async fn log_failure(&self, correlation_id: &str, url: &str, error: &AppError, duration_ms: f64) {
        self.logger.warn(&format!("<-- HTTP FAILED: {}", error))
            .correlation_id(correlation_id)
            .field("url", url)
            .field("duration_ms", duration_ms)
            .error_info(error)
            .log()
            .await;
    }
}

/// Error event logger with enhanced context
#[derive(Debug, Clone)]
pub struct ErrorEventLogger {
    logger: Logger,
}

impl ErrorEventLogger {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Log an application error with full context
    pub async fn log_error(&self, error: &AppError, context: Option<&str>, correlation_id: Option<&str>) {
        let message = if let Some(ctx) = context {
            format!("{}: {}", ctx, error)
        } else {
            error.to_string()
        };

        let mut builder = self.logger.error(&message)
            .error_info(error);

        if let Some(id) = correlation_id {
            builder = builder.correlation_id(id);
        }

        if let Some(ctx) = context {
            builder = builder.field("context", ctx);
        }

        builder.log().await;
    }
}

/// Builds loggers that share one sink and one session
pub struct LoggerFactory {
    config: Config,
    sink: LogSink,
    session_id: String,
    context: Arc<RwLock<LogContext>>,
}

impl LoggerFactory {
    /// Create a new logger factory
    pub fn new(config: Config, sink: LogSink) -> Self {
        let session_id = Uuid::new_v4().to_string();
        let context = LogContext {
            session_id: Some(session_id.clone()),
            context_fields: BTreeMap::new(),
        };

        Self {
            config,
            sink,
            session_id,
            context: Arc::new(RwLock::new(context)),
        }
    }

    /// Create a logger with a specific name
    pub fn create_logger(&self, name: &str) -> Logger {
        let mut logger = Logger::with_config(name.to_string(), &self.config, self.sink.clone());
        logger.context = self.context.clone();
        logger
    }

    /// Create a network logger
    pub fn create_network_logger(&self) -> NetworkLogger {
        NetworkLogger::new(self.create_logger("NET"))
    }

    /// Create an error event logger
    pub fn create_error_logger(&self) -> ErrorEventLogger {
        ErrorEventLogger::new(self.create_logger("ERR"))
    }

    /// Get session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}
