//! Opening external links with the platform's default handler

use crate::error::{AppError, Result};
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Something that can hand a URL to the outside world
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<()>;
}

/// Spawns `open` on macOS, `cmd /C start` on Windows and `xdg-open` elsewhere
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUrlOpener;

impl SystemUrlOpener {
    /// The command that would open `url` on this platform
    pub fn command_for(url: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            // The empty string is the window title `start` expects first
            cmd.args(["/C", "start", "", url]);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            cmd
        }
    }
}

impl UrlOpener for SystemUrlOpener {
    fn open(&self, url: &str) -> Result<()> {
        let parsed = url::Url::parse(url)
            .map_err(|e| AppError::navigation(format!("Refusing to open invalid URL '{}': {}", url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(AppError::navigation(format!("Refusing to open non-web URL: {}", url)));
        }

        // Not waited on: the handler may live as long as the browser does
        Self::command_for(parsed.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| AppError::navigation(format!("Failed to launch URL handler: {}", e)))
    }
}

/// Destination of the floating action button
#[derive(Clone)]
pub struct Navigator {
    opener: Arc<dyn UrlOpener>,
    channel_url: String,
}

impl Navigator {
    pub fn new(opener: Arc<dyn UrlOpener>, channel_url: impl Into<String>) -> Self {
        Self {
            opener,
            channel_url: channel_url.into(),
        }
    }

    pub fn channel_url(&self) -> &str {
        &self.channel_url
    }

    pub fn open_channel(&self) -> Result<()> {
        self.opener.open(&self.channel_url)
    }
}
