//! Network Inspector
//!
//! A single-screen terminal application that issues one HTTP GET request on
//! demand, measures how long it took and shows the result. Debug builds wrap
//! the HTTP client with an inspector that logs headers and profiles every
//! exchange.

pub mod app;
pub mod cli;
pub mod config;
pub mod client;
pub mod error;
pub mod events;
pub mod inspector;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod probe;
pub mod state;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, Latency};
pub use client::{HttpClient, NetworkClient, ClientFactory};
pub use probe::{LatencyProbe, RequestDispatcher};
pub use state::{LatencyState, ScreenState};
pub use navigation::{Navigator, UrlOpener, SystemUrlOpener};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build metadata injected by build.rs
pub mod build_info {
    pub const BUILD_TIME: &str = env!("BUILD_TIME");
    pub const GIT_COMMIT: &str = env!("GIT_COMMIT");
    pub const BUILD_PROFILE: &str = env!("BUILD_PROFILE");
    pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");
}

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    /// The JSON resource every measurement fetches
    pub const TARGET_URL: &str =
        "https://raw.githubusercontent.com/Nerdy-Things/04-android-network-inspector/master/colors.json";
    /// Opened by the floating action button
    pub const CHANNEL_URL: &str = "https://www.youtube.com/@Nerdy.Things";

    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_TICK: Duration = Duration::from_millis(100);
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    pub const DEFAULT_LOG_LEVEL: &str = "info";
    pub const LOG_FILE_NAME: &str = "network-inspector.log";

    /// Number of exchanges the profiler keeps before evicting the oldest
    pub const PROFILER_CAPACITY: usize = 64;

    /// Inspector is on for debug builds and off for release builds
    pub const fn inspector_default() -> bool {
        cfg!(debug_assertions)
    }

    pub fn user_agent() -> String {
        format!("{}/{}", super::PKG_NAME, super::VERSION)
    }
}
