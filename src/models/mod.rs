//! Data models and structures for the network inspector

pub mod config;
pub mod latency;

// Re-export main model types
pub use config::Config;
pub use latency::Latency;
