//! Latency measurement value

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Elapsed wall-clock time of one request, in whole milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Latency(u64);

impl Latency {
    /// Create a latency from a millisecond count
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Truncate a monotonic duration to whole milliseconds
    pub fn from_duration(duration: Duration) -> Self {
        Self(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    /// Milliseconds elapsed
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// The sentence shown on screen for this measurement
    pub fn message(&self) -> String {
        format!("The latest request took {} ms", self.0)
    }
}

impl fmt::Display for Latency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ms", self.0)
    }
}

impl From<Duration> for Latency {
    fn from(duration: Duration) -> Self {
        Self::from_duration(duration)
    }
}
