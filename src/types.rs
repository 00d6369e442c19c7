//! Type definitions and aliases

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Body of the colors resource: color name to RGB(A) components
pub type ColorTable = HashMap<String, Vec<i64>>;

/// Which of the two on-screen buttons currently holds keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    /// The centered "make a request" button
    #[default]
    RequestButton,
    /// The floating action button in the bottom-end corner
    ChannelButton,
}

impl FocusTarget {
    /// Move focus to the other button
    pub fn toggle(self) -> Self {
        match self {
            FocusTarget::RequestButton => FocusTarget::ChannelButton,
            FocusTarget::ChannelButton => FocusTarget::RequestButton,
        }
    }
}

/// Outcome of a single exchange as seen by the profiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeStatus {
    /// A response arrived (any status code)
    Completed,
    /// The request failed before a response was read
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_toggle() {
        assert_eq!(FocusTarget::default(), FocusTarget::RequestButton);
        assert_eq!(FocusTarget::RequestButton.toggle(), FocusTarget::ChannelButton);
        assert_eq!(FocusTarget::ChannelButton.toggle(), FocusTarget::RequestButton);
    }

    #[test]
    fn test_color_table_decodes_from_json() {
        let table: ColorTable = serde_json::from_str(r#"{"red":[255,0,0],"black":[0,0,0,255]}"#).unwrap();
        assert_eq!(table["red"], vec![255, 0, 0]);
        assert_eq!(table["black"].len(), 4);
    }
}
