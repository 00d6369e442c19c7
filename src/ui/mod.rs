//! Terminal rendering

pub mod inspector;
pub mod screen;
pub mod theme;

pub use screen::{render, ScreenLayout, ScreenView};
pub use theme::Theme;
