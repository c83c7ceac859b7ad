// Theme module - Color constants and key coloring
//
// This module provides the panel palette for ipwatch and re-exports the
// deterministic key colors used to tint IP, location and ISP cells.

pub mod default;
pub mod hue;

use ratatui::style::Color;

/// Primary accent color - used for borders, titles, active selection
/// RGB: (122, 162, 247)
pub const ACCENT_BLUE: Color = Color::Rgb(122, 162, 247);

/// Warning indicator - used for loading states and the map fallback notice
/// RGB: (255, 158, 100)
pub const AMBER: Color = Color::Rgb(255, 158, 100);

/// Error indicator - used for fetch failures
/// RGB: (247, 118, 142)
pub const ERROR_RED: Color = Color::Rgb(247, 118, 142);

/// Active toggle indicator
/// RGB: (158, 206, 106)
pub const ACTIVE_GREEN: Color = Color::Rgb(158, 206, 106);

/// Neutral text - used for table cells when color mode is off
/// RGB: (169, 177, 214)
pub const NEUTRAL_TEXT: Color = Color::Rgb(169, 177, 214);

/// Tooltip overlay background (#05070f)
pub const TOOLTIP_BG: Color = Color::Rgb(5, 7, 15);

/// Tooltip overlay text (#f5f7ff)
pub const TOOLTIP_FG: Color = Color::Rgb(245, 247, 255);

/// Tooltip overlay border (#2a3242)
pub const TOOLTIP_BORDER: Color = Color::Rgb(42, 50, 66);

pub use default::*;
pub use hue::{ColorKey, Hsl};
