// Default theme functions
//
// Small color helpers shared by the panels: toggle indicators, map marker
// fill and tinted pill styles.

use ratatui::style::{Color, Style};

use super::hue::Hsl;
use super::{ACTIVE_GREEN, NEUTRAL_TEXT, TOOLTIP_FG};

/// Interpolate between two RGB colors based on a ratio (0.0 ~ 1.0)
///
/// # Arguments
/// * `color1` - Starting color as (r, g, b) tuple
/// * `color2` - Ending color as (r, g, b) tuple
/// * `ratio` - Interpolation ratio (0.0 = color1, 1.0 = color2)
pub fn interpolate_color(color1: (u8, u8, u8), color2: (u8, u8, u8), ratio: f32) -> Color {
    let ratio = ratio.clamp(0.0, 1.0);
    let r = (color1.0 as f32 + (color2.0 as f32 - color1.0 as f32) * ratio) as u8;
    let g = (color1.1 as f32 + (color2.1 as f32 - color1.1 as f32) * ratio) as u8;
    let b = (color1.2 as f32 + (color2.2 as f32 - color1.2 as f32) * ratio) as u8;
    Color::Rgb(r, g, b)
}

/// Indicator color for an on/off toggle
pub fn toggle_color(enabled: bool) -> Color {
    if enabled {
        ACTIVE_GREEN
    } else {
        NEUTRAL_TEXT
    }
}

/// Fill color for a map marker, shading from blue to orange as the
/// cluster grows towards `cap` sightings
pub fn marker_color(count: usize, cap: usize) -> Color {
    let ratio = if cap == 0 {
        1.0
    } else {
        count.min(cap) as f32 / cap as f32
    };
    interpolate_color((51, 136, 255), (255, 140, 0), ratio)
}

/// Style for a table pill: tinted background when a key color is given,
/// plain neutral text otherwise
pub fn pill_style(tint: Option<Hsl>) -> Style {
    match tint {
        Some(hsl) => Style::default().bg(hsl.to_color()).fg(TOOLTIP_FG),
        None => Style::default().fg(NEUTRAL_TEXT),
    }
}
