// View state owned by the renderer

use crate::sighting::{SightingRecord, User};

/// Presentation state for one dashboard session
///
/// Mutated only through the renderer: selecting a user, accepting a fetch
/// result, and the color and view toggles.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Tint IP, location and ISP cells with their key colors
    pub color_mode: bool,

    /// Show the map instead of the table
    pub map_mode: bool,

    /// User whose history was last requested
    pub active_user_id: Option<u64>,

    /// Records of the last accepted fetch
    pub current_records: Vec<SightingRecord>,

    /// User the cached records belong to
    pub current_user: Option<User>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            color_mode: true,
            map_mode: false,
            active_user_id: None,
            current_records: Vec::new(),
            current_user: None,
        }
    }
}

impl ViewState {
    /// Label for the color toggle; names the action it will perform
    pub fn color_toggle_label(&self) -> &'static str {
        if self.color_mode {
            "Colors off"
        } else {
            "Colors on"
        }
    }

    /// Label for the view toggle; names the view it will switch to
    pub fn view_toggle_label(&self) -> &'static str {
        if self.map_mode {
            "Table"
        } else {
            "Map"
        }
    }
}
