// UI rendering module
//
// This module contains all UI rendering components for ipwatch.
// The main draw() function orchestrates rendering of all UI panels.

mod banner;
mod details;
pub mod map;
pub mod presenter;
mod status_bar;
mod tooltip;
mod users;

use crate::app::AppState;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use banner::render_banner;
use details::render_details;
use status_bar::render_status_bar;
use tooltip::render_tooltip;
use users::render_users;

/// Main UI drawing function
pub fn draw(f: &mut Frame, app: &mut AppState, backend: &str) {
    let size = f.area();

    // Main layout: banner, body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Banner
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Status bar
        ])
        .split(size);

    render_banner(f, chunks[0], app, backend);

    // Body: users on the left, details on the right
    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30), // Users
            Constraint::Percentage(70), // Details
        ])
        .split(chunks[1]);

    render_users(f, body_chunks[0], app);
    render_details(f, body_chunks[1], &mut app.presenter);

    render_status_bar(f, chunks[2], app);

    // Overlay last so it sits above every panel
    if let Some(overlay) = app.renderer.tooltip().visible() {
        render_tooltip(f, overlay);
    }
}
