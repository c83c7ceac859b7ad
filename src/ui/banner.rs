// Banner rendering module
//
// Renders the top header with the app name, backend and global stats.

use crate::app::{AppState, UsersStatus};
use crate::theme::{ACCENT_BLUE, AMBER, ERROR_RED, NEUTRAL_TEXT};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn render_banner(f: &mut Frame, area: Rect, app: &AppState, backend: &str) {
    let users_stat = match &app.users_status {
        UsersStatus::Loading => Span::styled("[users: loading]", Style::default().fg(AMBER)),
        UsersStatus::Loaded => Span::styled(
            format!("[users: {}]", app.users.len()),
            Style::default().fg(NEUTRAL_TEXT),
        ),
        UsersStatus::Failed(_) => Span::styled("[users: error]", Style::default().fg(ERROR_RED)),
    };

    let active = app
        .renderer
        .state()
        .current_user
        .as_ref()
        .map(|u| format!(" [viewing: {}]", u.display_name()))
        .unwrap_or_default();

    let banner_text = vec![Line::from(vec![
        Span::styled(
            " ipwatch ",
            Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("─ IP history dashboard ─ {} ", backend),
            Style::default().fg(NEUTRAL_TEXT),
        ),
        users_stat,
        Span::styled(active, Style::default().fg(ACCENT_BLUE)),
    ])];

    let banner = Paragraph::new(banner_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(ACCENT_BLUE)),
        )
        .alignment(Alignment::Left);

    f.render_widget(banner, area);
}
