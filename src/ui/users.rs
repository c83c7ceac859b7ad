// User list rendering module
//
// Renders the left panel: search field, limit field and the scrollable
// list of users with their meta lines.

use crate::app::{AppState, InputMode, UsersStatus};
use crate::theme::{ACCENT_BLUE, AMBER, ERROR_RED, NEUTRAL_TEXT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

const LOADING_USERS: &str = "Loading users...";
const NO_USERS: &str = "No users found.";

/// Selection background (deep indigo)
const SELECTION_BG: Color = Color::Rgb(47, 51, 77);

pub fn render_users(f: &mut Frame, area: Rect, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search
            Constraint::Length(3), // Limit
            Constraint::Min(0),    // List
        ])
        .split(area);

    render_field(
        f,
        chunks[0],
        "Search",
        &app.search,
        app.input_mode == InputMode::Search,
    );
    render_field(
        f,
        chunks[1],
        "Limit",
        app.limit_input.text(),
        app.input_mode == InputMode::Limit,
    );
    render_user_list(f, chunks[2], app);
}

fn render_field(f: &mut Frame, area: Rect, title: &str, value: &str, editing: bool) {
    let border = if editing { AMBER } else { ACCENT_BLUE };
    let mut spans = vec![Span::styled(
        format!(" {}", value),
        Style::default().fg(NEUTRAL_TEXT),
    )];
    if editing {
        spans.push(Span::styled("▏", Style::default().fg(AMBER)));
    }

    let field = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(Span::styled(
                format!(" {} ", title),
                Style::default().fg(border).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(field, area);
}

fn render_user_list(f: &mut Frame, area: Rect, app: &mut AppState) {
    let active_id = app.renderer.state().active_user_id;

    let items: Vec<ListItem> = match &app.users_status {
        UsersStatus::Loading => vec![ListItem::new(Span::styled(
            LOADING_USERS,
            Style::default().fg(AMBER),
        ))],
        UsersStatus::Failed(message) => vec![ListItem::new(Span::styled(
            format!("Failed to load users: {}", message),
            Style::default().fg(ERROR_RED),
        ))],
        UsersStatus::Loaded => {
            let filtered = app.filtered_users();
            if filtered.is_empty() {
                vec![ListItem::new(Span::styled(
                    NO_USERS,
                    Style::default().fg(NEUTRAL_TEXT),
                ))]
            } else {
                filtered
                    .into_iter()
                    .map(|user| {
                        let is_active = active_id == Some(user.user_id);
                        let name_style = if is_active {
                            Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(Color::White)
                        };
                        let mut lines = vec![Line::from(vec![
                            Span::styled(if is_active { "● " } else { "  " }, name_style),
                            Span::styled(user.display_name(), name_style),
                        ])];
                        let meta = user.meta_line();
                        if !meta.is_empty() {
                            lines.push(Line::from(Span::styled(
                                format!("  {}", meta),
                                Style::default().fg(Color::DarkGray),
                            )));
                        }
                        ListItem::new(lines)
                    })
                    .collect()
            }
        }
    };

    let title = format!("━ 👤 Users ({}) ", app.filtered_users().len());
    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(
                    title,
                    Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(ACCENT_BLUE)),
        )
        .highlight_style(Style::default().bg(SELECTION_BG));

    if app.users_status == UsersStatus::Loaded {
        f.render_stateful_widget(list, area, &mut app.user_list_state);
    } else {
        f.render_widget(list, area);
    }
}
