// Status Bar rendering module
//
// Renders the bottom status bar with keyboard shortcuts and toggle indicators.

use crate::app::{AppState, InputMode};
use crate::theme::{toggle_color, ACCENT_BLUE, AMBER, ERROR_RED, NEUTRAL_TEXT};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    // Calculate available width for hints (subtract borders and icon)
    let available_width = area.width.saturating_sub(4);

    struct Hint {
        priority: u8,
        key: &'static str,
        desc: String,
        color: Color,
    }

    let state = app.renderer.state();
    let hints: Vec<Hint> = match app.input_mode {
        InputMode::Normal => vec![
            Hint {
                priority: 1,
                key: "Q:",
                desc: "Quit | ".to_string(),
                color: ERROR_RED,
            },
            Hint {
                priority: 1,
                key: "↑↓:",
                desc: "Users | ".to_string(),
                color: ACCENT_BLUE,
            },
            Hint {
                priority: 1,
                key: "⏎:",
                desc: "Load | ".to_string(),
                color: ACCENT_BLUE,
            },
            Hint {
                priority: 1,
                key: "C:",
                desc: format!("{} | ", state.color_toggle_label()),
                color: ACCENT_BLUE,
            },
            Hint {
                priority: 1,
                key: "M:",
                desc: format!("{} | ", state.view_toggle_label()),
                color: ACCENT_BLUE,
            },
            Hint {
                priority: 2,
                key: "R:",
                desc: "Reload | ".to_string(),
                color: ACCENT_BLUE,
            },
            Hint {
                priority: 2,
                key: "/:",
                desc: "Search | ".to_string(),
                color: ACCENT_BLUE,
            },
            Hint {
                priority: 2,
                key: "L:",
                desc: "Limit | ".to_string(),
                color: ACCENT_BLUE,
            },
        ]
        .into_iter()
        .chain(details_hint(app).map(|(key, desc)| Hint {
            priority: 3,
            key,
            desc: desc.to_string(),
            color: ACCENT_BLUE,
        }))
        .collect(),
        InputMode::Search | InputMode::Limit => vec![
            Hint {
                priority: 1,
                key: "⏎:",
                desc: "Apply | ".to_string(),
                color: AMBER,
            },
            Hint {
                priority: 1,
                key: "Esc:",
                desc: "Cancel ".to_string(),
                color: AMBER,
            },
        ],
    };

    // Build status text, adding hints until we run out of space
    let mut spans = vec![Span::styled(" 🌐 ", Style::default().fg(ACCENT_BLUE))];

    let mut current_length = 4;

    for priority in 1..=3 {
        for hint in &hints {
            if hint.priority == priority {
                let hint_length = hint.key.chars().count() + hint.desc.chars().count();
                if current_length + hint_length <= available_width as usize {
                    spans.push(Span::styled(
                        hint.key,
                        Style::default().fg(hint.color).add_modifier(Modifier::BOLD),
                    ));
                    spans.push(Span::raw(hint.desc.clone()));
                    current_length += hint_length;
                }
            }
        }
    }

    spans.push(Span::raw(" "));
    spans.extend(build_toggle_indicators(app));

    let status_bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(ACCENT_BLUE)),
        )
        .alignment(Alignment::Left);

    f.render_widget(status_bar, area);
}

/// Hint for whatever the details pane currently shows
fn details_hint(app: &AppState) -> Option<(&'static str, &'static str)> {
    if app.presenter.surface().is_some() {
        return Some(("Click:", "Pin marker "));
    }
    app.presenter
        .mounted()
        .filter(|view| !view.map_mode)
        .and_then(|view| view.table())
        .map(|_| ("PgUp/PgDn:", "Scroll "))
}

/// Build toggle status indicator spans for the status bar
/// Shows [C:ON/OFF] [M:MAP/TABLE]
pub fn build_toggle_indicators(app: &AppState) -> Vec<Span<'static>> {
    let state = app.renderer.state();
    let mut spans = Vec::new();

    let (color_state, color_on) = if state.color_mode {
        ("ON", true)
    } else {
        ("OFF", false)
    };
    spans.push(Span::styled("[C:", Style::default().fg(NEUTRAL_TEXT)));
    spans.push(Span::styled(
        color_state,
        Style::default()
            .fg(toggle_color(color_on))
            .add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled("] ", Style::default().fg(NEUTRAL_TEXT)));

    let view_state = if state.map_mode { "MAP" } else { "TABLE" };
    spans.push(Span::styled("[M:", Style::default().fg(NEUTRAL_TEXT)));
    spans.push(Span::styled(
        view_state,
        Style::default()
            .fg(toggle_color(state.map_mode))
            .add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled("]", Style::default().fg(NEUTRAL_TEXT)));

    spans
}
