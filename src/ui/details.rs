// Details panel rendering module
//
// Draws the mounted DetailsView: the notice for loading, failure and empty
// states, the IP table with tinted pills, or the map. The IP cells drawn
// this frame are returned as hit boxes for tooltip lookup.

use crate::theme::{pill_style, ACCENT_BLUE, AMBER, ERROR_RED, NEUTRAL_TEXT};
use crate::view::details::{Column, TableView, EMPTY_MESSAGE, LOADING_MESSAGE};
use crate::view::{Cell, DetailsBody, DetailsView, MapView, TableRow};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::map::{render_map, render_map_unavailable};
use super::presenter::{IpHitbox, TerminalPresenter};

const PLACEHOLDER_TITLE: &str = "Details";
const SELECT_HINT: &str = "Select a user and press Enter to see their IP history.";

/// Widest width given to the IP and timestamp columns
const MAX_FIXED_COLUMN: u16 = 26;

pub fn render_details(f: &mut Frame, area: Rect, presenter: &mut TerminalPresenter) {
    let scroll = presenter.scroll();
    let (view, surface) = presenter.parts_mut();

    let Some(view) = view else {
        render_notice(f, area, PLACEHOLDER_TITLE, SELECT_HINT, NEUTRAL_TEXT);
        presenter.set_hitboxes(Vec::new());
        return;
    };

    let mut hitboxes = Vec::new();
    match &view.body {
        DetailsBody::Loading => render_notice(f, area, &view.title, LOADING_MESSAGE, AMBER),
        DetailsBody::Failed { message } => render_notice(
            f,
            area,
            &view.title,
            &format!("Failed to load IP data: {}", message),
            ERROR_RED,
        ),
        DetailsBody::Empty => render_notice(f, area, &view.title, EMPTY_MESSAGE, NEUTRAL_TEXT),
        DetailsBody::Ready { table, map } => {
            if view.map_mode {
                match (map, surface) {
                    (Some(MapView::Ready { .. }), Some(surface)) => {
                        render_map(f, area, surface, &view.title)
                    }
                    (Some(MapView::Unavailable { notice }), _) => {
                        render_map_unavailable(f, area, notice)
                    }
                    _ => render_notice(f, area, &view.title, LOADING_MESSAGE, AMBER),
                }
            } else {
                hitboxes = render_table(f, area, view, table, scroll);
            }
        }
    }
    presenter.set_hitboxes(hitboxes);
}

fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_BLUE))
}

fn render_notice(f: &mut Frame, area: Rect, title: &str, text: &str, color: Color) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(color),
    )))
    .wrap(Wrap { trim: true })
    .block(panel_block(title));
    f.render_widget(paragraph, area);
}

/// Truncate to `width` display columns, marking the cut with an ellipsis
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn column_constraint(column: Column, table: &TableView) -> Constraint {
    let widest = |pick: fn(&TableRow) -> &Cell| {
        table
            .rows
            .iter()
            .map(|row| pick(row).text.width())
            .chain(std::iter::once(column.title().width()))
            .max()
            .unwrap_or(0) as u16
    };
    match column {
        Column::Location => Constraint::Fill(3),
        Column::Isp => Constraint::Fill(2),
        // Pills carry one space of padding on each side
        Column::Ip => Constraint::Length((widest(|r| &r.ip) + 2).min(MAX_FIXED_COLUMN)),
        Column::FirstSeen => Constraint::Length(widest(|r| &r.first_seen).min(MAX_FIXED_COLUMN)),
        Column::LastSeen => Constraint::Length(widest(|r| &r.last_seen).min(MAX_FIXED_COLUMN)),
    }
}

fn is_pill(column: Column) -> bool {
    matches!(column, Column::Location | Column::Ip | Column::Isp)
}

fn cell_span(column: Column, cell: &Cell, width: u16) -> Span<'static> {
    if is_pill(column) {
        let inner = truncate_to_width(&cell.text, usize::from(width.saturating_sub(2)));
        Span::styled(format!(" {} ", inner), pill_style(cell.tint))
    } else {
        Span::styled(
            truncate_to_width(&cell.text, usize::from(width)),
            Style::default().fg(NEUTRAL_TEXT),
        )
    }
}

fn render_table(
    f: &mut Frame,
    area: Rect,
    view: &DetailsView,
    table: &TableView,
    scroll: usize,
) -> Vec<IpHitbox> {
    let block = panel_block(&view.title);
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return Vec::new();
    }

    let constraints: Vec<Constraint> = table
        .columns
        .iter()
        .map(|c| column_constraint(*c, table))
        .collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .spacing(1)
        .split(inner);

    // Header
    for (idx, column) in table.columns.iter().enumerate() {
        let header = Rect {
            height: 1,
            ..columns[idx]
        };
        f.render_widget(
            Paragraph::new(Span::styled(
                column.title(),
                Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
            )),
            header,
        );
    }

    let visible_rows = usize::from(inner.height.saturating_sub(1));
    let mut hitboxes = Vec::new();
    for (offset, (row_idx, row)) in table
        .rows
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible_rows)
        .enumerate()
    {
        let y = inner.y + 1 + offset as u16;
        for (col_idx, (column, cell)) in row.cells().into_iter().enumerate() {
            let col_area = columns[col_idx];
            let cell_area = Rect {
                y,
                height: 1,
                ..col_area
            };
            let span = cell_span(column, cell, cell_area.width);
            let drawn_width = (span.content.width() as u16).min(cell_area.width);
            f.render_widget(Paragraph::new(Line::from(span)), cell_area);

            if column == Column::Ip {
                hitboxes.push(IpHitbox {
                    area: Rect {
                        width: drawn_width,
                        ..cell_area
                    },
                    row: row_idx,
                });
            }
        }
    }

    if table.rows.len() > visible_rows {
        let last = (scroll + visible_rows).min(table.rows.len());
        let footer = format!(" rows {}-{} of {} ", scroll + 1, last, table.rows.len());
        let footer_area = Rect {
            x: area.x + area.width.saturating_sub(footer.width() as u16 + 2),
            y: area.y + area.height.saturating_sub(1),
            width: (footer.width() as u16).min(area.width),
            height: 1,
        };
        f.render_widget(
            Paragraph::new(Span::styled(footer, Style::default().fg(NEUTRAL_TEXT))),
            footer_area,
        );
    }

    hitboxes
}
