// Tooltip overlay rendering
//
// Draws the IP tooltip over everything else, clamped to the frame.

use crate::theme::{TOOLTIP_BG, TOOLTIP_BORDER, TOOLTIP_FG};
use crate::view::{Overlay, TOOLTIP_OFFSET};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Terminal cells between the pointer and the overlay
const CELL_OFFSET: i32 = 1;

/// Place a `width` x `height` box next to the pointer, flipping to the
/// other side of the pointer when it would leave `frame`
pub fn overlay_area(overlay: &Overlay, width: u16, height: u16, frame: Rect) -> Rect {
    let width = width.min(frame.width);
    let height = height.min(frame.height);

    // Overlay coordinates carry the pointer offset
    let pointer_x = overlay.x - TOOLTIP_OFFSET;
    let pointer_y = overlay.y - TOOLTIP_OFFSET;

    let right = i32::from(frame.x + frame.width);
    let bottom = i32::from(frame.y + frame.height);

    let mut x = pointer_x + CELL_OFFSET;
    if x + i32::from(width) > right {
        x = pointer_x - CELL_OFFSET - i32::from(width);
    }
    let mut y = pointer_y + CELL_OFFSET;
    if y + i32::from(height) > bottom {
        y = pointer_y - CELL_OFFSET - i32::from(height);
    }

    let x = x.clamp(i32::from(frame.x), right - i32::from(width));
    let y = y.clamp(i32::from(frame.y), bottom - i32::from(height));
    Rect::new(x as u16, y as u16, width, height)
}

pub fn render_tooltip(f: &mut Frame, overlay: &Overlay) {
    let content = &overlay.content;
    let mut lines = vec![Line::from(Span::styled(
        content.ip.clone(),
        Style::default().fg(TOOLTIP_FG).add_modifier(Modifier::BOLD),
    ))];
    for detail in content.detail_lines() {
        lines.push(Line::from(Span::styled(detail, Style::default().fg(TOOLTIP_FG))));
    }

    let text_width = lines.iter().map(|l| l.width()).max().unwrap_or(0);
    let width = (text_width.max(content.ip.width()) + 2) as u16;
    let height = lines.len() as u16 + 2;
    let area = overlay_area(overlay, width, height, f.area());

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(TOOLTIP_BG))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(TOOLTIP_BORDER).bg(TOOLTIP_BG)),
        );
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}
