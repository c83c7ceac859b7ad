// HTML presenter
//
// Renders a DetailsView as markup for embedding in a web page: the details
// table with tinted pills and tooltip data attributes, and the map
// container with one element per marker. Used by the `--export-html` mode.

use std::fmt::Write;

use crate::geo::Camera;
use crate::theme::Hsl;

use super::details::{
    Cell, Column, DetailsBody, DetailsView, MapView, TableRow, EMPTY_MESSAGE, LOADING_MESSAGE,
};
use super::renderer::Presenter;

/// Escape text content: `&`, `<`, `>`
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape an attribute value: text escaping plus `"`
pub fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}

fn background(tint: Option<Hsl>) -> String {
    tint.map(|hsl| format!(" style=\"background:{};\"", hsl))
        .unwrap_or_default()
}

fn pill(class: &str, extra_attrs: &str, cell: &Cell) -> String {
    format!(
        "<span class=\"{}\"{}{}>{}</span>",
        class,
        extra_attrs,
        background(cell.tint),
        escape_html(&cell.text)
    )
}

fn render_row(row: &TableRow) -> String {
    let mut cols = String::new();
    for (column, cell) in row.cells() {
        let content = match column {
            Column::Location => pill("location-pill", "", cell),
            Column::Ip => {
                let attrs: String = row
                    .ip_attrs
                    .pairs()
                    .iter()
                    .map(|(name, value)| format!(" {}=\"{}\"", name, escape_attr(value)))
                    .collect();
                pill("ip-pill ip-cell", &attrs, cell)
            }
            Column::Isp => pill("isp-pill", "", cell),
            Column::FirstSeen | Column::LastSeen => escape_html(&cell.text),
        };
        let _ = write!(cols, "<td>{}</td>", content);
    }
    format!("<tr>{}</tr>", cols)
}

fn render_map(map: Option<&MapView>) -> String {
    match map {
        None => String::new(),
        Some(MapView::Unavailable { notice }) => {
            format!("<p class=\"map-fallback\">{}</p>", escape_html(notice))
        }
        Some(MapView::Ready { markers, camera }) => {
            let mut out = String::new();
            match camera {
                Camera::World { center, zoom } => {
                    let _ = write!(
                        out,
                        "<div class=\"map-camera\" data-center=\"{},{}\" data-zoom=\"{}\"></div>",
                        center.0, center.1, zoom
                    );
                }
                Camera::Fit(bounds) => {
                    let _ = write!(
                        out,
                        "<div class=\"map-camera\" data-bounds=\"{},{},{},{}\"></div>",
                        bounds.south, bounds.west, bounds.north, bounds.east
                    );
                }
            }
            for marker in markers {
                let _ = write!(
                    out,
                    concat!(
                        "<div class=\"map-marker\" data-lat=\"{}\" data-lon=\"{}\"",
                        " data-radius=\"{}\" title=\"{}\"></div>"
                    ),
                    marker.lat,
                    marker.lon,
                    marker.radius,
                    escape_attr(&marker.popup)
                );
            }
            out
        }
    }
}

/// Render the details panel markup
pub fn render_details(view: &DetailsView) -> String {
    let title = format!("<h2 id=\"detailsTitle\">{}</h2>", escape_html(&view.title));

    let content = match &view.body {
        DetailsBody::Loading => format!("<p>{}</p>", LOADING_MESSAGE),
        DetailsBody::Failed { message } => format!(
            "<p class=\"error\">Failed to load IP data: {}</p>",
            escape_html(message)
        ),
        DetailsBody::Empty => format!("<p>{}</p>", EMPTY_MESSAGE),
        DetailsBody::Ready { table, map } => {
            let header: String = table
                .columns
                .iter()
                .map(|c| format!("<th>{}</th>", c.title()))
                .collect();
            let rows: String = table.rows.iter().map(render_row).collect();
            let table_display = if view.map_mode { "display:none;" } else { "display:block;" };
            let map_class = if view.map_mode { "active" } else { "" };
            format!(
                concat!(
                    "<div class=\"view-wrapper\">",
                    "<div id=\"tableWrapper\" style=\"{}\">",
                    "<table class=\"details-table\">",
                    "<thead><tr>{}</tr></thead><tbody>{}</tbody>",
                    "</table>",
                    "</div>",
                    "<div id=\"mapWrapper\" class=\"{}\"><div id=\"map\">{}</div></div>",
                    "</div>"
                ),
                table_display,
                header,
                rows,
                map_class,
                render_map(map.as_ref())
            )
        }
    };

    format!("{}\n<div id=\"detailsContent\">{}</div>\n", title, content)
}

/// Presenter that keeps the markup of the mounted view
#[derive(Debug, Default)]
pub struct HtmlPresenter {
    map_available: bool,
    markup: String,
}

impl HtmlPresenter {
    pub fn new(map_available: bool) -> Self {
        Self {
            map_available,
            markup: String::new(),
        }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }
}

impl Presenter for HtmlPresenter {
    fn map_available(&self) -> bool {
        self.map_available
    }

    fn teardown(&mut self) {
        self.markup.clear();
    }

    fn mount(&mut self, view: &DetailsView) {
        self.markup = render_details(view);
    }
}
