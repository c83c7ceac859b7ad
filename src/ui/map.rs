// World map rendering module
//
// Terminal map engine for the details panel. A MapSurface is the map
// instance of one render cycle: a viewport over a ratatui canvas with the
// built-in world map as base layer and one circle per location cluster as
// marker layer. Surfaces are disposed explicitly before a new one is built.

use crate::geo::{Camera, GeoBounds, WORLD_BOUNDS};
use crate::theme::{marker_color, AMBER, ACCENT_BLUE, NEUTRAL_TEXT};
use crate::view::details::{MapMarker, MARKER_COUNT_CAP};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Map, MapResolution},
        Block, BorderType, Borders, Paragraph,
    },
    Frame,
};
use tracing::debug;

/// Map width in pixels the marker radii are designed for; marker sizes
/// keep the same share of the visible longitude span in the terminal
pub const MARKER_REFERENCE_WIDTH: f64 = 800.0;

/// Footer hint shown while no marker is hovered
const MAP_HINT: &str = "Hover or click a marker for details";

/// The map capability available to the presenter
///
/// A disabled engine behaves like a missing mapping library: the details
/// panel shows a textual notice instead of a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapEngine {
    enabled: bool,
}

impl MapEngine {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_available(&self) -> bool {
        self.enabled
    }

    /// Create a surface with the base layer attached and a world view
    pub fn create_surface(&self) -> Option<MapSurface> {
        self.enabled.then(MapSurface::new)
    }
}

/// One map instance bound to the details container
#[derive(Debug, Clone, PartialEq)]
pub struct MapSurface {
    viewport: GeoBounds,
    markers: Vec<MapMarker>,
    /// Canvas area from the last layout pass
    area: Option<Rect>,
    popup: Option<String>,
    pinned: bool,
}

impl MapSurface {
    fn new() -> Self {
        Self {
            viewport: WORLD_BOUNDS,
            markers: Vec::new(),
            area: None,
            popup: None,
            pinned: false,
        }
    }

    /// Point the viewport at the camera
    ///
    /// The world camera always shows the full extent; its center and zoom
    /// only matter to browser renderings.
    pub fn apply_camera(&mut self, camera: &Camera) {
        self.viewport = camera.viewport();
    }

    /// Replace the marker layer
    pub fn replace_markers(&mut self, markers: &[MapMarker]) {
        self.markers = markers.to_vec();
        self.popup = None;
        self.pinned = false;
    }

    /// Record the canvas size after a layout change
    pub fn invalidate_size(&mut self, area: Rect) {
        self.area = Some(area);
    }

    pub fn viewport(&self) -> GeoBounds {
        self.viewport
    }

    pub fn markers(&self) -> &[MapMarker] {
        &self.markers
    }

    pub fn popup(&self) -> Option<&str> {
        self.popup.as_deref()
    }

    /// Release the surface and its marker layer
    pub fn dispose(self) {
        debug!(markers = self.markers.len(), "Disposing map surface");
    }

    /// Marker radius in canvas (longitude) units
    pub fn radius_units(&self, marker: &MapMarker) -> f64 {
        let span = self.viewport.east - self.viewport.west;
        f64::from(marker.radius) * span / MARKER_REFERENCE_WIDTH
    }

    /// Geographic position under a terminal cell, if it is on the canvas
    pub fn cell_to_geo(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        let area = self.area?;
        if area.width == 0 || area.height == 0 {
            return None;
        }
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        if !inside {
            return None;
        }
        let fx = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
        let fy = (f64::from(row - area.y) + 0.5) / f64::from(area.height);
        let lon = self.viewport.west + fx * (self.viewport.east - self.viewport.west);
        let lat = self.viewport.north - fy * (self.viewport.north - self.viewport.south);
        Some((lat, lon))
    }

    /// Closest visible marker under a terminal cell
    ///
    /// A cell counts as over a marker when its center is within the marker
    /// radius or within one cell of the marker position. Markers outside the
    /// viewport are never hit.
    pub fn marker_at(&self, column: u16, row: u16) -> Option<&MapMarker> {
        let area = self.area?;
        let (lat, lon) = self.cell_to_geo(column, row)?;
        let cell_w = (self.viewport.east - self.viewport.west) / f64::from(area.width.max(1));
        let cell_h = (self.viewport.north - self.viewport.south) / f64::from(area.height.max(1));

        self.markers
            .iter()
            .filter(|m| self.viewport.contains(m.lat, m.lon))
            .map(|m| {
                let dx = (m.lon - lon) / cell_w;
                let dy = (m.lat - lat) / cell_h;
                let reach = (self.radius_units(m) / cell_w).max(1.0);
                (m, (dx * dx + dy * dy).sqrt(), reach)
            })
            .filter(|(_, dist, reach)| dist <= reach)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(m, _, _)| m)
    }

    /// Pointer moved to a cell; shows the popup of a hovered marker
    ///
    /// A clicked marker pins its popup until another marker is clicked.
    pub fn pointer(&mut self, column: u16, row: u16, clicked: bool) {
        let hovered = self.marker_at(column, row).map(|m| m.popup.clone());
        match (hovered, clicked) {
            (Some(popup), true) => {
                self.popup = Some(popup);
                self.pinned = true;
            }
            (Some(popup), false) => {
                if !self.pinned {
                    self.popup = Some(popup);
                }
            }
            (None, true) => {
                self.popup = None;
                self.pinned = false;
            }
            (None, false) => {
                if !self.pinned {
                    self.popup = None;
                }
            }
        }
    }
}

/// Render the map panel for a mounted surface
pub fn render_map(f: &mut Frame, area: Rect, surface: &mut MapSurface, title: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_BLUE))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(ACCENT_BLUE).add_modifier(Modifier::BOLD),
        ));
    surface.invalidate_size(block.inner(chunks[0]));

    let viewport = surface.viewport();
    let shapes: Vec<Circle> = surface
        .markers()
        .iter()
        .map(|m| Circle {
            x: m.lon,
            y: m.lat,
            radius: surface.radius_units(m),
            color: marker_color(m.count, MARKER_COUNT_CAP),
        })
        .collect();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([viewport.west, viewport.east])
        .y_bounds([viewport.south, viewport.north])
        .paint(move |ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: NEUTRAL_TEXT,
            });
            ctx.layer();
            for shape in &shapes {
                ctx.draw(shape);
            }
        });
    f.render_widget(canvas, chunks[0]);

    let footer = match surface.popup() {
        Some(popup) => Line::from(vec![
            Span::styled(" 📍 ", Style::default().fg(AMBER)),
            Span::styled(
                popup.to_string(),
                Style::default().fg(AMBER).add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from(Span::styled(
            format!(" {}", MAP_HINT),
            Style::default().fg(NEUTRAL_TEXT),
        )),
    };
    f.render_widget(Paragraph::new(footer), chunks[1]);
}

/// Render the notice shown when no map engine is available
pub fn render_map_unavailable(f: &mut Frame, area: Rect, notice: &str) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        notice.to_string(),
        Style::default().fg(AMBER),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT_BLUE)),
    );
    f.render_widget(paragraph, area);
}
