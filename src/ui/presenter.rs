// Terminal presenter
//
// Holds what the last render cycle mounted: the details view, the map
// surface when the map is shown, and the IP-cell hit boxes recorded by the
// last draw. Teardown disposes all of it before the next mount.

use crate::view::{CellRef, DetailsView, IpCellAttrs, MapView, Presenter};
use ratatui::layout::{Position, Rect};

use super::map::{MapEngine, MapSurface};

/// Screen area of one IP cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpHitbox {
    pub area: Rect,
    /// Row index in the mounted table
    pub row: usize,
}

#[derive(Debug)]
pub struct TerminalPresenter {
    engine: MapEngine,
    mounted: Option<DetailsView>,
    surface: Option<MapSurface>,
    hitboxes: Vec<IpHitbox>,
    /// First table row shown
    scroll: usize,
}

impl TerminalPresenter {
    pub fn new(engine: MapEngine) -> Self {
        Self {
            engine,
            mounted: None,
            surface: None,
            hitboxes: Vec::new(),
            scroll: 0,
        }
    }

    pub fn mounted(&self) -> Option<&DetailsView> {
        self.mounted.as_ref()
    }

    pub fn surface(&self) -> Option<&MapSurface> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut MapSurface> {
        self.surface.as_mut()
    }

    /// Mounted view and map surface, borrowed together for drawing
    pub fn parts_mut(&mut self) -> (Option<&DetailsView>, Option<&mut MapSurface>) {
        (self.mounted.as_ref(), self.surface.as_mut())
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn reset_scroll(&mut self) {
        self.scroll = 0;
    }

    /// Move the table window by `delta` rows, staying within the table
    pub fn scroll_by(&mut self, delta: isize) {
        let rows = self
            .mounted
            .as_ref()
            .and_then(|view| view.table())
            .map(|table| table.rows.len())
            .unwrap_or(0);
        let max = rows.saturating_sub(1);
        let next = if delta < 0 {
            self.scroll.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll.saturating_add(delta as usize)
        };
        self.scroll = next.min(max);
    }

    /// Replace the hit boxes after a draw
    pub fn set_hitboxes(&mut self, hitboxes: Vec<IpHitbox>) {
        self.hitboxes = hitboxes;
    }

    /// IP cell of the mounted table under a terminal cell
    pub fn ip_cell_at(&self, column: u16, row: u16) -> Option<(CellRef, &IpCellAttrs)> {
        let view = self.mounted.as_ref()?;
        let table = view.table()?;
        if view.map_mode {
            return None;
        }
        let hit = self
            .hitboxes
            .iter()
            .find(|hb| hb.area.contains(Position::new(column, row)))?;
        let attrs = &table.rows.get(hit.row)?.ip_attrs;
        Some((
            CellRef {
                cycle: view.cycle,
                row: hit.row,
            },
            attrs,
        ))
    }
}

impl Presenter for TerminalPresenter {
    fn map_available(&self) -> bool {
        self.engine.is_available()
    }

    fn teardown(&mut self) {
        if let Some(surface) = self.surface.take() {
            surface.dispose();
        }
        self.hitboxes.clear();
        self.mounted = None;
    }

    fn mount(&mut self, view: &DetailsView) {
        if view.map_mode {
            if let Some(MapView::Ready { markers, camera }) = view.map() {
                self.surface = self.engine.create_surface().map(|mut surface| {
                    surface.apply_camera(camera);
                    surface.replace_markers(markers);
                    surface
                });
            }
        }

        let rows = view.table().map(|t| t.rows.len()).unwrap_or(0);
        self.scroll = self.scroll.min(rows.saturating_sub(1));
        self.mounted = Some(view.clone());
    }
}
