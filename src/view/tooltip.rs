// IP detail tooltip
//
// One shared overlay, created on first use and reused for every IP cell.
// Hovering a cell overwrites its content and moves it next to the pointer;
// leaving the cell hides it.

use super::details::IpCellAttrs;

/// Distance between the pointer and the overlay's top-left corner
pub const TOOLTIP_OFFSET: i32 = 12;

/// Identifies an IP cell within one render cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub cycle: u64,
    pub row: usize,
}

/// What the overlay shows for one IP cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TooltipContent {
    pub ip: String,
    pub location: String,
    /// `city, region, country`; None when all three are empty
    pub place_line: Option<String>,
    pub isp: Option<String>,
    pub timezone: Option<String>,
}

impl TooltipContent {
    pub fn from_attrs(attrs: &IpCellAttrs) -> Self {
        let non_empty = |value: &str| (!value.is_empty()).then(|| value.to_string());
        let place_line = [&attrs.city, &attrs.region, &attrs.country]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            ip: attrs.ip.clone(),
            location: attrs.location.clone(),
            place_line: non_empty(&place_line),
            isp: non_empty(&attrs.isp),
            timezone: non_empty(&attrs.timezone),
        }
    }

    /// Text lines below the IP heading, optional lines omitted
    pub fn detail_lines(&self) -> Vec<String> {
        let mut lines = vec![self.location.clone()];
        if let Some(place) = &self.place_line {
            lines.push(place.clone());
        }
        if let Some(isp) = &self.isp {
            lines.push(format!("ISP: {}", isp));
        }
        if let Some(tz) = &self.timezone {
            lines.push(format!("Timezone: {}", tz));
        }
        lines
    }
}

/// The overlay element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    pub visible: bool,
    /// Top-left corner in pointer coordinates
    pub x: i32,
    pub y: i32,
    pub content: TooltipContent,
    /// Cell the overlay is currently shown for
    pub anchor: Option<CellRef>,
}

#[derive(Debug, Default)]
pub struct Tooltip {
    overlay: Option<Overlay>,
    created: usize,
}

impl Tooltip {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure(&mut self) -> &mut Overlay {
        if self.overlay.is_none() {
            self.created += 1;
        }
        self.overlay.get_or_insert_with(Overlay::default)
    }

    /// Show for `cell` at pointer position `(x, y)`
    ///
    /// Used for both pointer-enter and pointer-move.
    pub fn show(&mut self, cell: CellRef, attrs: &IpCellAttrs, x: i32, y: i32) {
        let overlay = self.ensure();
        if overlay.anchor != Some(cell) {
            overlay.content = TooltipContent::from_attrs(attrs);
            overlay.anchor = Some(cell);
        }
        overlay.x = x.saturating_add(TOOLTIP_OFFSET);
        overlay.y = y.saturating_add(TOOLTIP_OFFSET);
        overlay.visible = true;
    }

    /// Hide on pointer-leave; no-op before first use
    pub fn hide(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.visible = false;
            overlay.anchor = None;
        }
    }

    /// The overlay, if it is currently visible
    pub fn visible(&self) -> Option<&Overlay> {
        self.overlay.as_ref().filter(|o| o.visible)
    }

    /// Number of overlay elements ever created (at most one)
    pub fn created(&self) -> usize {
        self.created
    }
}
