// View rendering module
//
// Turns a user's sightings into a presentable details view and keeps the
// presentation state (color mode, table/map mode, cached dataset). The
// terminal UI and the HTML exporter consume the same DetailsView through
// the Presenter trait.

pub mod details;
pub mod html;
pub mod renderer;
pub mod state;
pub mod tooltip;

pub use details::{Cell, DetailsBody, DetailsView, IpCellAttrs, MapView, TableRow};
pub use renderer::{Presenter, Renderer};
pub use tooltip::{CellRef, Overlay, TOOLTIP_OFFSET};
