// Details panel view model
//
// Pure construction of what the details panel should show for a user's
// sightings: header text, table rows with optional tints and tooltip
// attributes, and the map marker set. Presenters turn a DetailsView into
// terminal widgets or markup; nothing here touches a display surface.

use crate::geo::{self, Camera};
use crate::sighting::{self, NormalizedSet, SightingRecord, User, UNKNOWN_PLACEHOLDER};
use crate::theme::{ColorKey, Hsl};

use super::state::ViewState;

/// Message shown when a user has no recorded sightings
pub const EMPTY_MESSAGE: &str = "No IP entries found for this user.";

/// Message shown while a user's history is being fetched
pub const LOADING_MESSAGE: &str = "Loading IP data...";

/// Text shown in the map container when no map engine is available
pub const MAP_UNAVAILABLE_NOTICE: &str = "Map engine not loaded – map is not available.";

/// Smallest marker radius, for a single sighting
pub const MARKER_BASE_RADIUS: u32 = 5;

/// Sighting count beyond which markers stop growing
pub const MARKER_COUNT_CAP: usize = 20;

/// Marker radius for a cluster: base plus count, capped
pub fn marker_radius(count: usize) -> u32 {
    MARKER_BASE_RADIUS + count.min(MARKER_COUNT_CAP) as u32
}

/// Table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Location,
    Ip,
    Isp,
    FirstSeen,
    LastSeen,
}

impl Column {
    pub fn title(&self) -> &'static str {
        match self {
            Column::Location => "Location",
            Column::Ip => "IP",
            Column::Isp => "ISP",
            Column::FirstSeen => "First seen",
            Column::LastSeen => "Last seen",
        }
    }
}

/// Tooltip data attached to every IP cell
///
/// Attached regardless of color mode; missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IpCellAttrs {
    pub ip: String,
    pub location: String,
    pub country: String,
    pub city: String,
    pub region: String,
    pub timezone: String,
    pub isp: String,
}

impl IpCellAttrs {
    fn from_record(record: &SightingRecord, ip: &str, location: &str) -> Self {
        let owned = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            ip: ip.to_string(),
            location: location.to_string(),
            country: owned(&record.country),
            city: owned(&record.city),
            region: owned(&record.region),
            timezone: owned(&record.timezone),
            isp: owned(&record.isp),
        }
    }

    /// Attribute name/value pairs in markup order
    pub fn pairs(&self) -> [(&'static str, &str); 7] {
        [
            ("data-ip", self.ip.as_str()),
            ("data-location", self.location.as_str()),
            ("data-country", self.country.as_str()),
            ("data-city", self.city.as_str()),
            ("data-region", self.region.as_str()),
            ("data-timezone", self.timezone.as_str()),
            ("data-isp", self.isp.as_str()),
        ]
    }
}

/// A table cell: raw text plus an optional key color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tint: Option<Hsl>,
}

impl Cell {
    fn tinted(text: String, key: Option<ColorKey<'_>>, color_mode: bool) -> Self {
        let tint = if color_mode { key.map(|k| k.color()) } else { None };
        Self { text, tint }
    }

    fn plain(text: String) -> Self {
        Self { text, tint: None }
    }
}

/// One table row, one per sighting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub location: Cell,
    pub ip: Cell,
    pub ip_attrs: IpCellAttrs,
    /// Present only when the table has an ISP column
    pub isp: Option<Cell>,
    pub first_seen: Cell,
    pub last_seen: Cell,
}

impl TableRow {
    /// Cells in column order
    pub fn cells(&self) -> Vec<(Column, &Cell)> {
        let mut cells = vec![(Column::Location, &self.location), (Column::Ip, &self.ip)];
        if let Some(isp) = &self.isp {
            cells.push((Column::Isp, isp));
        }
        cells.push((Column::FirstSeen, &self.first_seen));
        cells.push((Column::LastSeen, &self.last_seen));
        cells
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

/// A map marker for one location cluster
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub lat: f64,
    pub lon: f64,
    pub count: usize,
    pub radius: u32,
    /// `"{label} ({count})"`
    pub popup: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapView {
    /// No map engine; show the notice instead
    Unavailable { notice: String },
    Ready { markers: Vec<MapMarker>, camera: Camera },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailsBody {
    Loading,
    Failed { message: String },
    Empty,
    Ready {
        table: TableView,
        /// Built only while map mode is active
        map: Option<MapView>,
    },
}

/// Everything a presenter needs for one render cycle
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsView {
    /// Render cycle this view belongs to
    pub cycle: u64,
    pub title: String,
    pub color_mode: bool,
    pub map_mode: bool,
    pub body: DetailsBody,
}

impl DetailsView {
    pub fn table(&self) -> Option<&TableView> {
        match &self.body {
            DetailsBody::Ready { table, .. } => Some(table),
            _ => None,
        }
    }

    pub fn map(&self) -> Option<&MapView> {
        match &self.body {
            DetailsBody::Ready { map, .. } => map.as_ref(),
            _ => None,
        }
    }
}

/// Header shown before statistics are known
pub fn plain_title(user: &User) -> String {
    format!("Details – {}", user.display_name())
}

/// Header with external-IP statistics
pub fn stats_title(user: &User, set: &NormalizedSet) -> String {
    format!(
        "Details – {} ({} distinct external IPs, {} entries)",
        user.display_name(),
        set.unique_external,
        set.total_external
    )
}

/// Build the table for a normalized record set
pub fn build_table(set: &NormalizedSet, color_mode: bool) -> TableView {
    let mut columns = vec![Column::Location, Column::Ip];
    if set.has_isp {
        columns.push(Column::Isp);
    }
    columns.push(Column::FirstSeen);
    columns.push(Column::LastSeen);

    let rows = set
        .records
        .iter()
        .map(|record| {
            let location = record.location_label();
            let ip = record
                .ip_address
                .clone()
                .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string());
            let isp = record.isp.as_deref();

            let location_key =
                (location != UNKNOWN_PLACEHOLDER).then(|| ColorKey::Location(&location));
            let ip_key = record.ip_address.as_deref().map(ColorKey::Ip);

            TableRow {
                ip_attrs: IpCellAttrs::from_record(record, &ip, &location),
                location: Cell::tinted(location.clone(), location_key, color_mode),
                ip: Cell::tinted(ip.clone(), ip_key, color_mode),
                isp: set.has_isp.then(|| {
                    Cell::tinted(
                        isp.unwrap_or(UNKNOWN_PLACEHOLDER).to_string(),
                        isp.map(ColorKey::Isp),
                        color_mode,
                    )
                }),
                first_seen: Cell::plain(placeholder_or(&record.first_seen)),
                last_seen: Cell::plain(placeholder_or(&record.last_seen)),
            }
        })
        .collect();

    TableView { columns, rows }
}

fn placeholder_or(value: &Option<String>) -> String {
    value
        .clone()
        .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string())
}

/// Build the map view: one marker per location cluster
pub fn build_map(records: &[SightingRecord], map_available: bool) -> MapView {
    if !map_available {
        return MapView::Unavailable {
            notice: MAP_UNAVAILABLE_NOTICE.to_string(),
        };
    }

    let clusters = geo::aggregate(records);
    let camera = Camera::for_clusters(&clusters);
    let markers = clusters
        .into_iter()
        .map(|cluster| MapMarker {
            lat: cluster.lat,
            lon: cluster.lon,
            count: cluster.count,
            radius: marker_radius(cluster.count),
            popup: format!("{} ({})", cluster.label, cluster.count),
        })
        .collect();

    MapView::Ready { markers, camera }
}

/// Build the details view for the records cached in `state`
///
/// Returns `None` when no user's records have been loaded yet.
pub fn build_details(state: &ViewState, cycle: u64, map_available: bool) -> Option<DetailsView> {
    let user = state.current_user.as_ref()?;

    let set = sighting::normalize(&state.current_records);
    if set.is_empty() {
        return Some(DetailsView {
            cycle,
            title: plain_title(user),
            color_mode: state.color_mode,
            map_mode: state.map_mode,
            body: DetailsBody::Empty,
        });
    }

    let table = build_table(&set, state.color_mode);
    let map = state
        .map_mode
        .then(|| build_map(&set.records, map_available));

    Some(DetailsView {
        cycle,
        title: stats_title(user, &set),
        color_mode: state.color_mode,
        map_mode: state.map_mode,
        body: DetailsBody::Ready { table, map },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sighting::fixtures::{external, home, located};

    fn state_with(records: Vec<SightingRecord>) -> ViewState {
        let mut state = ViewState::default();
        state.current_user = Some(User {
            friendly_name: Some("Anna".to_string()),
            ..User::new(1)
        });
        state.current_records = records;
        state
    }

    #[test]
    fn test_marker_radius_is_capped() {
        assert_eq!(marker_radius(1), 6);
        assert_eq!(marker_radius(20), 25);
        assert_eq!(marker_radius(500), 25);
    }

    #[test]
    fn test_title_has_statistics() {
        let state = state_with(vec![
            external("1.1.1.1", "Berlin", "DE", 100),
            home("1.1.1.1", 200),
        ]);
        let view = build_details(&state, 1, true).unwrap();
        assert_eq!(view.title, "Details – Anna (1 distinct external IPs, 1 entries)");
    }

    #[test]
    fn test_empty_records_render_empty_state() {
        let view = build_details(&state_with(Vec::new()), 1, true).unwrap();
        assert_eq!(view.body, DetailsBody::Empty);
        assert_eq!(view.title, "Details – Anna");
    }

    #[test]
    fn test_nothing_to_build_without_user() {
        assert!(build_details(&ViewState::default(), 1, true).is_none());
    }

    #[test]
    fn test_isp_column_only_when_present() {
        let set = sighting::normalize(&[external("1.1.1.1", "Berlin", "DE", 1)]);
        let table = build_table(&set, true);
        assert!(!table.columns.contains(&Column::Isp));
        assert!(table.rows[0].isp.is_none());

        let mut with_isp = external("2.2.2.2", "Rome", "IT", 2);
        with_isp.isp = Some("Telecom Italia".to_string());
        let table = build_table(
            &sighting::normalize(&[external("1.1.1.1", "Berlin", "DE", 1), with_isp]),
            true,
        );
        assert_eq!(
            table.columns,
            vec![Column::Location, Column::Ip, Column::Isp, Column::FirstSeen, Column::LastSeen]
        );
        // Row without an ISP shows the placeholder, untinted
        let berlin = &table.rows[1];
        assert_eq!(berlin.isp.as_ref().unwrap().text, "–");
        assert_eq!(berlin.isp.as_ref().unwrap().tint, None);
        assert!(table.rows[0].isp.as_ref().unwrap().tint.is_some());
    }

    #[test]
    fn test_tints_follow_color_mode_and_namespaces() {
        let set = sighting::normalize(&[external("1.1.1.1", "Berlin", "DE", 1)]);

        let colored = build_table(&set, true);
        let row = &colored.rows[0];
        assert_eq!(row.ip.tint, Some(ColorKey::Ip("1.1.1.1").color()));
        assert_eq!(row.location.tint, Some(ColorKey::Location("Berlin, DE").color()));
        assert_eq!(row.first_seen.tint, None);

        let plain = build_table(&set, false);
        assert_eq!(plain.rows[0].ip.tint, None);
        assert_eq!(plain.rows[0].location.tint, None);
    }

    #[test]
    fn test_unknown_values_are_not_tinted() {
        let set = sighting::normalize(&[SightingRecord::default()]);
        let row = &build_table(&set, true).rows[0];
        assert_eq!(row.ip.text, "–");
        assert_eq!(row.ip.tint, None);
        assert_eq!(row.location.text, "–");
        assert_eq!(row.location.tint, None);
        assert_eq!(row.last_seen.text, "–");
    }

    #[test]
    fn test_isp_keeps_surrounding_whitespace() {
        let mut record = external("1.1.1.1", "Berlin", "DE", 1);
        record.isp = Some(" Telekom ".to_string());
        let set = sighting::normalize(&[record]);
        let row = &build_table(&set, true).rows[0];

        let isp = row.isp.as_ref().unwrap();
        assert_eq!(isp.text, " Telekom ");
        assert_eq!(isp.tint, Some(ColorKey::Isp(" Telekom ").color()));
        assert_ne!(isp.tint, Some(ColorKey::Isp("Telekom").color()));
        assert_eq!(row.ip_attrs.isp, " Telekom ");
    }

    #[test]
    fn test_ip_attrs_survive_color_round_trip() {
        let mut record = external("203.0.113.9", "Vienna", "AT", 5);
        record.timezone = Some("Europe/Vienna".to_string());
        record.isp = Some("A1".to_string());
        let mut state = state_with(vec![record, home("192.168.178.20", 9)]);

        let attrs = |state: &ViewState| -> Vec<IpCellAttrs> {
            build_details(state, 0, true)
                .unwrap()
                .table()
                .unwrap()
                .rows
                .iter()
                .map(|row| row.ip_attrs.clone())
                .collect()
        };

        let on = attrs(&state);
        state.color_mode = false;
        let off = attrs(&state);
        state.color_mode = true;
        let on_again = attrs(&state);

        assert_eq!(on, off);
        assert_eq!(off, on_again);
        assert_eq!(on[1].timezone, "Europe/Vienna");
        assert_eq!(on[0].location, "HOME");
    }

    #[test]
    fn test_map_only_built_in_map_mode() {
        let mut state = state_with(vec![located("1.1.1.1", 52.5, 13.4)]);
        assert!(build_details(&state, 0, true).unwrap().map().is_none());

        state.map_mode = true;
        let view = build_details(&state, 0, true).unwrap();
        let Some(MapView::Ready { markers, .. }) = view.map() else {
            panic!("expected markers");
        };
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].popup, "Berlin, DE (1)");
    }

    #[test]
    fn test_map_without_clusters_uses_world_camera() {
        let map = build_map(&[home("192.168.178.2", 1)], true);
        assert_eq!(
            map,
            MapView::Ready {
                markers: Vec::new(),
                camera: Camera::world()
            }
        );
    }

    #[test]
    fn test_map_unavailable_keeps_table() {
        let mut state = state_with(vec![located("1.1.1.1", 52.5, 13.4)]);
        state.map_mode = true;

        let view = build_details(&state, 0, false).unwrap();
        assert_eq!(
            view.map(),
            Some(&MapView::Unavailable {
                notice: MAP_UNAVAILABLE_NOTICE.to_string()
            })
        );
        assert_eq!(view.table().unwrap().rows.len(), 1);
    }

    #[test]
    fn test_two_records_same_coordinates_one_marker() {
        let map = build_map(
            &[located("1.1.1.1", 52.5, 13.4), located("2.2.2.2", 52.5, 13.4)],
            true,
        );
        let MapView::Ready { markers, camera } = map else {
            panic!("expected markers");
        };
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].count, 2);
        assert_eq!(markers[0].radius, 7);
        assert!(matches!(camera, Camera::Fit(_)));
    }
}
