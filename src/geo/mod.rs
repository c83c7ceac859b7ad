// Location aggregation for the map view
//
// Groups external sightings sharing identical coordinates into clusters and
// computes the bounding box the map camera fits to. Records without usable
// coordinates are skipped here but still appear in the table.

use crate::sighting::SightingRecord;
use std::collections::HashMap;

/// Padding ratio applied to cluster bounds before fitting the camera
pub const BOUNDS_PADDING: f64 = 0.3;

/// Smallest span (degrees) a fitted viewport may have on either axis
///
/// A single cluster yields zero-size bounds; this keeps the camera at a
/// regional zoom instead of collapsing onto one point.
pub const MIN_VIEW_SPAN: f64 = 4.0;

/// Default camera used when there is nothing to fit
pub const WORLD_CENTER: (f64, f64) = (20.0, 0.0);
pub const WORLD_ZOOM: u8 = 2;

/// Full extent of the map in degrees
pub const WORLD_BOUNDS: GeoBounds = GeoBounds {
    south: -90.0,
    west: -180.0,
    north: 90.0,
    east: 180.0,
};

/// Sightings sharing one exact coordinate pair
#[derive(Debug, Clone, PartialEq)]
pub struct LocationCluster {
    pub lat: f64,
    pub lon: f64,
    /// Location label of the first record seen at these coordinates
    pub label: String,
    pub count: usize,
}

/// Exact-equality key for a coordinate pair
///
/// Built from the bit patterns so it can be hashed; -0.0 is folded onto
/// 0.0 because the two compare equal.
fn location_key(lat: f64, lon: f64) -> (u64, u64) {
    let fold = |v: f64| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
    (fold(lat), fold(lon))
}

/// Group non-home sightings with finite coordinates into clusters
///
/// Clusters come out in order of first appearance, so repeated calls on the
/// same input yield identical output.
pub fn aggregate(records: &[SightingRecord]) -> Vec<LocationCluster> {
    let mut clusters: Vec<LocationCluster> = Vec::new();
    let mut index: HashMap<(u64, u64), usize> = HashMap::new();

    for record in records {
        if record.is_home() {
            continue;
        }
        let (Some(lat), Some(lon)) = (record.latitude, record.longitude) else {
            continue;
        };
        if !lat.is_finite() || !lon.is_finite() {
            continue;
        }

        let slot = *index.entry(location_key(lat, lon)).or_insert_with(|| {
            clusters.push(LocationCluster {
                lat,
                lon,
                label: record.location_label(),
                count: 0,
            });
            clusters.len() - 1
        });
        clusters[slot].count += 1;
    }

    clusters
}

/// Axis-aligned latitude/longitude box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    /// Smallest box containing every point, or `None` for an empty set
    ///
    /// An empty box has no meaningful extent, so callers must fall back to
    /// a default view instead of fitting to it.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        points.into_iter().fold(None, |acc, (lat, lon)| {
            Some(match acc {
                None => GeoBounds {
                    south: lat,
                    west: lon,
                    north: lat,
                    east: lon,
                },
                Some(b) => GeoBounds {
                    south: b.south.min(lat),
                    west: b.west.min(lon),
                    north: b.north.max(lat),
                    east: b.east.max(lon),
                },
            })
        })
    }

    /// Bounds of a cluster set
    pub fn of_clusters(clusters: &[LocationCluster]) -> Option<Self> {
        Self::enclosing(clusters.iter().map(|c| (c.lat, c.lon)))
    }

    /// Extend every side by `ratio` times the span of its axis
    pub fn pad(self, ratio: f64) -> Self {
        let lat_buffer = (self.north - self.south).abs() * ratio;
        let lon_buffer = (self.east - self.west).abs() * ratio;
        GeoBounds {
            south: self.south - lat_buffer,
            west: self.west - lon_buffer,
            north: self.north + lat_buffer,
            east: self.east + lon_buffer,
        }
    }

    /// Grow either axis symmetrically until it spans at least `span` degrees
    pub fn with_min_span(self, span: f64) -> Self {
        let (center_lat, center_lon) = self.center();
        let half_lat = ((self.north - self.south) / 2.0).max(span / 2.0);
        let half_lon = ((self.east - self.west) / 2.0).max(span / 2.0);
        GeoBounds {
            south: center_lat - half_lat,
            west: center_lon - half_lon,
            north: center_lat + half_lat,
            east: center_lon + half_lon,
        }
    }

    /// Intersect with the world extent
    pub fn clamp_to_world(self) -> Self {
        GeoBounds {
            south: self.south.max(WORLD_BOUNDS.south),
            west: self.west.max(WORLD_BOUNDS.west),
            north: self.north.min(WORLD_BOUNDS.north),
            east: self.east.min(WORLD_BOUNDS.east),
        }
    }

    /// (lat, lon) midpoint
    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }
}

/// Where the map camera points
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Camera {
    /// Default whole-world view
    World { center: (f64, f64), zoom: u8 },
    /// Fit to a (padded) bounding box
    Fit(GeoBounds),
}

impl Camera {
    pub fn world() -> Self {
        Camera::World {
            center: WORLD_CENTER,
            zoom: WORLD_ZOOM,
        }
    }

    /// Camera for a cluster set: world view when empty, padded fit otherwise
    pub fn for_clusters(clusters: &[LocationCluster]) -> Self {
        match GeoBounds::of_clusters(clusters) {
            None => Camera::world(),
            Some(bounds) => Camera::Fit(
                bounds
                    .pad(BOUNDS_PADDING)
                    .with_min_span(MIN_VIEW_SPAN)
                    .clamp_to_world(),
            ),
        }
    }

    /// Visible extent of this camera
    pub fn viewport(&self) -> GeoBounds {
        match self {
            Camera::World { .. } => WORLD_BOUNDS,
            Camera::Fit(bounds) => *bounds,
        }
    }
}
