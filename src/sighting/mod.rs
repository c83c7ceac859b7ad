// Sighting records and the record normalizer
//
// A sighting is one observation of a user reaching the server from a given
// IP address, with the GeoIP details the backend attached to it. This module
// classifies sightings (home vs. external), builds their location labels and
// orders them newest-first for display.

mod de;
pub mod user;

pub use user::User;

use serde::Deserialize;
use std::collections::HashSet;

/// Country value the backend uses for sightings from the home network
pub const HOME_COUNTRY: &str = "HOME";

/// Placeholder shown wherever a value is unknown
pub const UNKNOWN_PLACEHOLDER: &str = "–";

/// One recorded (user, IP) observation as delivered by the backend
///
/// Deserialization is lenient: coordinates may arrive as numbers or numeric
/// strings, flags as booleans or 0/1, and anything unparseable becomes
/// `None` instead of failing the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SightingRecord {
    #[serde(deserialize_with = "de::text")]
    pub ip_address: Option<String>,

    #[serde(deserialize_with = "de::flag_or_false")]
    pub is_home: bool,

    #[serde(deserialize_with = "de::text")]
    pub country: Option<String>,

    #[serde(deserialize_with = "de::text")]
    pub city: Option<String>,

    #[serde(deserialize_with = "de::text")]
    pub region: Option<String>,

    #[serde(deserialize_with = "de::text")]
    pub timezone: Option<String>,

    #[serde(deserialize_with = "de::text")]
    pub isp: Option<String>,

    #[serde(deserialize_with = "de::coordinate")]
    pub latitude: Option<f64>,

    #[serde(deserialize_with = "de::coordinate")]
    pub longitude: Option<f64>,

    /// Display-formatted first sighting time
    #[serde(deserialize_with = "de::text")]
    pub first_seen: Option<String>,

    /// Display-formatted last sighting time
    #[serde(deserialize_with = "de::text")]
    pub last_seen: Option<String>,

    /// Epoch seconds of the last sighting, used as the sort key
    #[serde(deserialize_with = "de::timestamp")]
    pub last_seen_ts: Option<f64>,
}

impl SightingRecord {
    /// Whether this sighting came from the user's home/internal network
    pub fn is_home(&self) -> bool {
        self.is_home || self.country.as_deref() == Some(HOME_COUNTRY)
    }

    /// Non-empty `city, region, country` parts joined with ", "
    ///
    /// Returns an empty string when none of the three is present.
    pub fn place_line(&self) -> String {
        [&self.city, &self.region, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Human-readable location label
    ///
    /// Home sightings are labelled `HOME`; otherwise the place line, or the
    /// unknown placeholder when the record has no location at all.
    pub fn location_label(&self) -> String {
        if self.is_home() {
            return HOME_COUNTRY.to_string();
        }
        let place = self.place_line();
        if place.is_empty() {
            UNKNOWN_PLACEHOLDER.to_string()
        } else {
            place
        }
    }

    /// Whether the ISP has anything besides whitespace
    pub fn has_isp(&self) -> bool {
        self.isp.as_deref().is_some_and(|isp| !isp.trim().is_empty())
    }

    fn sort_ts(&self) -> f64 {
        self.last_seen_ts.unwrap_or(0.0)
    }
}

/// Output of [`normalize`]: the ordered records plus the title statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSet {
    /// Records ordered newest-first (stable on equal timestamps)
    pub records: Vec<SightingRecord>,
    /// Number of non-home sightings
    pub total_external: usize,
    /// Number of distinct IP addresses among the non-home sightings
    pub unique_external: usize,
    /// Whether any record carries a non-blank ISP
    pub has_isp: bool,
}

impl NormalizedSet {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Order sightings newest-first and compute the external-IP statistics
///
/// Missing timestamps sort as 0 (oldest). The sort is stable, so records
/// with equal timestamps keep their incoming relative order.
pub fn normalize(records: &[SightingRecord]) -> NormalizedSet {
    let mut ordered = records.to_vec();
    ordered.sort_by(|a, b| b.sort_ts().total_cmp(&a.sort_ts()));

    let external: Vec<&SightingRecord> = ordered.iter().filter(|r| !r.is_home()).collect();
    let distinct_ips: HashSet<&str> = external
        .iter()
        .filter_map(|r| r.ip_address.as_deref())
        .collect();

    let total_external = external.len();
    let unique_external = distinct_ips.len();
    let has_isp = ordered.iter().any(SightingRecord::has_isp);

    NormalizedSet {
        records: ordered,
        total_external,
        unique_external,
        has_isp,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::SightingRecord;

    pub fn external(ip: &str, city: &str, country: &str, ts: i64) -> SightingRecord {
        SightingRecord {
            ip_address: Some(ip.to_string()),
            city: Some(city.to_string()),
            country: Some(country.to_string()),
            last_seen_ts: Some(ts as f64),
            ..Default::default()
        }
    }

    pub fn home(ip: &str, ts: i64) -> SightingRecord {
        SightingRecord {
            ip_address: Some(ip.to_string()),
            is_home: true,
            last_seen_ts: Some(ts as f64),
            ..Default::default()
        }
    }

    pub fn located(ip: &str, lat: f64, lon: f64) -> SightingRecord {
        SightingRecord {
            ip_address: Some(ip.to_string()),
            city: Some("Berlin".to_string()),
            country: Some("DE".to_string()),
            latitude: Some(lat),
            longitude: Some(lon),
            ..Default::default()
        }
    }
}
