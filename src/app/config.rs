// Application configuration types
//
// This module contains:
// - Defaults shared by the CLI and the dashboard
// - DashboardConfig, resolved from command line and environment
// - LimitInput, the editable history-limit field

use std::time::Duration;

// ============================================================================
// Constants
// ============================================================================

/// Number of IP sightings requested per user when no valid limit is set
pub const DEFAULT_IP_LIMIT: u32 = 50;

/// Default backend location
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Event poll interval for the UI loop (100ms)
pub const TICK_INTERVAL_MS: u64 = 100;

/// Rows scrolled per PageUp/PageDown
pub const TABLE_PAGE_ROWS: usize = 10;

// ============================================================================
// Configuration Structs
// ============================================================================

/// Runtime configuration for the dashboard
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend base URL, e.g. `http://localhost:8000`
    pub base_url: String,

    /// Initial value of the limit field
    pub default_limit: u32,

    /// Timeout applied to every backend request
    pub request_timeout: Duration,

    /// Whether the map engine may be used; false behaves like a missing
    /// map library
    pub map_enabled: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_limit: DEFAULT_IP_LIMIT,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            map_enabled: true,
        }
    }
}

impl DashboardConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(TICK_INTERVAL_MS)
    }
}

/// The editable "limit" field
///
/// Holds raw text as typed. Reading the effective limit silently replaces
/// anything that is not a positive integer with the default and rewrites
/// the text to match, so the field always shows what was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitInput {
    text: String,
}

impl LimitInput {
    pub fn new(initial: u32) -> Self {
        Self {
            text: initial.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    pub fn pop(&mut self) {
        self.text.pop();
    }

    /// Limit to request, normalizing the field when it was invalid
    pub fn effective(&mut self) -> u32 {
        match self.text.trim().parse::<u32>() {
            Ok(limit) if limit > 0 => {
                self.text = limit.to_string();
                limit
            }
            _ => {
                self.text = DEFAULT_IP_LIMIT.to_string();
                DEFAULT_IP_LIMIT
            }
        }
    }
}

impl Default for LimitInput {
    fn default() -> Self {
        Self::new(DEFAULT_IP_LIMIT)
    }
}
