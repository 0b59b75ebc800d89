use std::time::Duration;

use crate::geo::GeoPoint;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// OpenStreetMap standard tiles, used when the host is in light mode.
pub const DEFAULT_TILE_URL_LIGHT: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
/// CARTO dark basemap, used when the host is in dark mode.
pub const DEFAULT_TILE_URL_DARK: &str =
    "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png";

/// Tunables for the map visualizer.
///
/// Every field has a default matching the production map view; the env
/// loader in [`crate::config`] overrides them individually.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    /// Base radius of the proximity ring when the caller does not pick one.
    pub default_radius_km: f64,
    /// Period of the proximity pulse timer.
    pub pulse_interval: Duration,
    /// Camera center used when there is neither a user location nor a marker.
    pub fallback_center: GeoPoint,
    /// Zoom applied when centering on the user.
    pub zoom_close: u8,
    /// Zoom applied when centering on the first marker.
    pub zoom_area: u8,
    /// Zoom applied together with `fallback_center`.
    pub zoom_city: u8,
    pub tile_url_light: String,
    pub tile_url_dark: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_radius_km: 5.0,
            pulse_interval: Duration::from_millis(800),
            // Cairo
            fallback_center: GeoPoint {
                lat: 30.0444,
                lon: 31.2357,
            },
            zoom_close: 14,
            zoom_area: 13,
            zoom_city: 13,
            tile_url_light: DEFAULT_TILE_URL_LIGHT.to_string(),
            tile_url_dark: DEFAULT_TILE_URL_DARK.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub map: MapSettings,
}
