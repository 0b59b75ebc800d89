//! Static chrome drawn around the markers.

use dalil_core::{EntityKind, MapSettings, UserLocation};
use serde::Serialize;

use super::icons::glyph_for;

pub const POPUP_MAX_WIDTH: u32 = 320;

const OSM_ATTRIBUTION: &str =
    r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileLayer {
    pub url: String,
    pub attribution: &'static str,
}

/// Base tiles for the current color scheme.
#[must_use]
pub fn tile_layer(settings: &MapSettings, dark_mode: bool) -> TileLayer {
    let url = if dark_mode {
        &settings.tile_url_dark
    } else {
        &settings.tile_url_light
    };
    TileLayer {
        url: url.clone(),
        attribution: OSM_ATTRIBUTION,
    }
}

/// Result count badge in the corner of the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoBadge {
    pub results: String,
    pub proximity: Option<String>,
}

#[must_use]
pub fn info_badge(marker_count: usize, user_present: bool, radius_km: f64) -> InfoBadge {
    let noun = if marker_count == 1 { "result" } else { "results" };
    InfoBadge {
        results: format!("{marker_count} {noun} on map"),
        proximity: user_present.then(|| format!("Your location · {radius_km}km radius")),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub kind: EntityKind,
    pub glyph: &'static str,
    pub label: &'static str,
}

#[must_use]
pub fn legend() -> Vec<LegendEntry> {
    EntityKind::ALL
        .into_iter()
        .map(|kind| LegendEntry {
            kind,
            glyph: glyph_for(kind),
            label: match kind {
                EntityKind::Shop => "Shops",
                EntityKind::Service => "Services",
                EntityKind::User => "People",
                EntityKind::Product => "Products",
            },
        })
        .collect()
}

/// Shown instead of an empty canvas when no result could be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub title: &'static str,
    pub hint: &'static str,
}

impl Default for EmptyState {
    fn default() -> Self {
        Self {
            title: "No results with location data",
            hint: "The current search results don't have location coordinates. \
                   Try adjusting your filters or search query.",
        }
    }
}

/// Popup attached to the viewer's own marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserLocationPanel {
    pub title: &'static str,
    pub accuracy: String,
    pub radius: String,
}

#[must_use]
pub fn user_location_panel(user: &UserLocation, radius_km: f64) -> UserLocationPanel {
    UserLocationPanel {
        title: "Your Location",
        accuracy: format!("Accuracy: ±{:.0}m", user.accuracy_meters.round()),
        radius: format!("Search radius: {radius_km}km"),
    }
}
