//! Camera placement.

use dalil_core::{GeoPoint, MapSettings, UserLocation};
use serde::Serialize;

use crate::aggregate::Marker;

/// Why the camera ended up where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportFocus {
    User,
    FirstMarker,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: u8,
    pub focus: ViewportFocus,
}

/// Pick the camera center and zoom.
///
/// The viewer's position wins over markers, and the first marker wins over
/// the configured fallback.
#[must_use]
pub fn compute_viewport(
    user_location: Option<&UserLocation>,
    markers: &[Marker],
    settings: &MapSettings,
) -> Viewport {
    if let Some(user) = user_location {
        return Viewport {
            center: user.position(),
            zoom: settings.zoom_close,
            focus: ViewportFocus::User,
        };
    }

    if let Some(first) = markers.first() {
        return Viewport {
            center: first.position,
            zoom: settings.zoom_area,
            focus: ViewportFocus::FirstMarker,
        };
    }

    Viewport {
        center: settings.fallback_center,
        zoom: settings.zoom_city,
        focus: ViewportFocus::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use dalil_core::{Entity, EntityKind};
    use serde_json::json;

    use super::*;

    fn marker(id: &str, lat: f64, lon: f64) -> Marker {
        Marker {
            id: format!("shop-{id}"),
            kind: EntityKind::Shop,
            position: GeoPoint { lat, lon },
            entity: Entity::new(json!({"id": id})),
        }
    }

    #[test]
    fn user_location_takes_priority() {
        let settings = MapSettings::default();
        let user = UserLocation::new(29.95, 31.1, 15.0);
        let markers = vec![marker("a", 1.0, 1.0)];
        let view = compute_viewport(Some(&user), &markers, &settings);
        assert_eq!(view.center, GeoPoint { lat: 29.95, lon: 31.1 });
        assert_eq!(view.zoom, 14);
        assert_eq!(view.focus, ViewportFocus::User);
    }

    #[test]
    fn first_marker_when_no_user() {
        let settings = MapSettings::default();
        let markers = vec![marker("a", 30.0, 31.2), marker("b", 10.0, 10.0)];
        let view = compute_viewport(None, &markers, &settings);
        assert_eq!(view.center, GeoPoint { lat: 30.0, lon: 31.2 });
        assert_eq!(view.zoom, 13);
        assert_eq!(view.focus, ViewportFocus::FirstMarker);
    }

    #[test]
    fn fallback_when_nothing_to_show() {
        let settings = MapSettings {
            zoom_city: 11,
            ..MapSettings::default()
        };
        let view = compute_viewport(None, &[], &settings);
        assert_eq!(
            view.center,
            GeoPoint {
                lat: 30.0444,
                lon: 31.2357
            }
        );
        assert_eq!(view.zoom, 11);
        assert_eq!(view.focus, ViewportFocus::Fallback);
    }
}
