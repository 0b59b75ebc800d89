//! Coordinates and the caller-supplied user position.

use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Build a point only if both values are finite and in range
    /// (lat ∈ [-90, 90], lon ∈ [-180, 180]).
    #[must_use]
    pub fn checked(lat: f64, lon: f64) -> Option<Self> {
        let point = Self { lat, lon };
        point.is_valid().then_some(point)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// The viewer's position as reported by the host's geolocation source.
///
/// Accepts both the compact `{lat, lon, accuracyMeters}` shape and the
/// browser-style `{latitude, longitude, accuracy}` shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLocation {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lon: f64,
    #[serde(alias = "accuracy", default)]
    pub accuracy_meters: f64,
}

impl UserLocation {
    #[must_use]
    pub fn new(lat: f64, lon: f64, accuracy_meters: f64) -> Self {
        Self {
            lat,
            lon,
            accuracy_meters,
        }
    }

    #[must_use]
    pub fn position(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_accepts_boundaries() {
        assert!(GeoPoint::checked(90.0, 180.0).is_some());
        assert!(GeoPoint::checked(-90.0, -180.0).is_some());
        assert!(GeoPoint::checked(0.0, 0.0).is_some());
    }

    #[test]
    fn checked_rejects_out_of_range_and_non_finite() {
        assert!(GeoPoint::checked(90.0001, 0.0).is_none());
        assert!(GeoPoint::checked(0.0, -180.5).is_none());
        assert!(GeoPoint::checked(f64::NAN, 0.0).is_none());
        assert!(GeoPoint::checked(0.0, f64::INFINITY).is_none());
    }

    #[test]
    fn user_location_accepts_browser_shape() {
        let loc: UserLocation =
            serde_json::from_str(r#"{"latitude": 30.05, "longitude": 31.23, "accuracy": 12.4}"#)
                .unwrap();
        assert!((loc.lat - 30.05).abs() < 1e-9);
        assert!((loc.lon - 31.23).abs() < 1e-9);
        assert!((loc.accuracy_meters - 12.4).abs() < 1e-9);
    }

    #[test]
    fn user_location_accepts_compact_shape_without_accuracy() {
        let loc: UserLocation = serde_json::from_str(r#"{"lat": 1.5, "lon": 2.5}"#).unwrap();
        assert_eq!(loc.position(), GeoPoint { lat: 1.5, lon: 2.5 });
        assert!(loc.accuracy_meters.abs() < f64::EPSILON);
    }
}
