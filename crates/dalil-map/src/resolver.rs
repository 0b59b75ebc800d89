//! Location resolution for raw entity records.
//!
//! Each category carries its coordinates under different field names, and
//! products may only be locatable through their owning shop. Every kind has
//! an ordered fallback chain; the first pair that yields a valid coordinate
//! wins.

use dalil_core::{Entity, EntityKind, GeoPoint};

/// Paths to one latitude/longitude pair inside an entity record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateFields {
    pub lat: &'static [&'static str],
    pub lon: &'static [&'static str],
}

impl CoordinateFields {
    /// Read this pair from `entity`. Missing, non-numeric, non-finite and
    /// out-of-range values all yield `None`.
    #[must_use]
    pub fn read(&self, entity: &Entity) -> Option<GeoPoint> {
        let lat = entity.number(self.lat)?;
        let lon = entity.number(self.lon)?;
        GeoPoint::checked(lat, lon)
    }
}

const OWN_LOCATION: CoordinateFields = CoordinateFields {
    lat: &["locationLat"],
    lon: &["locationLon"],
};

const OWN_LATITUDE: CoordinateFields = CoordinateFields {
    lat: &["latitude"],
    lon: &["longitude"],
};

const SHOP_LOCATION: CoordinateFields = CoordinateFields {
    lat: &["shop", "locationLat"],
    lon: &["shop", "locationLon"],
};

const SHOP_LATITUDE: CoordinateFields = CoordinateFields {
    lat: &["shop", "latitude"],
    lon: &["shop", "longitude"],
};

const SHOP_CHAIN: &[CoordinateFields] = &[OWN_LOCATION];
const SERVICE_CHAIN: &[CoordinateFields] = &[OWN_LOCATION];
const USER_CHAIN: &[CoordinateFields] = &[OWN_LOCATION, OWN_LATITUDE];
const PRODUCT_CHAIN: &[CoordinateFields] =
    &[OWN_LOCATION, OWN_LATITUDE, SHOP_LOCATION, SHOP_LATITUDE];

/// The ordered coordinate sources tried for `kind`.
#[must_use]
pub fn fallback_chain(kind: EntityKind) -> &'static [CoordinateFields] {
    match kind {
        EntityKind::Shop => SHOP_CHAIN,
        EntityKind::Service => SERVICE_CHAIN,
        EntityKind::User => USER_CHAIN,
        EntityKind::Product => PRODUCT_CHAIN,
    }
}

/// Resolve an entity to a map position.
///
/// Pure and infallible: `None` means the record cannot be placed on the map,
/// which is an expected outcome for partially filled records.
#[must_use]
pub fn resolve(entity: &Entity, kind: EntityKind) -> Option<GeoPoint> {
    fallback_chain(kind)
        .iter()
        .find_map(|fields| fields.read(entity))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn entity(value: serde_json::Value) -> Entity {
        Entity::new(value)
    }

    #[test]
    fn shop_resolves_from_location_fields() {
        let shop = entity(json!({"id": "s1", "locationLat": 30.0, "locationLon": 31.2}));
        assert_eq!(
            resolve(&shop, EntityKind::Shop),
            Some(GeoPoint { lat: 30.0, lon: 31.2 })
        );
    }

    #[test]
    fn shop_ignores_generic_latitude_fields() {
        let shop = entity(json!({"id": "s1", "latitude": 30.0, "longitude": 31.2}));
        assert_eq!(resolve(&shop, EntityKind::Shop), None);
    }

    #[test]
    fn user_falls_back_to_latitude_longitude() {
        let user = entity(json!({"id": "u1", "latitude": "29.98", "longitude": "31.13"}));
        assert_eq!(
            resolve(&user, EntityKind::User),
            Some(GeoPoint {
                lat: 29.98,
                lon: 31.13
            })
        );
    }

    #[test]
    fn own_coordinates_win_over_fallbacks() {
        let user = entity(json!({
            "locationLat": 1.0, "locationLon": 2.0,
            "latitude": 3.0, "longitude": 4.0
        }));
        assert_eq!(
            resolve(&user, EntityKind::User),
            Some(GeoPoint { lat: 1.0, lon: 2.0 })
        );
    }

    #[test]
    fn product_inherits_shop_coordinates() {
        let product = entity(json!({
            "id": "p1",
            "shop": {"id": "s9", "locationLat": 30.05, "locationLon": 31.24}
        }));
        assert_eq!(
            resolve(&product, EntityKind::Product),
            Some(GeoPoint {
                lat: 30.05,
                lon: 31.24
            })
        );
    }

    #[test]
    fn product_uses_shop_latitude_as_last_resort() {
        let product = entity(json!({
            "id": "p1",
            "shop": {"latitude": 31.2, "longitude": 29.9}
        }));
        assert_eq!(
            resolve(&product, EntityKind::Product),
            Some(GeoPoint { lat: 31.2, lon: 29.9 })
        );
    }

    #[test]
    fn half_a_pair_does_not_resolve() {
        let product = entity(json!({"locationLat": 30.0, "shop": {"locationLon": 31.0}}));
        assert_eq!(resolve(&product, EntityKind::Product), None);
    }

    #[test]
    fn out_of_range_pair_falls_through_to_next_candidate() {
        let user = entity(json!({
            "locationLat": 120.0, "locationLon": 31.0,
            "latitude": 30.0, "longitude": 31.0
        }));
        assert_eq!(
            resolve(&user, EntityKind::User),
            Some(GeoPoint { lat: 30.0, lon: 31.0 })
        );
    }

    #[test]
    fn non_finite_strings_are_rejected() {
        let shop = entity(json!({"locationLat": "NaN", "locationLon": "inf"}));
        assert_eq!(resolve(&shop, EntityKind::Shop), None);
    }

    #[test]
    fn zero_is_a_valid_coordinate() {
        let service = entity(json!({"locationLat": 0, "locationLon": 0}));
        assert_eq!(
            resolve(&service, EntityKind::Service),
            Some(GeoPoint { lat: 0.0, lon: 0.0 })
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let product = entity(json!({"latitude": 10.0, "longitude": 20.0}));
        let first = resolve(&product, EntityKind::Product);
        for _ in 0..5 {
            assert_eq!(resolve(&product, EntityKind::Product), first);
        }
    }
}
