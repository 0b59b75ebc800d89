use std::time::Duration;

use crate::app_config::{AppConfig, Environment, MapSettings};
use crate::geo::GeoPoint;
use crate::ConfigError;

/// Highest zoom level the tile providers serve.
const MAX_ZOOM: u8 = 22;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can pass a `HashMap`
/// lookup instead of mutating env vars.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid(var, "must be a finite number".to_string()))
        }
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_zoom = |var: &str, default: &str| -> Result<u8, ConfigError> {
        let raw = or_default(var, default);
        let zoom = raw
            .trim()
            .parse::<u8>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if zoom > MAX_ZOOM {
            return Err(invalid(var, format!("zoom must be in 0..={MAX_ZOOM}")));
        }
        Ok(zoom)
    };

    let env = parse_environment(&or_default("DALIL_ENV", "development"))?;
    let log_level = or_default("DALIL_LOG_LEVEL", "info");

    let default_radius_km = parse_f64("DALIL_DEFAULT_RADIUS_KM", "5")?;
    if default_radius_km <= 0.0 {
        return Err(invalid(
            "DALIL_DEFAULT_RADIUS_KM",
            "radius must be greater than zero".to_string(),
        ));
    }

    let pulse_interval_ms = parse_u64("DALIL_PULSE_INTERVAL_MS", "800")?;
    if pulse_interval_ms == 0 {
        return Err(invalid(
            "DALIL_PULSE_INTERVAL_MS",
            "interval must be greater than zero".to_string(),
        ));
    }

    let fallback_lat = parse_f64("DALIL_FALLBACK_LAT", "30.0444")?;
    let fallback_lon = parse_f64("DALIL_FALLBACK_LON", "31.2357")?;
    let fallback_center = GeoPoint::checked(fallback_lat, fallback_lon).ok_or_else(|| {
        invalid(
            "DALIL_FALLBACK_LAT",
            format!("({fallback_lat}, {fallback_lon}) is not a valid coordinate"),
        )
    })?;

    let zoom_close = parse_zoom("DALIL_ZOOM_CLOSE", "14")?;
    let zoom_area = parse_zoom("DALIL_ZOOM_AREA", "13")?;
    let zoom_city = parse_zoom("DALIL_ZOOM_CITY", "13")?;

    let defaults = MapSettings::default();
    let tile_url_light = or_default("DALIL_TILE_URL_LIGHT", &defaults.tile_url_light);
    let tile_url_dark = or_default("DALIL_TILE_URL_DARK", &defaults.tile_url_dark);

    Ok(AppConfig {
        env,
        log_level,
        map: MapSettings {
            default_radius_km,
            pulse_interval: Duration::from_millis(pulse_interval_ms),
            fallback_center,
            zoom_close,
            zoom_area,
            zoom_city,
            tile_url_light,
            tile_url_dark,
        },
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DALIL_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
