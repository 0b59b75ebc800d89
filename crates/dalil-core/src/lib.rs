pub mod app_config;
pub mod config;
pub mod entity;
pub mod geo;
pub mod results;

pub use app_config::{AppConfig, Environment, MapSettings};
pub use config::{load_app_config, load_app_config_from_env};
pub use entity::{Entity, EntityKind};
pub use geo::{GeoPoint, UserLocation};
pub use results::{ResultSet, ResultSetError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
