//! The heterogeneous result set produced by the search backend.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::{Entity, EntityKind};

/// Search results grouped by category. Missing categories deserialize as
/// empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultSet {
    pub shops: Vec<Entity>,
    pub services: Vec<Entity>,
    pub users: Vec<Entity>,
    pub products: Vec<Entity>,
}

#[derive(Debug, Error)]
pub enum ResultSetError {
    #[error("failed to read result set from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("result set is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ResultSet {
    /// Parse a result set from its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`ResultSetError::Json`] if the payload is not a JSON object of
    /// category arrays.
    pub fn from_json_str(raw: &str) -> Result<Self, ResultSetError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read and parse a result set from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ResultSetError::Io`] if the file cannot be read and
    /// [`ResultSetError::Json`] if it does not parse.
    pub fn from_path(path: &Path) -> Result<Self, ResultSetError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ResultSetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    #[must_use]
    pub fn category(&self, kind: EntityKind) -> &[Entity] {
        match kind {
            EntityKind::Shop => &self.shops,
            EntityKind::Service => &self.services,
            EntityKind::User => &self.users,
            EntityKind::Product => &self.products,
        }
    }

    /// Every entity tagged with its kind, shops first, then services, users
    /// and products, each in input order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, &Entity)> + '_ {
        EntityKind::ALL
            .into_iter()
            .flat_map(move |kind| self.category(kind).iter().map(move |e| (kind, e)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shops.len() + self.services.len() + self.users.len() + self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
