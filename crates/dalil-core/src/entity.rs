//! Entity records as delivered by the search backend.
//!
//! The four categories come from different backend models and do not agree
//! on field names or value types (coordinates arrive as numbers or numeric
//! strings, nested owners may or may not be populated). Records are kept as
//! raw JSON behind a shared handle and read through lenient accessors.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The four entity categories of a search result, in aggregation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Shop,
    Service,
    User,
    Product,
}

impl EntityKind {
    /// All kinds, in the order markers are aggregated.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Shop,
        EntityKind::Service,
        EntityKind::User,
        EntityKind::Product,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Shop => "shop",
            EntityKind::Service => "service",
            EntityKind::User => "user",
            EntityKind::Product => "product",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shared, immutable handle to one raw entity record.
///
/// Cloning is a reference-count bump; markers hold a clone instead of a copy
/// of the record.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity(Arc<serde_json::Value>);

impl Entity {
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(Arc::new(value))
    }

    #[must_use]
    pub fn raw(&self) -> &serde_json::Value {
        &self.0
    }

    /// `true` when both handles point at the same record.
    #[must_use]
    pub fn same_record(&self, other: &Entity) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// The record id, rendered as a string whether it was sent as a string
    /// or a number. String ids are passed through unchanged; blank strings
    /// and other types count as missing.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Walk a path of object keys, e.g. `&["shop", "locationLat"]`.
    #[must_use]
    pub fn field(&self, path: &[&str]) -> Option<&serde_json::Value> {
        path.iter()
            .try_fold(self.0.as_ref(), |value, key| value.get(*key))
            .filter(|v| !v.is_null())
    }

    /// A non-blank string at `path`.
    #[must_use]
    pub fn text(&self, path: &[&str]) -> Option<&str> {
        self.field(path)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// A number at `path`, accepting numeric strings.
    ///
    /// No finiteness check happens here: `"NaN"` parses, and callers that
    /// need finite values must check.
    #[must_use]
    pub fn number(&self, path: &[&str]) -> Option<f64> {
        self.field(path).and_then(|v| {
            v.as_f64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse::<f64>().ok()))
        })
    }

    /// `true` only for a JSON `true` at `path`.
    #[must_use]
    pub fn flag(&self, path: &[&str]) -> bool {
        self.field(path)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }
}

impl From<serde_json::Value> for Entity {
    fn from(value: serde_json::Value) -> Self {
        Self::new(value)
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Entity::new)
    }
}
