//! Outbound navigation requests.

use dalil_core::EntityKind;
use serde::Serialize;

/// The detail view a panel's primary action leads to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRoute {
    pub kind: EntityKind,
    pub id: String,
}

impl DetailRoute {
    #[must_use]
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Router path, e.g. `/shop/42`.
    #[must_use]
    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for DetailRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/{}", self.kind, self.id)
    }
}

/// The host's router. The visualizer only issues requests; performing the
/// navigation is up to the implementation.
pub trait Navigator {
    fn navigate(&self, route: &DetailRoute);
}

impl<F> Navigator for F
where
    F: Fn(&DetailRoute),
{
    fn navigate(&self, route: &DetailRoute) {
        self(route);
    }
}
