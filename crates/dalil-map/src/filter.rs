//! Display-time narrowing of the marker list.

use std::collections::BTreeSet;

use dalil_core::EntityKind;

use crate::aggregate::Marker;
use crate::presentation::{average_rating, is_verified};

/// Which markers to show. Never reorders; the default shows everything.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerFilter {
    pub kinds: BTreeSet<EntityKind>,
    pub verified_only: bool,
    /// Markers rated below this are hidden; `0.0` disables the check and
    /// keeps unrated markers.
    pub min_rating: f64,
}

impl Default for MarkerFilter {
    fn default() -> Self {
        Self {
            kinds: EntityKind::ALL.into_iter().collect(),
            verified_only: false,
            min_rating: 0.0,
        }
    }
}

impl MarkerFilter {
    #[must_use]
    pub fn only(kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn matches(&self, marker: &Marker) -> bool {
        if !self.kinds.contains(&marker.kind) {
            return false;
        }
        if self.verified_only && !is_verified(marker.kind, &marker.entity) {
            return false;
        }
        if self.min_rating > 0.0 {
            let rating = average_rating(&marker.entity).unwrap_or(0.0);
            if rating < self.min_rating {
                return false;
            }
        }
        true
    }

    #[must_use]
    pub fn apply(&self, markers: &[Marker]) -> Vec<Marker> {
        markers
            .iter()
            .filter(|m| self.matches(m))
            .cloned()
            .collect()
    }
}
