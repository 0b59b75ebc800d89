//! Result set → marker list.

use std::collections::HashSet;
use std::sync::Arc;

use dalil_core::{Entity, EntityKind, GeoPoint, ResultSet};
use serde::Serialize;

use crate::resolver::resolve;

/// One entity placed on the map.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    /// `"<kind>-<entity id>"`, or `"<kind>-#<index>"` for a record without
    /// an id. Unique within one aggregation.
    pub id: String,
    pub kind: EntityKind,
    pub position: GeoPoint,
    /// Shared handle to the source record.
    #[serde(skip)]
    pub entity: Entity,
}

/// Build the marker list for a result set.
///
/// Categories are visited shops, services, users, products, each in input
/// order. Entities without a resolvable position are left out. A record with
/// no id gets `"<kind>-#<index>"` from its position in its category; if two
/// records of the same kind share an id, the first one wins.
#[must_use]
pub fn aggregate(results: &ResultSet) -> Vec<Marker> {
    let mut seen = HashSet::new();
    EntityKind::ALL
        .into_iter()
        .flat_map(|kind| {
            results
                .category(kind)
                .iter()
                .enumerate()
                .map(move |(index, entity)| (kind, index, entity))
        })
        .filter_map(|(kind, index, entity)| {
            let position = resolve(entity, kind)?;
            let id = match entity.id() {
                Some(id) => format!("{kind}-{id}"),
                None => format!("{kind}-#{index}"),
            };
            seen.insert(id.clone()).then(|| Marker {
                id,
                kind,
                position,
                entity: entity.clone(),
            })
        })
        .collect()
}

/// Memoised [`aggregate`] keyed on the identity of the result set.
///
/// The marker list is rebuilt only when a different `Arc<ResultSet>` is
/// passed in. The previous source is held strongly so its address cannot be
/// reused by a later allocation.
#[derive(Debug)]
pub struct MarkerCache {
    source: Option<Arc<ResultSet>>,
    markers: Arc<[Marker]>,
    recomputations: u64,
}

impl Default for MarkerCache {
    fn default() -> Self {
        Self {
            source: None,
            markers: Arc::from(Vec::new()),
            recomputations: 0,
        }
    }
}

impl MarkerCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markers for `results`, recomputed only if `results` is not the result
    /// set seen last time.
    pub fn markers_for(&mut self, results: &Arc<ResultSet>) -> Arc<[Marker]> {
        let fresh = self
            .source
            .as_ref()
            .is_some_and(|prev| Arc::ptr_eq(prev, results));
        if !fresh {
            self.markers = Arc::from(aggregate(results));
            self.source = Some(Arc::clone(results));
            self.recomputations += 1;
            tracing::debug!(
                entities = results.len(),
                markers = self.markers.len(),
                "rebuilt marker list"
            );
        }
        Arc::clone(&self.markers)
    }

    /// The last computed list (empty before the first call to
    /// [`markers_for`](Self::markers_for)).
    #[must_use]
    pub fn current(&self) -> Arc<[Marker]> {
        Arc::clone(&self.markers)
    }

    /// How many times the list has been rebuilt.
    #[must_use]
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
