//! Per-kind marker styling and detail panels.

mod icons;
mod overlays;
mod panels;

pub use icons::{marker_icon, user_location_icon, ColorToken, IconCache, IconShape, MarkerIcon};
pub use overlays::{
    info_badge, legend, tile_layer, user_location_panel, EmptyState, InfoBadge, LegendEntry,
    TileLayer, UserLocationPanel, POPUP_MAX_WIDTH,
};
pub use panels::{
    build_panel, Avatar, DetailPanel, PanelAction, ProductPanel, RatingRow, ServicePanel,
    ShopPanel, Stock, UserPanel,
};

pub(crate) use panels::{average_rating, is_verified};

use std::sync::Arc;

use dalil_core::{Entity, EntityKind};

/// How one kind of marker looks, and how its panel is built.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPresentation {
    pub kind: EntityKind,
    pub color: ColorToken,
    pub icon: Arc<MarkerIcon>,
}

impl MarkerPresentation {
    /// Build the detail panel for an entity of this presentation's kind.
    #[must_use]
    pub fn build_panel(&self, entity: &Entity) -> DetailPanel {
        build_panel(self.kind, entity)
    }
}

/// Styling for `kind`. Depends on nothing but the kind.
#[must_use]
pub fn present(kind: EntityKind) -> MarkerPresentation {
    let color = ColorToken::for_kind(kind);
    MarkerPresentation {
        kind,
        color,
        icon: Arc::new(marker_icon(kind, color)),
    }
}
