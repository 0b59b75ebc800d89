//! A map surface that keeps the latest state it was sent.

use dalil_map::presentation::TileLayer;
use dalil_map::{Chrome, MapSurface, MarkerView, ProximityOverlay, UserMarker, Viewport};
use serde::Serialize;

/// Headless surface: every call overwrites the matching slot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SceneSnapshot {
    pub viewport: Option<Viewport>,
    pub tiles: Option<TileLayer>,
    pub markers: Vec<MarkerView>,
    pub user_marker: Option<UserMarker>,
    pub proximity: Option<ProximityOverlay>,
    pub chrome: Option<Chrome>,
    #[serde(skip)]
    pub destroyed: bool,
}

impl MapSurface for SceneSnapshot {
    fn create(&mut self, viewport: &Viewport, tiles: &TileLayer) {
        *self = Self {
            viewport: Some(*viewport),
            tiles: Some(tiles.clone()),
            ..Self::default()
        };
    }

    fn set_view(&mut self, viewport: &Viewport) {
        self.viewport = Some(*viewport);
    }

    fn set_tiles(&mut self, tiles: &TileLayer) {
        self.tiles = Some(tiles.clone());
    }

    fn set_markers(&mut self, markers: &[MarkerView]) {
        self.markers = markers.to_vec();
    }

    fn set_user_marker(&mut self, marker: Option<&UserMarker>) {
        self.user_marker = marker.cloned();
    }

    fn set_proximity(&mut self, overlay: Option<&ProximityOverlay>) {
        self.proximity = overlay.cloned();
    }

    fn set_chrome(&mut self, chrome: &Chrome) {
        self.chrome = Some(chrome.clone());
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}
