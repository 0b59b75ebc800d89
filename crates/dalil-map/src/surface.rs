//! The external rendering surface and its mount guard.

use std::sync::Arc;

use dalil_core::{EntityKind, GeoPoint};
use serde::Serialize;

use crate::presentation::{
    EmptyState, InfoBadge, LegendEntry, MarkerIcon, TileLayer, UserLocationPanel,
};
use crate::pulse::ProximityOverlay;
use crate::viewport::Viewport;

/// One marker as handed to the surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerView {
    pub id: String,
    pub kind: EntityKind,
    pub position: GeoPoint,
    pub icon: Arc<MarkerIcon>,
    pub popup_max_width: u32,
}

/// The viewer's own marker and its popup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserMarker {
    pub position: GeoPoint,
    pub icon: Arc<MarkerIcon>,
    pub panel: UserLocationPanel,
}

/// Overlays drawn above the map canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chrome {
    pub badge: InfoBadge,
    pub legend: Vec<LegendEntry>,
    /// Present only when no result could be placed on the map. A display
    /// filter hiding every marker does not count.
    pub empty_state: Option<EmptyState>,
}

/// A map canvas, e.g. a Leaflet instance behind a bridge or a test double.
///
/// The visualizer is the only writer. Camera changes made by the user on
/// the surface are not read back.
pub trait MapSurface {
    /// Create the canvas. Called once per mount.
    fn create(&mut self, viewport: &Viewport, tiles: &TileLayer);
    fn set_view(&mut self, viewport: &Viewport);
    fn set_tiles(&mut self, tiles: &TileLayer);
    fn set_markers(&mut self, markers: &[MarkerView]);
    /// `None` removes the viewer's marker.
    fn set_user_marker(&mut self, marker: Option<&UserMarker>);
    /// `None` removes the user marker and its rings.
    fn set_proximity(&mut self, overlay: Option<&ProximityOverlay>);
    fn set_chrome(&mut self, chrome: &Chrome);
    /// Release the canvas. Called once per mount.
    fn destroy(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceState {
    Uninitialized,
    Live,
    TornDown,
}

/// Makes `create`/`destroy` idempotent.
///
/// Hosts may run their setup hook more than once in quick succession; only
/// the first [`initialize`](Self::initialize) reaches the surface, and
/// [`teardown`](Self::teardown) is a no-op unless the surface is live.
#[derive(Debug)]
pub struct SurfaceLifecycle<S> {
    surface: S,
    state: SurfaceState,
}

impl<S: MapSurface> SurfaceLifecycle<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            state: SurfaceState::Uninitialized,
        }
    }

    /// Create the surface unless it is already live. Returns `true` when
    /// this call created it.
    pub fn initialize(&mut self, viewport: &Viewport, tiles: &TileLayer) -> bool {
        if self.state == SurfaceState::Live {
            return false;
        }
        self.surface.create(viewport, tiles);
        self.state = SurfaceState::Live;
        true
    }

    /// Destroy the surface if it is live. Returns `true` when this call
    /// destroyed it.
    pub fn teardown(&mut self) -> bool {
        if self.state != SurfaceState::Live {
            return false;
        }
        self.surface.destroy();
        self.state = SurfaceState::TornDown;
        true
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.state == SurfaceState::Live
    }

    /// Mutable access for updates; `None` unless live.
    pub fn live_mut(&mut self) -> Option<&mut S> {
        if self.is_live() {
            Some(&mut self.surface)
        } else {
            None
        }
    }

    pub fn get(&self) -> &S {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::ViewportFocus;

    #[derive(Debug, Default)]
    struct Counting {
        created: u32,
        destroyed: u32,
        views: u32,
    }

    impl MapSurface for Counting {
        fn create(&mut self, _viewport: &Viewport, _tiles: &TileLayer) {
            self.created += 1;
        }
        fn set_view(&mut self, _viewport: &Viewport) {
            self.views += 1;
        }
        fn set_tiles(&mut self, _tiles: &TileLayer) {}
        fn set_markers(&mut self, _markers: &[MarkerView]) {}
        fn set_user_marker(&mut self, _marker: Option<&UserMarker>) {}
        fn set_proximity(&mut self, _overlay: Option<&ProximityOverlay>) {}
        fn set_chrome(&mut self, _chrome: &Chrome) {}
        fn destroy(&mut self) {
            self.destroyed += 1;
        }
    }

    fn viewport() -> Viewport {
        Viewport {
            center: GeoPoint { lat: 0.0, lon: 0.0 },
            zoom: 13,
            focus: ViewportFocus::Fallback,
        }
    }

    fn tiles() -> TileLayer {
        TileLayer {
            url: "https://tiles.example/{z}/{x}/{y}.png".to_string(),
            attribution: "test",
        }
    }

    #[test]
    fn double_initialize_creates_once() {
        let mut lifecycle = SurfaceLifecycle::new(Counting::default());
        assert!(lifecycle.initialize(&viewport(), &tiles()));
        assert!(!lifecycle.initialize(&viewport(), &tiles()));
        assert!(lifecycle.is_live());
        assert_eq!(lifecycle.get().created, 1);
    }

    #[test]
    fn teardown_never_initialized_is_noop() {
        let mut lifecycle = SurfaceLifecycle::new(Counting::default());
        assert!(!lifecycle.teardown());
        assert!(!lifecycle.teardown());
        assert_eq!(lifecycle.get().destroyed, 0);
    }

    #[test]
    fn teardown_twice_destroys_once() {
        let mut lifecycle = SurfaceLifecycle::new(Counting::default());
        lifecycle.initialize(&viewport(), &tiles());
        assert!(lifecycle.teardown());
        assert!(!lifecycle.teardown());
        assert_eq!(lifecycle.get().destroyed, 1);
        assert!(lifecycle.live_mut().is_none());
    }

    #[test]
    fn remount_after_teardown_creates_again() {
        let mut lifecycle = SurfaceLifecycle::new(Counting::default());
        lifecycle.initialize(&viewport(), &tiles());
        lifecycle.teardown();
        assert!(lifecycle.initialize(&viewport(), &tiles()));
        assert_eq!(lifecycle.get().created, 2);
        lifecycle.live_mut().unwrap().set_view(&viewport());
        assert_eq!(lifecycle.get().views, 1);
    }
}
