//! The component the host mounts: owns the surface, the marker cache, the
//! icon cache and the pulse timer, and pushes a scene whenever an input
//! changes.

use std::sync::Arc;

use dalil_core::{MapSettings, ResultSet, UserLocation};
use tokio::sync::watch;

use crate::aggregate::{Marker, MarkerCache};
use crate::error::MapError;
use crate::filter::MarkerFilter;
use crate::navigation::{DetailRoute, Navigator};
use crate::presentation::{
    info_badge, legend, tile_layer, user_location_panel, DetailPanel, EmptyState, IconCache,
    UserLocationPanel, POPUP_MAX_WIDTH,
};
use crate::pulse::{proximity_overlay, ProximityOverlay, PulseAnimator, PulsePhase};
use crate::surface::{Chrome, MapSurface, MarkerView, SurfaceLifecycle, UserMarker};
use crate::viewport::{compute_viewport, Viewport};

/// Inputs the camera was last placed for.
#[derive(Debug)]
struct ViewInputs {
    user_location: Option<UserLocation>,
    markers: Arc<[Marker]>,
}

impl ViewInputs {
    fn unchanged(&self, user_location: Option<&UserLocation>, markers: &Arc<[Marker]>) -> bool {
        self.user_location.as_ref() == user_location && Arc::ptr_eq(&self.markers, markers)
    }
}

/// Map view over one result set.
///
/// Nothing reaches the surface before [`mount`](Self::mount) or after
/// [`unmount`](Self::unmount); setters called in between only record the new
/// input and it is applied on the next mount.
pub struct MapVisualizer<S: MapSurface, N: Navigator> {
    settings: MapSettings,
    surface: SurfaceLifecycle<S>,
    navigator: N,
    markers: MarkerCache,
    icons: IconCache,
    pulse: PulseAnimator,
    results: Arc<ResultSet>,
    user_location: Option<UserLocation>,
    radius_km: f64,
    dark_mode: bool,
    filter: MarkerFilter,
    last_view: Option<ViewInputs>,
}

impl<S: MapSurface, N: Navigator> MapVisualizer<S, N> {
    #[must_use]
    pub fn new(settings: MapSettings, surface: S, navigator: N) -> Self {
        Self {
            radius_km: settings.default_radius_km,
            pulse: PulseAnimator::new(settings.pulse_interval),
            settings,
            surface: SurfaceLifecycle::new(surface),
            navigator,
            markers: MarkerCache::new(),
            icons: IconCache::new(),
            results: Arc::new(ResultSet::default()),
            user_location: None,
            dark_mode: false,
            filter: MarkerFilter::default(),
            last_view: None,
        }
    }

    /// Create the surface and push the full scene. Calling it again while
    /// mounted does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::RuntimeUnavailable`] if a user location is set and
    /// the pulse timer cannot be started. The surface is mounted regardless.
    pub fn mount(&mut self) -> Result<(), MapError> {
        if self.surface.is_live() {
            tracing::debug!("map already mounted");
            return Ok(());
        }
        let viewport = self.viewport();
        let tiles = tile_layer(&self.settings, self.dark_mode);
        self.surface.initialize(&viewport, &tiles);
        tracing::info!(
            zoom = viewport.zoom,
            focus = ?viewport.focus,
            "map mounted"
        );

        self.last_view = Some(ViewInputs {
            user_location: self.user_location,
            markers: self.markers.current(),
        });
        self.push_markers();
        self.push_user_marker();
        self.push_proximity();
        self.pulse.sync(self.user_location.is_some())
    }

    /// Stop the pulse and destroy the surface. Safe to call repeatedly and
    /// before any mount.
    pub fn unmount(&mut self) {
        self.pulse.stop();
        if self.surface.teardown() {
            tracing::info!("map unmounted");
        }
        self.last_view = None;
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.surface.is_live()
    }

    /// Replace the result set. The marker list is rebuilt because the
    /// reference changed; passing the same `Arc` again is free.
    pub fn set_results(&mut self, results: Arc<ResultSet>) {
        self.results = results;
        self.refresh_view();
        self.push_markers();
    }

    /// Set or clear the viewer's position. Starts or stops the pulse while
    /// mounted.
    ///
    /// # Errors
    ///
    /// See [`mount`](Self::mount).
    pub fn set_user_location(&mut self, user_location: Option<UserLocation>) -> Result<(), MapError> {
        self.user_location = user_location.filter(|u| u.position().is_valid());
        if !self.surface.is_live() {
            return Ok(());
        }
        self.refresh_view();
        self.push_user_marker();
        self.push_proximity();
        self.push_chrome();
        self.pulse.sync(self.user_location.is_some())
    }

    /// Search radius for the rings. Non-finite or non-positive values fall
    /// back to the configured default.
    pub fn set_radius_km(&mut self, radius_km: f64) {
        self.radius_km = if radius_km.is_finite() && radius_km > 0.0 {
            radius_km
        } else {
            self.settings.default_radius_km
        };
        self.push_user_marker();
        self.push_proximity();
        self.push_chrome();
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        if self.dark_mode == dark_mode {
            return;
        }
        self.dark_mode = dark_mode;
        let tiles = tile_layer(&self.settings, dark_mode);
        if let Some(surface) = self.surface.live_mut() {
            surface.set_tiles(&tiles);
        }
        self.push_proximity();
    }

    /// Narrow the displayed markers. The cached aggregation is untouched.
    pub fn set_filter(&mut self, filter: MarkerFilter) {
        self.filter = filter;
        self.push_markers();
    }

    /// Redraw the rings for the current pulse phase. Touches nothing but the
    /// proximity overlay.
    pub fn render_pulse(&mut self) {
        self.push_proximity();
    }

    /// Phase changes from the pulse timer; call
    /// [`render_pulse`](Self::render_pulse) on each.
    #[must_use]
    pub fn pulse_updates(&self) -> watch::Receiver<PulsePhase> {
        self.pulse.subscribe()
    }

    #[must_use]
    pub fn pulse_phase(&self) -> PulsePhase {
        self.pulse.phase()
    }

    #[must_use]
    pub fn is_pulsing(&self) -> bool {
        self.pulse.is_running()
    }

    /// The ring overlay for the current phase, if a user location is set.
    #[must_use]
    pub fn proximity(&self) -> Option<ProximityOverlay> {
        self.user_location.as_ref().map(|user| {
            proximity_overlay(user, self.radius_km, self.pulse.phase(), self.dark_mode)
        })
    }

    /// Every resolvable marker, unfiltered.
    pub fn markers(&mut self) -> Arc<[Marker]> {
        self.markers.markers_for(&self.results)
    }

    /// Markers after the display filter.
    pub fn visible_markers(&mut self) -> Vec<Marker> {
        let markers = self.markers();
        if self.filter.is_pass_through() {
            markers.to_vec()
        } else {
            self.filter.apply(&markers)
        }
    }

    /// Camera for the current inputs. Uses the unfiltered marker list so
    /// changing the filter does not move the map.
    pub fn viewport(&mut self) -> Viewport {
        let markers = self.markers();
        compute_viewport(self.user_location.as_ref(), &markers, &self.settings)
    }

    /// Detail panel for a marker id as produced by
    /// [`aggregate`](crate::aggregate::aggregate).
    pub fn panel(&mut self, marker_id: &str) -> Option<DetailPanel> {
        let markers = self.markers();
        let marker = markers.iter().find(|m| m.id == marker_id)?;
        Some(self.icons.present(marker.kind).build_panel(&marker.entity))
    }

    #[must_use]
    pub fn user_location_panel(&self) -> Option<UserLocationPanel> {
        self.user_location
            .as_ref()
            .map(|user| user_location_panel(user, self.radius_km))
    }

    /// Trigger the primary action of a marker's panel.
    ///
    /// # Errors
    ///
    /// [`MapError::UnknownMarker`] if no marker has `marker_id`, and
    /// [`MapError::ActionDisabled`] if the panel's action is disabled. No
    /// navigation is requested in either case.
    pub fn activate(&mut self, marker_id: &str) -> Result<DetailRoute, MapError> {
        let panel = self
            .panel(marker_id)
            .ok_or_else(|| MapError::UnknownMarker(marker_id.to_string()))?;
        let action = panel.primary_action();
        if !action.enabled {
            return Err(MapError::ActionDisabled(marker_id.to_string()));
        }
        tracing::debug!(route = %action.route, "navigating to detail view");
        self.navigator.navigate(&action.route);
        Ok(action.route.clone())
    }

    pub fn surface(&self) -> &S {
        self.surface.get()
    }

    #[must_use]
    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    #[must_use]
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// How many times the marker list has been rebuilt.
    #[must_use]
    pub fn recomputations(&self) -> u64 {
        self.markers.recomputations()
    }

    /// Move the camera if the user location or the marker list changed since
    /// it was last placed.
    fn refresh_view(&mut self) {
        if !self.surface.is_live() {
            return;
        }
        let markers = self.markers();
        if self
            .last_view
            .as_ref()
            .is_some_and(|last| last.unchanged(self.user_location.as_ref(), &markers))
        {
            return;
        }
        let viewport = compute_viewport(self.user_location.as_ref(), &markers, &self.settings);
        tracing::debug!(
            lat = viewport.center.lat,
            lon = viewport.center.lon,
            zoom = viewport.zoom,
            "moving camera"
        );
        if let Some(surface) = self.surface.live_mut() {
            surface.set_view(&viewport);
        }
        self.last_view = Some(ViewInputs {
            user_location: self.user_location,
            markers,
        });
    }

    fn push_markers(&mut self) {
        if !self.surface.is_live() {
            return;
        }
        let views: Vec<MarkerView> = self
            .visible_markers()
            .into_iter()
            .map(|marker| MarkerView {
                icon: Arc::clone(&self.icons.present(marker.kind).icon),
                id: marker.id,
                kind: marker.kind,
                position: marker.position,
                popup_max_width: POPUP_MAX_WIDTH,
            })
            .collect();
        if let Some(surface) = self.surface.live_mut() {
            surface.set_markers(&views);
        }
        self.push_chrome();
    }

    fn push_user_marker(&mut self) {
        if !self.surface.is_live() {
            return;
        }
        let marker = self.user_location.map(|user| UserMarker {
            position: user.position(),
            icon: self.icons.user_location(),
            panel: user_location_panel(&user, self.radius_km),
        });
        if let Some(surface) = self.surface.live_mut() {
            surface.set_user_marker(marker.as_ref());
        }
    }

    fn push_proximity(&mut self) {
        let overlay = self.proximity();
        if let Some(surface) = self.surface.live_mut() {
            surface.set_proximity(overlay.as_ref());
        }
    }

    fn push_chrome(&mut self) {
        if !self.surface.is_live() {
            return;
        }
        let nothing_placed = self.markers().is_empty();
        let visible = self.visible_markers().len();
        let chrome = Chrome {
            badge: info_badge(visible, self.user_location.is_some(), self.radius_km),
            legend: legend(),
            empty_state: nothing_placed.then(EmptyState::default),
        };
        if let Some(surface) = self.surface.live_mut() {
            surface.set_chrome(&chrome);
        }
    }
}

impl<S: MapSurface, N: Navigator> Drop for MapVisualizer<S, N> {
    fn drop(&mut self) {
        self.unmount();
    }
}
