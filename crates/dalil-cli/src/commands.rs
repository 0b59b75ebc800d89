//! Subcommand bodies. Each drives one headless [`MapVisualizer`].

use std::sync::Arc;

use dalil_core::{AppConfig, ResultSet, UserLocation};
use dalil_map::{DetailPanel, DetailRoute, MapError, MapVisualizer, MarkerFilter, ProximityOverlay};

use crate::snapshot::SceneSnapshot;

type Visualizer = MapVisualizer<SceneSnapshot, fn(&DetailRoute)>;

fn log_navigation(route: &DetailRoute) {
    tracing::info!(route = %route, "navigation requested");
}

fn visualizer(config: &AppConfig, results: Arc<ResultSet>) -> Visualizer {
    let mut vis = MapVisualizer::new(
        config.map.clone(),
        SceneSnapshot::default(),
        log_navigation as fn(&DetailRoute),
    );
    vis.set_results(results);
    vis
}

#[derive(Debug, Clone, Default)]
pub struct SceneOptions {
    pub viewer: Option<UserLocation>,
    pub radius_km: Option<f64>,
    pub dark: bool,
    pub filter: MarkerFilter,
}

/// Mount a map over `results` and return what the surface received.
///
/// # Errors
///
/// Fails when a viewer is given and no tokio runtime is running.
pub fn scene(
    config: &AppConfig,
    results: Arc<ResultSet>,
    options: SceneOptions,
) -> anyhow::Result<SceneSnapshot> {
    let mut vis = visualizer(config, results);
    if let Some(radius_km) = options.radius_km {
        vis.set_radius_km(radius_km);
    }
    vis.set_dark_mode(options.dark);
    vis.set_filter(options.filter);
    vis.set_user_location(options.viewer)?;
    vis.mount()?;

    let snapshot = vis.surface().clone();
    tracing::info!(
        markers = snapshot.markers.len(),
        recomputations = vis.recomputations(),
        "scene rendered"
    );
    Ok(snapshot)
}

/// Detail panel for one marker id.
///
/// # Errors
///
/// [`MapError::UnknownMarker`] when no marker has `marker_id`.
pub fn panel(
    config: &AppConfig,
    results: Arc<ResultSet>,
    marker_id: &str,
) -> anyhow::Result<DetailPanel> {
    let mut vis = visualizer(config, results);
    let panel = vis
        .panel(marker_id)
        .ok_or_else(|| MapError::UnknownMarker(marker_id.to_string()))?;
    Ok(panel)
}

/// Trigger a marker's primary action.
///
/// # Errors
///
/// Unknown marker ids and disabled actions.
pub fn open(
    config: &AppConfig,
    results: Arc<ResultSet>,
    marker_id: &str,
) -> anyhow::Result<DetailRoute> {
    let mut vis = visualizer(config, results);
    Ok(vis.activate(marker_id)?)
}

#[derive(Debug, Clone, Copy)]
pub struct PulseOptions {
    pub viewer: UserLocation,
    pub radius_km: Option<f64>,
    pub dark: bool,
    pub ticks: u32,
}

/// Run the pulse for `ticks` phase changes, handing every ring frame to
/// `emit`, starting with the phase-0 frame.
///
/// # Errors
///
/// Propagates errors from `emit` and from starting the timer.
pub async fn pulse(
    config: &AppConfig,
    options: PulseOptions,
    mut emit: impl FnMut(&ProximityOverlay) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    let mut vis = visualizer(config, Arc::new(ResultSet::default()));
    if let Some(radius_km) = options.radius_km {
        vis.set_radius_km(radius_km);
    }
    vis.set_dark_mode(options.dark);
    vis.set_user_location(Some(options.viewer))?;
    vis.mount()?;

    let mut updates = vis.pulse_updates();
    if let Some(frame) = &vis.surface().proximity {
        emit(frame)?;
    }
    for _ in 0..options.ticks {
        updates.changed().await?;
        vis.render_pulse();
        if let Some(frame) = &vis.surface().proximity {
            emit(frame)?;
        }
    }
    vis.unmount();
    Ok(())
}
