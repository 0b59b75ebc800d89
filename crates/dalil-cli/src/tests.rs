use std::time::Duration;

use dalil_core::{AppConfig, Environment, MapSettings};
use dalil_map::ViewportFocus;
use serde_json::json;

use super::*;

fn config() -> AppConfig {
    AppConfig {
        env: Environment::Test,
        log_level: "debug".to_string(),
        map: MapSettings {
            pulse_interval: Duration::from_millis(100),
            ..MapSettings::default()
        },
    }
}

fn results() -> Arc<ResultSet> {
    let raw = json!({
        "shops": [{"id": 1, "name": "Bakery", "locationLat": 30.05, "locationLon": 31.24}],
        "products": [
            {"id": "p9", "name": "Bread", "stock": 0, "shop": {"latitude": 30.05, "longitude": 31.24}}
        ]
    });
    Arc::new(serde_json::from_value(raw).expect("valid result set"))
}

#[test]
fn parses_scene_command_with_viewer() {
    let cli = Cli::try_parse_from([
        "dalil-cli", "scene", "--results", "r.json", "--lat", "-33.9", "--lon", "18.4",
        "--only", "shop,user",
    ])
    .expect("expected valid cli args");

    let Commands::Scene { viewer, only, .. } = cli.command else {
        panic!("expected scene command");
    };
    let location = viewer.location().expect("viewer location");
    assert!((location.lat + 33.9).abs() < f64::EPSILON);
    assert_eq!(only, vec![EntityKind::Shop, EntityKind::User]);
}

#[test]
fn help_is_answered_by_the_parser() {
    let err = Cli::try_parse_from(["dalil-cli", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn scene_requires_both_coordinates() {
    let err = Cli::try_parse_from(["dalil-cli", "scene", "--results", "r.json", "--lat", "30"]);
    assert!(err.is_err());
}

#[test]
fn rejects_unknown_kind() {
    let err = Cli::try_parse_from([
        "dalil-cli", "scene", "--results", "r.json", "--only", "warehouse",
    ]);
    assert!(err.is_err());
}

#[test]
fn parses_open_command() {
    let cli = Cli::try_parse_from(["dalil-cli", "open", "--results", "r.json", "--marker", "shop-1"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Open { ref marker, .. } if marker == "shop-1"
    ));
}

#[test]
fn pulse_defaults_to_three_ticks() {
    let cli = Cli::try_parse_from(["dalil-cli", "pulse", "--lat", "30", "--lon", "31"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Pulse { ticks: 3, .. }));
}

#[test]
fn empty_kind_list_shows_everything() {
    assert_eq!(marker_filter(Vec::new(), false, 0.0), MarkerFilter::default());
    let filter = marker_filter(vec![EntityKind::Product], true, 4.0);
    assert!(filter.verified_only);
    assert!(!filter.is_pass_through());
}

#[test]
fn scene_without_viewer_centers_on_first_marker() {
    let snapshot = commands::scene(&config(), results(), SceneOptions::default()).unwrap();

    let viewport = snapshot.viewport.expect("viewport");
    assert_eq!(viewport.focus, ViewportFocus::FirstMarker);
    let ids: Vec<&str> = snapshot.markers.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["shop-1", "product-p9"]);
    assert!(snapshot.proximity.is_none());
    assert!(snapshot.user_marker.is_none());
    assert_eq!(snapshot.chrome.expect("chrome").badge.results, "2 results on map");
}

#[tokio::test]
async fn scene_with_viewer_includes_rings() {
    let options = SceneOptions {
        viewer: Some(UserLocation::new(30.0, 31.0, 8.0)),
        radius_km: Some(2.0),
        ..SceneOptions::default()
    };
    let snapshot = commands::scene(&config(), results(), options).unwrap();

    assert_eq!(snapshot.viewport.expect("viewport").focus, ViewportFocus::User);
    let rings = snapshot.proximity.expect("proximity").rings;
    assert!((rings[0].radius_m - 2000.0).abs() < 1e-9);
    assert_eq!(
        snapshot.user_marker.expect("user marker").panel.radius,
        "Search radius: 2km"
    );
}

#[test]
fn open_out_of_stock_product_fails() {
    let err = commands::open(&config(), results(), "product-p9").unwrap_err();
    assert!(err.to_string().contains("disabled"));

    let route = commands::open(&config(), results(), "shop-1").unwrap();
    assert_eq!(route.path(), "/shop/1");
}

#[test]
fn panel_for_unknown_marker_fails() {
    assert!(commands::panel(&config(), results(), "shop-404").is_err());
    let panel = commands::panel(&config(), results(), "shop-1").unwrap();
    assert_eq!(panel.title(), "Bakery");
}

#[tokio::test(start_paused = true)]
async fn pulse_emits_one_frame_per_tick() {
    let mut phases = Vec::new();
    let options = PulseOptions {
        viewer: UserLocation::new(30.0, 31.0, 5.0),
        radius_km: None,
        dark: false,
        ticks: 4,
    };
    commands::pulse(&config(), options, |frame| {
        phases.push(frame.phase.get());
        Ok(())
    })
    .await
    .unwrap();

    assert_eq!(phases, [0, 1, 2, 0, 1]);
}
