mod commands;
mod snapshot;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use dalil_core::{EntityKind, ResultSet, UserLocation};
use dalil_map::MarkerFilter;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::commands::{PulseOptions, SceneOptions};

#[derive(Debug, Parser)]
#[command(name = "dalil-cli")]
#[command(about = "Place directory search results on a headless map")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the scene the map surface receives, as JSON
    Scene {
        /// Result set JSON file
        #[arg(long)]
        results: PathBuf,
        #[command(flatten)]
        viewer: ViewerArgs,
        #[arg(long)]
        radius_km: Option<f64>,
        #[arg(long)]
        dark: bool,
        /// Show only these kinds (comma separated)
        #[arg(long, value_delimiter = ',', value_parser = parse_kind)]
        only: Vec<EntityKind>,
        #[arg(long)]
        verified_only: bool,
        #[arg(long, default_value_t = 0.0)]
        min_rating: f64,
    },
    /// Print one marker's detail panel, as JSON
    Panel {
        #[arg(long)]
        results: PathBuf,
        #[arg(long)]
        marker: String,
    },
    /// Run the proximity pulse and print each ring frame
    Pulse {
        #[command(flatten)]
        viewer: ViewerArgs,
        #[arg(long)]
        radius_km: Option<f64>,
        #[arg(long)]
        dark: bool,
        #[arg(long, default_value_t = 3)]
        ticks: u32,
    },
    /// Trigger a marker's primary action and print the route
    Open {
        #[arg(long)]
        results: PathBuf,
        #[arg(long)]
        marker: String,
    },
}

#[derive(Debug, Clone, Copy, Args)]
struct ViewerArgs {
    /// Viewer latitude
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Viewer longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,
    /// Position accuracy in meters
    #[arg(long, default_value_t = 0.0)]
    accuracy: f64,
}

impl ViewerArgs {
    fn location(self) -> Option<UserLocation> {
        Some(UserLocation::new(self.lat?, self.lon?, self.accuracy))
    }
}

fn parse_kind(raw: &str) -> Result<EntityKind, String> {
    let wanted = raw.trim().to_ascii_lowercase();
    EntityKind::ALL
        .into_iter()
        .find(|kind| kind.as_str() == wanted)
        .ok_or_else(|| format!("unknown kind `{raw}` (expected shop, service, user or product)"))
}

fn marker_filter(only: Vec<EntityKind>, verified_only: bool, min_rating: f64) -> MarkerFilter {
    let mut filter = if only.is_empty() {
        MarkerFilter::default()
    } else {
        MarkerFilter::only(only)
    };
    filter.verified_only = verified_only;
    filter.min_rating = min_rating;
    filter
}

fn load_results(path: &Path) -> anyhow::Result<Arc<ResultSet>> {
    let results = ResultSet::from_path(path)
        .with_context(|| format!("loading results from {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        entities = results.len(),
        "loaded result set"
    );
    Ok(Arc::new(results))
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = dalil_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Commands::Scene {
            results,
            viewer,
            radius_km,
            dark,
            only,
            verified_only,
            min_rating,
        } => {
            let options = SceneOptions {
                viewer: viewer.location(),
                radius_km,
                dark,
                filter: marker_filter(only, verified_only, min_rating),
            };
            let scene = commands::scene(&config, load_results(&results)?, options)?;
            print_json(&scene)?;
        }
        Commands::Panel { results, marker } => {
            let panel = commands::panel(&config, load_results(&results)?, &marker)?;
            print_json(&panel)?;
        }
        Commands::Pulse {
            viewer,
            radius_km,
            dark,
            ticks,
        } => {
            let viewer = viewer
                .location()
                .context("pulse needs --lat and --lon")?;
            let options = PulseOptions {
                viewer,
                radius_km,
                dark,
                ticks,
            };
            commands::pulse(&config, options, |frame| {
                println!("{}", serde_json::to_string(frame)?);
                Ok(())
            })
            .await?;
        }
        Commands::Open { results, marker } => {
            let route = commands::open(&config, load_results(&results)?, &marker)?;
            println!("{route}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
