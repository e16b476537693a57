#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CLI tool for generating scored overlay artifacts for the map page.
//!
//! Reads the prepared IMD boundary `GeoJSON` and a saved hourly air quality
//! bulletin, and writes pre-colored overlay `FeatureCollection`s plus legend
//! tables to the output directory the static frontend serves.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use propmap_generate::overlay::{build_overlay, legend_entries};
use propmap_generate::{regions, stations};
use propmap_models::{OverlayLayer, Region, Station};

#[derive(Parser)]
#[command(name = "propmap_generate", about = "Overlay generation tool")]
struct Cli {
    /// Prepared IMD boundary GeoJSON (output of the data prep script).
    #[arg(long, default_value = "app/data/west-london-imd.geojson")]
    regions: PathBuf,

    /// Saved hourly air quality bulletin JSON.
    #[arg(long, default_value = "app/data/airquality-hourly.json")]
    stations: PathBuf,

    /// Directory to write overlay and legend artifacts into.
    #[arg(long, default_value = "app/data/generated")]
    output: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the combined-score choropleth
    Combined,
    /// Generate the deprivation choropleth
    Deprivation,
    /// Generate the air quality station layer
    AirQuality,
    /// Generate every offline-capable overlay
    All,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    std::fs::create_dir_all(&cli.output)?;

    let layers: &[OverlayLayer] = match cli.command {
        Commands::Combined => &[OverlayLayer::Combined],
        Commands::Deprivation => &[OverlayLayer::Deprivation],
        Commands::AirQuality => &[OverlayLayer::AirQuality],
        Commands::All => &[
            OverlayLayer::Combined,
            OverlayLayer::Deprivation,
            OverlayLayer::AirQuality,
        ],
    };

    let region_map = if layers.iter().any(|layer| needs_regions(*layer)) {
        regions::load_regions(&cli.regions)?
    } else {
        BTreeMap::new()
    };

    let station_map = if layers.iter().any(|layer| needs_stations(*layer)) {
        stations::load_stations(&cli.stations)?
    } else {
        BTreeMap::new()
    };

    for &layer in layers {
        generate_layer(layer, &region_map, &station_map, &cli.output)?;
    }

    Ok(())
}

const fn needs_regions(layer: OverlayLayer) -> bool {
    matches!(layer, OverlayLayer::Combined | OverlayLayer::Deprivation)
}

const fn needs_stations(layer: OverlayLayer) -> bool {
    matches!(layer, OverlayLayer::Combined | OverlayLayer::AirQuality)
}

/// Writes `<layer>.geojson` and `<layer>-legend.json` for one layer.
fn generate_layer(
    layer: OverlayLayer,
    region_map: &BTreeMap<String, Region>,
    station_map: &BTreeMap<String, Station>,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Generating {} overlay...", layer.label());

    let collection = build_overlay(layer, region_map, station_map)?;
    let legend = legend_entries(layer)?;

    let overlay_path = output.join(format!("{layer}.geojson"));
    std::fs::write(&overlay_path, serde_json::to_string(&collection)?)?;
    log::info!(
        "Wrote {} features to {}",
        collection.features.len(),
        overlay_path.display()
    );

    let legend_path = output.join(format!("{layer}-legend.json"));
    std::fs::write(&legend_path, serde_json::to_string_pretty(&legend)?)?;
    log::info!("Wrote legend to {}", legend_path.display());

    Ok(())
}
