//! `world_report` — exercise the worldgeo library from the command line.
//!
//! Point utilities print a single JSON object; `analyze` loads a settlement
//! CSV and prints the distribution, travel, and site-selection reports.
//!
//! Run with:
//!   cargo run -p world_report -- distance 52.520008,13.404954 48.8566,2.3522
//!   cargo run -p world_report -- analyze demos/world_report/data/settlements.csv --candidates 3
//!
//! Set `RUST_LOG=debug` to see the library's tracing output on stderr.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use wg_core::{GeoPoint, MapConfig, geohash};
use wg_spatial::{
    Candidate, DistributionReport, Neighbor, SettlementIndex, TravelReport, load_settlements_csv,
};

use config::ReportConfig;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(author, version, about = "Geographic metrics and settlement reports")]
struct Cli {
    /// JSON file with `map` and `analysis` sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Great-circle distance and initial bearing between two points
    Distance {
        #[arg(value_parser = parse_point, allow_hyphen_values = true)]
        from: GeoPoint,
        #[arg(value_parser = parse_point, allow_hyphen_values = true)]
        to: GeoPoint,
    },

    /// Geohash of a point
    Geohash {
        #[arg(value_parser = parse_point, allow_hyphen_values = true)]
        point: GeoPoint,
        #[arg(long, default_value_t = 9)]
        precision: usize,
    },

    /// Decode a geohash to its cell
    Decode { hash: String },

    /// Project latitude/longitude onto the game grid
    ToGame {
        #[arg(allow_hyphen_values = true)]
        latitude: f64,
        #[arg(allow_hyphen_values = true)]
        longitude: f64,
    },

    /// Project a game-grid position back to latitude/longitude
    ToGeo {
        #[arg(allow_hyphen_values = true)]
        x: f64,
        #[arg(allow_hyphen_values = true)]
        y: f64,
    },

    /// Settlements near a point, from a CSV file
    Near {
        input: PathBuf,
        #[arg(value_parser = parse_point, allow_hyphen_values = true)]
        point: GeoPoint,
        /// Return everything within this many km instead of the k nearest
        #[arg(long)]
        radius_km: Option<f64>,
        #[arg(long, short, default_value_t = 5)]
        k: usize,
    },

    /// Distribution, travel, and optimal-location reports for a CSV file
    Analyze {
        input: PathBuf,
        /// Number of candidate sites to suggest
        #[arg(long, default_value_t = 3)]
        candidates: usize,
        /// Override `analysis.candidate_step`
        #[arg(long)]
        candidate_step: Option<f64>,
        /// Override `analysis.geohash_precision`
        #[arg(long)]
        geohash_precision: Option<usize>,
    },
}

/// Parse `"lat,lon"`.
fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {s:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("latitude {lat:?}: {e}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("longitude {lon:?}: {e}"))?;
    GeoPoint::new(lat, lon).map_err(|e| e.to_string())
}

// ── Output shapes ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct DistanceOutput {
    distance_km:     f64,
    bearing_degrees: f64,
    reverse_bearing: f64,
}

#[derive(Serialize)]
struct AnalysisOutput {
    distribution:      DistributionReport,
    travel_patterns:   Option<TravelReport>,
    optimal_locations: Vec<Candidate>,
}

#[derive(Serialize)]
struct NeighborOutput<'a> {
    id:   u64,
    name: &'a str,
    #[serde(flatten)]
    hit:  Neighbor,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ReportConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Distance { from, to } => print_json(&DistanceOutput {
            distance_km:     from.distance_km(to),
            bearing_degrees: from.bearing_to(to),
            reverse_bearing: to.bearing_to(from),
        }),

        Command::Geohash { point, precision } => {
            print_json(&serde_json::json!({ "geohash": geohash::encode(point, precision)? }))
        }

        Command::Decode { hash } => {
            let cell = geohash::decode(&hash)?;
            print_json(&serde_json::json!({
                "center": cell.center(),
                "bounds": cell.bounds,
                "precision": cell.precision,
            }))
        }

        Command::ToGame { latitude, longitude } => {
            let map: MapConfig = validated_map(config)?;
            print_json(&map.real_world_to_game(latitude, longitude)?)
        }

        Command::ToGeo { x, y } => {
            let map: MapConfig = validated_map(config)?;
            print_json(&map.game_to_real_world(x, y)?)
        }

        Command::Near { input, point, radius_km, k } => {
            let settlements = load_settlements_csv(&input)
                .with_context(|| format!("loading {}", input.display()))?;
            let index = SettlementIndex::build(&settlements);
            let hits = match radius_km {
                Some(r) => index.within_radius(point, r),
                None => index.nearest(point, k),
            };
            let out: Vec<NeighborOutput<'_>> = hits
                .into_iter()
                .map(|hit| {
                    let s = &settlements[hit.index];
                    NeighborOutput { id: s.id, name: &s.name, hit }
                })
                .collect();
            print_json(&out)
        }

        Command::Analyze { input, candidates, candidate_step, geohash_precision } => {
            let analyzer = config.into_analyzer(candidate_step, geohash_precision)?;
            let settlements = load_settlements_csv(&input)
                .with_context(|| format!("loading {}", input.display()))?;
            tracing::info!(count = settlements.len(), "analyzing settlements");

            print_json(&AnalysisOutput {
                distribution:      analyzer.analyze_distribution(&settlements),
                travel_patterns:   analyzer.analyze_travel_patterns(&settlements),
                optimal_locations: analyzer.find_optimal_locations(&settlements, candidates)?,
            })
        }
    }
}

fn validated_map(config: ReportConfig) -> Result<MapConfig> {
    config.map.validate().context("invalid map configuration")?;
    Ok(config.map)
}
