//! CSV settlement loader.
//!
//! # CSV format
//!
//! One row per settlement.  `latitude` and `longitude` are either both
//! present or both empty (a settlement that has not been placed on the real
//! world map yet).
//!
//! ```csv
//! id,name,latitude,longitude
//! 1,Northwatch,52.520008,13.404954
//! 2,Fenhold,,
//! 3,Brightwater,48.8566,2.3522
//! ```
//!
//! Rows are numbered from 1 (the first line after the header) in error
//! messages.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use wg_core::GeoPoint;

use crate::settlement::SettlementRecord;
use crate::{SpatialError, SpatialResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SettlementRow {
    id:        u64,
    name:      String,
    latitude:  Option<f64>,
    longitude: Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load settlements from a CSV file.
pub fn load_settlements_csv(path: &Path) -> SpatialResult<Vec<SettlementRecord>> {
    let file = std::fs::File::open(path)?;
    let settlements = load_settlements_reader(file)?;
    debug!(path = %path.display(), count = settlements.len(), "loaded settlements");
    Ok(settlements)
}

/// Like [`load_settlements_csv`] but accepts any `Read` source.
pub fn load_settlements_reader<R: Read>(reader: R) -> SpatialResult<Vec<SettlementRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<SettlementRow>()
        .enumerate()
        .map(|(i, result)| {
            let row_number = i + 1;
            let row = result.map_err(|e| SpatialError::Parse(format!("row {row_number}: {e}")))?;
            let location = parse_location(row_number, row.latitude, row.longitude)?;
            Ok(SettlementRecord {
                id: row.id,
                name: row.name,
                location,
            })
        })
        .collect()
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_location(
    row_number: usize,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> SpatialResult<Option<GeoPoint>> {
    match (latitude, longitude) {
        (None, None) => Ok(None),
        (Some(lat), Some(lon)) => GeoPoint::new(lat, lon)
            .map(Some)
            .map_err(|e| SpatialError::Parse(format!("row {row_number}: {e}"))),
        _ => Err(SpatialError::Parse(format!(
            "row {row_number}: latitude and longitude must both be set or both be empty"
        ))),
    }
}
