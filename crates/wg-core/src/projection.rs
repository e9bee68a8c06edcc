//! Real-world ⇄ game-grid coordinate transform.
//!
//! # Model
//!
//! A linear (equirectangular) map.  The reference `origin` lands on the grid
//! centre and each degree is worth a fixed number of grid units:
//!
//! ```text
//! x = grid_width  / 2 + (lon - origin.lon) * units_per_degree_lon
//! y = grid_height / 2 + (lat - origin.lat) * units_per_degree_lat
//! ```
//!
//! `y` therefore grows northwards.  The default configuration squeezes the
//! whole globe into a 1000 × 1000 grid, so every valid `GeoPoint` has a grid
//! position.  Zoomed-in configurations (a regional origin with a larger
//! scale) reject points that would fall off the map.

use crate::geo::{MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE, check_range};
use crate::{GamePoint, GeoError, GeoPoint, GeoResult};

/// Slack allowed at grid and lat/lon edges for floating-point round-off.
/// Values inside the slack are clamped onto the edge.
const EDGE_EPSILON: f64 = 1e-9;

/// Grid dimensions and projection parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MapConfig {
    /// Grid extent along x; valid x is `0..=grid_width`.
    pub grid_width: f64,

    /// Grid extent along y; valid y is `0..=grid_height`.
    pub grid_height: f64,

    /// Geographic point mapped onto the grid centre.
    pub origin: GeoPoint,

    /// Grid units per degree of longitude.
    pub units_per_degree_lon: f64,

    /// Grid units per degree of latitude.
    pub units_per_degree_lat: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            grid_width:           1_000.0,
            grid_height:          1_000.0,
            origin:               GeoPoint::from_valid(0.0, 0.0),
            units_per_degree_lon: 1_000.0 / 360.0,
            units_per_degree_lat: 1_000.0 / 180.0,
        }
    }
}

impl MapConfig {
    /// Reject non-finite or non-positive grid sizes and scales.
    pub fn validate(&self) -> GeoResult<()> {
        let positive = [
            ("grid_width", self.grid_width),
            ("grid_height", self.grid_height),
            ("units_per_degree_lon", self.units_per_degree_lon),
            ("units_per_degree_lat", self.units_per_degree_lat),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(GeoError::InvalidArgument(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Grid centre `(x, y)`.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.grid_width * 0.5, self.grid_height * 0.5)
    }

    /// The grid centre as a `GamePoint`.
    pub fn center_point(&self) -> GamePoint {
        let (cx, cy) = self.center();
        GamePoint::from_valid(cx, cy)
    }

    /// Build a `GamePoint`, rejecting coordinates outside the grid.
    pub fn game_point(&self, x: f64, y: f64) -> GeoResult<GamePoint> {
        let x = snap_to_range("x", x, 0.0, self.grid_width)?;
        let y = snap_to_range("y", y, 0.0, self.grid_height)?;
        Ok(GamePoint::from_valid(x, y))
    }

    /// Convert raw latitude/longitude to a grid position.
    ///
    /// Fails with [`GeoError::OutOfRange`] when the input is not a valid
    /// geographic coordinate, or when it projects outside the grid.
    pub fn real_world_to_game(&self, latitude: f64, longitude: f64) -> GeoResult<GamePoint> {
        self.project(GeoPoint::new(latitude, longitude)?)
    }

    /// Convert a grid position back to latitude/longitude.  Exact inverse of
    /// [`real_world_to_game`](Self::real_world_to_game).
    pub fn game_to_real_world(&self, x: f64, y: f64) -> GeoResult<GeoPoint> {
        self.unproject(self.game_point(x, y)?)
    }

    pub fn project(&self, p: GeoPoint) -> GeoResult<GamePoint> {
        let (cx, cy) = self.center();
        let x = cx + (p.longitude() - self.origin.longitude()) * self.units_per_degree_lon;
        let y = cy + (p.latitude() - self.origin.latitude()) * self.units_per_degree_lat;
        self.game_point(x, y)
    }

    pub fn unproject(&self, g: GamePoint) -> GeoResult<GeoPoint> {
        let (cx, cy) = self.center();
        let lon = self.origin.longitude() + (g.x() - cx) / self.units_per_degree_lon;
        let lat = self.origin.latitude() + (g.y() - cy) / self.units_per_degree_lat;
        let lat = snap_to_range("latitude", lat, MIN_LATITUDE, MAX_LATITUDE)?;
        let lon = snap_to_range("longitude", lon, MIN_LONGITUDE, MAX_LONGITUDE)?;
        GeoPoint::new(lat, lon)
    }
}

/// Like `check_range`, but values within `EDGE_EPSILON` of an edge are
/// clamped onto it.
fn snap_to_range(field: &'static str, value: f64, min: f64, max: f64) -> GeoResult<f64> {
    if value < min && value >= min - EDGE_EPSILON {
        return Ok(min);
    }
    if value > max && value <= max + EDGE_EPSILON {
        return Ok(max);
    }
    check_range(field, value, min, max)
}
