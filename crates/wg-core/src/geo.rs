//! Geographic and game-grid coordinate types.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Both components are range
//! checked on construction, so every `GeoPoint` in circulation is valid and
//! the metric functions downstream never need to re-validate.

use std::fmt;

use crate::metrics;
use crate::{GeoError, GeoResult};

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Return `value` if it lies in `[min, max]`, else `GeoError::OutOfRange`.
/// NaN is always rejected.
pub(crate) fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> GeoResult<f64> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(GeoError::OutOfRange { field, value, min, max })
    }
}

// ── GeoPoint ─────────────────────────────────────────────────────────────────

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGeoPoint"))]
pub struct GeoPoint {
    latitude:  f64,
    longitude: f64,
}

impl GeoPoint {
    /// Construct a point, rejecting latitudes outside `[-90, 90]` and
    /// longitudes outside `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> GeoResult<Self> {
        check_range("latitude", latitude, MIN_LATITUDE, MAX_LATITUDE)?;
        check_range("longitude", longitude, MIN_LONGITUDE, MAX_LONGITUDE)?;
        Ok(Self { latitude, longitude })
    }

    /// Construct from values already known to be in range.  Callers clamp or
    /// normalise first.
    #[inline]
    pub(crate) fn from_valid(latitude: f64, longitude: f64) -> Self {
        debug_assert!((MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude));
        debug_assert!((MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude));
        Self { latitude, longitude }
    }

    #[inline]
    pub fn latitude(self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(self) -> f64 {
        self.longitude
    }

    /// Haversine great-circle distance in kilometres.
    #[inline]
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        metrics::distance_km(self, other)
    }

    /// Initial compass bearing towards `other`, in `[0, 360)`.
    #[inline]
    pub fn bearing_to(self, other: GeoPoint) -> f64 {
        metrics::bearing_degrees(self, other)
    }

    /// Geohash of this point at `precision` characters.
    pub fn geohash(self, precision: usize) -> GeoResult<String> {
        crate::geohash::encode(self, precision)
    }

    /// Position on the unit sphere as `[x, y, z]`.
    ///
    /// Chord length between two such vectors is monotone in great-circle
    /// distance, which makes them usable as Euclidean index keys.
    pub fn to_unit_vector(self) -> [f64; 3] {
        let lat = self.latitude.to_radians();
        let lon = self.longitude.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGeoPoint {
    latitude:  f64,
    longitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = GeoError;

    fn try_from(raw: RawGeoPoint) -> GeoResult<Self> {
        GeoPoint::new(raw.latitude, raw.longitude)
    }
}

// ── GamePoint ────────────────────────────────────────────────────────────────

/// A position on the planar game grid.
///
/// Only [`MapConfig`](crate::MapConfig) hands these out, after checking the
/// coordinates against its grid bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GamePoint {
    x: f64,
    y: f64,
}

impl GamePoint {
    #[inline]
    pub(crate) fn from_valid(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn x(self) -> f64 {
        self.x
    }

    #[inline]
    pub fn y(self) -> f64 {
        self.y
    }

    /// Straight-line distance in grid units.
    pub fn distance_to(self, other: GamePoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for GamePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.2}|{:.2}]", self.x, self.y)
    }
}

// ── BoundingBox ──────────────────────────────────────────────────────────────

/// An axis-aligned latitude/longitude rectangle.
///
/// Always satisfies `north >= south` and `east >= west`.  Boxes are built by
/// plain min/max over longitudes, so a set straddling the antimeridian yields
/// a box spanning most of the globe rather than a wrapped one.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoundingBox {
    north:  f64,
    south:  f64,
    east:   f64,
    west:   f64,
    center: GeoPoint,
}

impl BoundingBox {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> GeoResult<Self> {
        let ne = GeoPoint::new(north, east)?;
        let sw = GeoPoint::new(south, west)?;
        if north < south {
            return Err(GeoError::InvalidArgument(format!(
                "bounding box north {north} is below south {south}"
            )));
        }
        if east < west {
            return Err(GeoError::InvalidArgument(format!(
                "bounding box east {east} is west of {west}"
            )));
        }
        Ok(Self::from_corners(ne, sw))
    }

    fn from_corners(ne: GeoPoint, sw: GeoPoint) -> Self {
        let center = GeoPoint::from_valid(
            (ne.latitude + sw.latitude) * 0.5,
            (ne.longitude + sw.longitude) * 0.5,
        );
        Self {
            north: ne.latitude,
            south: sw.latitude,
            east:  ne.longitude,
            west:  sw.longitude,
            center,
        }
    }

    /// Smallest box enclosing every point.  `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut north, mut south) = (first.latitude, first.latitude);
        let (mut east, mut west) = (first.longitude, first.longitude);
        for p in iter {
            north = north.max(p.latitude);
            south = south.min(p.latitude);
            east  = east.max(p.longitude);
            west  = west.min(p.longitude);
        }
        Some(Self::from_corners(
            GeoPoint::from_valid(north, east),
            GeoPoint::from_valid(south, west),
        ))
    }

    pub fn north(&self) -> f64 { self.north }
    pub fn south(&self) -> f64 { self.south }
    pub fn east(&self) -> f64 { self.east }
    pub fn west(&self) -> f64 { self.west }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn contains(&self, p: GeoPoint) -> bool {
        (self.south..=self.north).contains(&p.latitude)
            && (self.west..=self.east).contains(&p.longitude)
    }

    /// East–west extent in km: arc length of the box's own longitude span
    /// along the centre latitude.  Spans past 180° are measured the long way
    /// round, the way the box is defined, not along the shorter great circle.
    pub fn width_km(&self) -> f64 {
        let span = (self.east - self.west).to_radians();
        metrics::EARTH_RADIUS_KM * span * self.center.latitude.to_radians().cos()
    }

    /// North–south extent in km, measured along the centre longitude.
    pub fn height_km(&self) -> f64 {
        let lon = self.center.longitude;
        metrics::distance_km(
            GeoPoint::from_valid(self.south, lon),
            GeoPoint::from_valid(self.north, lon),
        )
    }

    /// Approximate area as `width_km × height_km`.
    pub fn area_km2(&self) -> f64 {
        self.width_km() * self.height_km()
    }
}
