//! Base-32 geohash encoding.
//!
//! Bits alternate longitude, latitude, longitude, … starting with longitude.
//! Each bit halves the current interval: `1` when the coordinate is at or
//! above the midpoint, `0` otherwise.  Every five bits form one character of
//! the alphabet below (the standard one, without `a`, `i`, `l`, `o`).
//!
//! Nearby points usually share a long common prefix, but cells that meet at
//! a high-level boundary (the equator, the prime meridian) share none, so
//! prefix length is a heuristic for proximity and not a metric.

use crate::geo::{MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE};
use crate::{BoundingBox, GeoError, GeoPoint, GeoResult};

const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Longest accepted hash.  22 characters is 110 bits, past the point where an
/// `f64` coordinate still contributes information.
pub const MAX_PRECISION: usize = 22;

const BITS_PER_CHAR: u32 = 5;

/// The rectangle a geohash denotes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GeohashCell {
    pub bounds:    BoundingBox,
    pub precision: usize,
}

impl GeohashCell {
    /// Centre of the cell; the conventional decoded position.
    pub fn center(&self) -> GeoPoint {
        self.bounds.center()
    }

    /// Half the cell's latitude and longitude extent, in degrees.
    pub fn error_degrees(&self) -> (f64, f64) {
        (
            (self.bounds.north() - self.bounds.south()) * 0.5,
            (self.bounds.east() - self.bounds.west()) * 0.5,
        )
    }
}

fn check_precision(precision: usize) -> GeoResult<()> {
    if (1..=MAX_PRECISION).contains(&precision) {
        Ok(())
    } else {
        Err(GeoError::InvalidArgument(format!(
            "geohash precision must be between 1 and {MAX_PRECISION}, got {precision}"
        )))
    }
}

/// Encode `point` as a geohash of exactly `precision` characters.
///
/// ```
/// use wg_core::{GeoPoint, geohash};
///
/// let p = GeoPoint::new(57.64911, 10.40744)?;
/// assert_eq!(geohash::encode(p, 11)?, "u4pruydqqvj");
/// # Ok::<(), wg_core::GeoError>(())
/// ```
pub fn encode(point: GeoPoint, precision: usize) -> GeoResult<String> {
    check_precision(precision)?;

    let mut lat_range = (MIN_LATITUDE, MAX_LATITUDE);
    let mut lon_range = (MIN_LONGITUDE, MAX_LONGITUDE);
    let mut hash = String::with_capacity(precision);
    let mut is_lon = true;
    let mut bits = 0u32;
    let mut value = 0usize;

    while hash.len() < precision {
        let (range, coord) = if is_lon {
            (&mut lon_range, point.longitude())
        } else {
            (&mut lat_range, point.latitude())
        };
        let mid = (range.0 + range.1) * 0.5;
        value <<= 1;
        if coord >= mid {
            value |= 1;
            range.0 = mid;
        } else {
            range.1 = mid;
        }
        is_lon = !is_lon;

        bits += 1;
        if bits == BITS_PER_CHAR {
            hash.push(char::from(BASE32[value]));
            bits = 0;
            value = 0;
        }
    }

    Ok(hash)
}

/// Decode a geohash to the cell it denotes.  Case-insensitive.
pub fn decode(hash: &str) -> GeoResult<GeohashCell> {
    let precision = hash.chars().count();
    check_precision(precision)?;

    let mut lat_range = (MIN_LATITUDE, MAX_LATITUDE);
    let mut lon_range = (MIN_LONGITUDE, MAX_LONGITUDE);
    let mut is_lon = true;

    for c in hash.chars() {
        let lower = c.to_ascii_lowercase();
        let idx = BASE32
            .iter()
            .position(|&b| char::from(b) == lower)
            .ok_or_else(|| {
                GeoError::InvalidArgument(format!("invalid geohash character {c:?} in {hash:?}"))
            })?;

        for shift in (0..BITS_PER_CHAR).rev() {
            let bit = (idx >> shift) & 1;
            let range = if is_lon { &mut lon_range } else { &mut lat_range };
            let mid = (range.0 + range.1) * 0.5;
            if bit == 1 {
                range.0 = mid;
            } else {
                range.1 = mid;
            }
            is_lon = !is_lon;
        }
    }

    let bounds = BoundingBox::new(lat_range.1, lat_range.0, lon_range.1, lon_range.0)?;
    Ok(GeohashCell { bounds, precision })
}

/// Number of leading characters `a` and `b` have in common.
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.bytes().zip(b.bytes()).take_while(|(x, y)| x == y).count()
}
