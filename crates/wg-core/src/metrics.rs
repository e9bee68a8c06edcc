//! Great-circle metrics on a spherical Earth.
//!
//! All functions take validated [`GeoPoint`]s, so none of them can fail on
//! coordinates.  Accuracy is that of the spherical model (≈0.5 % against the
//! WGS-84 ellipsoid), which is plenty for gameplay distances.

use std::f64::consts::PI;

use crate::geo::{MAX_LATITUDE, MIN_LATITUDE};
use crate::{GeoError, GeoPoint, GeoResult};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Haversine great-circle distance in kilometres.
///
/// Symmetric in its arguments and exactly `0.0` for identical points.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let d_lat = (b.latitude() - a.latitude()).to_radians();
    let d_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (d_lat * 0.5).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing (forward azimuth) from `from` to `to`, in degrees
/// clockwise from true north, normalised to `[0, 360)`.
///
/// Coincident points have no defined bearing; `0.0` is returned.
pub fn bearing_degrees(from: GeoPoint, to: GeoPoint) -> f64 {
    if from == to {
        return 0.0;
    }

    let lat1 = from.latitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let d_lon = (to.longitude() - from.longitude()).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    normalize_bearing(y.atan2(x).to_degrees())
}

/// Point reached by travelling `distance_km` from `start` along the great
/// circle with initial bearing `bearing_deg`.
pub fn destination(start: GeoPoint, bearing_deg: f64, distance_km: f64) -> GeoResult<GeoPoint> {
    if !bearing_deg.is_finite() {
        return Err(GeoError::InvalidArgument(format!("bearing {bearing_deg} is not finite")));
    }
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(GeoError::InvalidArgument(format!(
            "distance {distance_km} km must be finite and non-negative"
        )));
    }

    let delta = distance_km / EARTH_RADIUS_KM;
    let theta = bearing_deg.to_radians();
    let lat1 = start.latitude().to_radians();
    let lon1 = start.longitude().to_radians();

    let sin_lat2 = lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    Ok(GeoPoint::from_valid(
        clamp_latitude(lat2.to_degrees()),
        normalize_longitude(lon2.to_degrees()),
    ))
}

/// Great-circle midpoint of `a` and `b`.
pub fn midpoint(a: GeoPoint, b: GeoPoint) -> GeoPoint {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let lon1 = a.longitude().to_radians();
    let d_lon = (b.longitude() - a.longitude()).to_radians();

    let bx = lat2.cos() * d_lon.cos();
    let by = lat2.cos() * d_lon.sin();

    let lat_m = (lat1.sin() + lat2.sin()).atan2(((lat1.cos() + bx).powi(2) + by * by).sqrt());
    let lon_m = lon1 + by.atan2(lat1.cos() + bx);

    GeoPoint::from_valid(
        clamp_latitude(lat_m.to_degrees()),
        normalize_longitude(lon_m.to_degrees()),
    )
}

// ── Normalisation helpers ─────────────────────────────────────────────────────

pub(crate) fn normalize_bearing(deg: f64) -> f64 {
    let b = deg.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0.
    if b >= 360.0 { 0.0 } else { b }
}

fn normalize_longitude(deg: f64) -> f64 {
    let lon = (deg + 180.0).rem_euclid(360.0) - 180.0;
    lon.clamp(-180.0, 180.0)
}

fn clamp_latitude(deg: f64) -> f64 {
    deg.clamp(MIN_LATITUDE, MAX_LATITUDE)
}

/// Angular distance in radians subtended by `km` of great-circle arc.
#[inline]
pub fn km_to_radians(km: f64) -> f64 {
    (km / EARTH_RADIUS_KM).min(PI)
}
