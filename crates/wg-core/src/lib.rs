//! `wg-core` — foundational geographic types for the `worldgeo` workspace.
//!
//! Everything here is a pure function over `Copy` values.  There is no
//! shared state, no I/O, and no allocation beyond geohash strings.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`geo`]         | `GeoPoint`, `GamePoint`, `BoundingBox`                |
//! | [`metrics`]     | haversine distance, initial bearing, destination      |
//! | [`projection`]  | `MapConfig` — real world ⇄ game grid transform        |
//! | [`geohash`]     | base-32 geohash `encode` / `decode`                   |
//! | [`error`]       | `GeoError`, `GeoResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Deserialized `GeoPoint`s are range-checked.                |
//!
//! # Example
//!
//! ```
//! use wg_core::GeoPoint;
//!
//! let berlin = GeoPoint::new(52.520008, 13.404954)?;
//! let paris  = GeoPoint::new(48.8566, 2.3522)?;
//! assert!((berlin.distance_km(paris) - 878.0).abs() < 10.0);
//! # Ok::<(), wg_core::GeoError>(())
//! ```

pub mod error;
pub mod geo;
pub mod geohash;
pub mod metrics;
pub mod projection;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{GeoError, GeoResult};
pub use geo::{BoundingBox, GamePoint, GeoPoint};
pub use geohash::GeohashCell;
pub use metrics::{EARTH_RADIUS_KM, bearing_degrees, distance_km};
pub use projection::MapConfig;
