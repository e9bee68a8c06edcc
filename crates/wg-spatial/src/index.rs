//! Nearest-neighbour index over settlement positions.
//!
//! # Keying
//!
//! Entries are stored in an R-tree (via `rstar`) keyed on their position on
//! the unit sphere rather than on raw `(lat, lon)`.  Straight-line chord
//! length between unit vectors grows monotonically with great-circle
//! distance, so the tree's Euclidean nearest-neighbour order *is* the
//! great-circle order, at every latitude and across the antimeridian.
//!
//! Reported distances are recomputed with haversine so they agree exactly
//! with [`wg_core::distance_km`].

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use wg_core::metrics::km_to_radians;
use wg_core::{GeoPoint, distance_km};

use crate::settlement::{Settlement, located};

/// Slack on the squared chord radius so points exactly on the search circle
/// survive rounding; the haversine check afterwards is authoritative.
const CHORD_SLACK: f64 = 1e-12;

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct IndexEntry {
    point:    [f64; 3],
    index:    usize,
    location: GeoPoint,
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexEntry {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        self.point
            .iter()
            .zip(point)
            .map(|(a, b)| (a - b) * (a - b))
            .sum()
    }
}

// ── Neighbor ──────────────────────────────────────────────────────────────────

/// One query hit.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Neighbor {
    /// Position of the settlement in the slice the index was built from.
    pub index:       usize,
    pub location:    GeoPoint,
    pub distance_km: f64,
}

// ── SettlementIndex ───────────────────────────────────────────────────────────

/// Spatial index over the coordinate-bearing members of a settlement slice.
///
/// Settlements without a location are skipped at build time.
///
/// ```
/// use wg_core::GeoPoint;
/// use wg_spatial::SettlementIndex;
///
/// let towns = [
///     GeoPoint::new(52.52, 13.40)?,  // Berlin
///     GeoPoint::new(48.86, 2.35)?,   // Paris
///     GeoPoint::new(50.85, 4.35)?,   // Brussels
/// ];
/// let index = SettlementIndex::build(&towns);
/// let nearest = index.nearest(GeoPoint::new(51.0, 4.0)?, 1);
/// assert_eq!(nearest[0].index, 2);
/// # Ok::<(), wg_core::GeoError>(())
/// ```
pub struct SettlementIndex {
    tree: RTree<IndexEntry>,
}

impl SettlementIndex {
    /// Bulk-load the index, O(n log n).
    pub fn build<S: Settlement>(settlements: &[S]) -> Self {
        let entries: Vec<IndexEntry> = located(settlements)
            .map(|(index, location)| IndexEntry {
                point: location.to_unit_vector(),
                index,
                location,
            })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    /// Number of indexed (coordinate-bearing) settlements.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Up to `k` settlements closest to `point`, nearest first.
    pub fn nearest(&self, point: GeoPoint, k: usize) -> Vec<Neighbor> {
        let query = point.to_unit_vector();
        let mut hits: Vec<Neighbor> = self
            .tree
            .nearest_neighbor_iter(&query)
            .take(k)
            .map(|e| to_neighbor(e, point))
            .collect();
        // Chord order already matches; re-sort to settle haversine ties.
        hits.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km).then(a.index.cmp(&b.index)));
        hits
    }

    /// Great-circle distance from `point` to the closest settlement, if any.
    pub fn nearest_distance_km(&self, point: GeoPoint) -> Option<f64> {
        self.tree
            .nearest_neighbor(&point.to_unit_vector())
            .map(|e| distance_km(point, e.location))
    }

    /// All settlements within `radius_km` of `point`, nearest first.
    /// A negative or NaN radius matches nothing.
    pub fn within_radius(&self, point: GeoPoint, radius_km: f64) -> Vec<Neighbor> {
        if radius_km.is_nan() || radius_km < 0.0 {
            return Vec::new();
        }
        let chord = 2.0 * (km_to_radians(radius_km) * 0.5).sin();
        let mut hits: Vec<Neighbor> = self
            .tree
            .locate_within_distance(point.to_unit_vector(), chord * chord + CHORD_SLACK)
            .map(|e| to_neighbor(e, point))
            .filter(|n| n.distance_km <= radius_km)
            .collect();
        hits.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km).then(a.index.cmp(&b.index)));
        hits
    }
}

fn to_neighbor(entry: &IndexEntry, from: GeoPoint) -> Neighbor {
    Neighbor {
        index:       entry.index,
        location:    entry.location,
        distance_km: distance_km(from, entry.location),
    }
}
