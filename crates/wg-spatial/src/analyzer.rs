//! Aggregate spatial statistics over a population of settlements.
//!
//! Every entry point is a pure function of its input slice: settlements are
//! read, never modified, and settlements without a location are simply left
//! out of the geometric aggregates.  Empty inputs yield zeroed or absent
//! fields, never errors.
//!
//! # Cost
//!
//! | Operation                   | Time              |
//! |-----------------------------|-------------------|
//! | `analyze_distribution`      | O(n)              |
//! | `analyze_travel_patterns`   | O(n²)             |
//! | `find_optimal_locations`    | O(n log n + c log n), c = candidate cells |
//!
//! With the `parallel` feature the two heavier operations fan out over
//! Rayon's thread pool; results are identical apart from floating-point
//! summation order in `TravelReport::average_km`.

use std::cmp::Ordering;
use std::fmt;

use tracing::debug;

use wg_core::geohash::MAX_PRECISION;
use wg_core::{BoundingBox, GamePoint, GeoError, GeoPoint, GeoResult, MapConfig, distance_km};

use crate::index::SettlementIndex;
use crate::settlement::{Settlement, located};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Upper bound on the cells `find_optimal_locations` will sample.  A
/// `candidate_step` that would exceed it is rejected by
/// [`SpatialAnalyzer::new`].
pub const MAX_CANDIDATE_CELLS: usize = 1_000_000;

/// Tunables for the analyzer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalysisConfig {
    /// Densities at or above this many settlements per km² are `Dense`.
    pub dense_threshold: f64,

    /// Densities at or above this (and below `dense_threshold`) are
    /// `Moderate`; anything lower is `Sparse`.
    pub moderate_threshold: f64,

    /// Side length, in grid units, of the cells sampled by
    /// `find_optimal_locations`.  Candidates sit at cell centres.
    pub candidate_step: f64,

    /// Geohash length attached to each candidate.
    pub geohash_precision: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dense_threshold:    1.0,
            moderate_threshold: 0.1,
            candidate_step:     50.0,
            geohash_precision:  8,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> GeoResult<()> {
        if !self.moderate_threshold.is_finite() || self.moderate_threshold < 0.0 {
            return Err(GeoError::InvalidArgument(format!(
                "moderate_threshold must be finite and non-negative, got {}",
                self.moderate_threshold
            )));
        }
        if !self.dense_threshold.is_finite() || self.dense_threshold < self.moderate_threshold {
            return Err(GeoError::InvalidArgument(format!(
                "dense_threshold {} must be finite and at least moderate_threshold {}",
                self.dense_threshold, self.moderate_threshold
            )));
        }
        if !self.candidate_step.is_finite() || self.candidate_step <= 0.0 {
            return Err(GeoError::InvalidArgument(format!(
                "candidate_step must be finite and positive, got {}",
                self.candidate_step
            )));
        }
        if !(1..=MAX_PRECISION).contains(&self.geohash_precision) {
            return Err(GeoError::InvalidArgument(format!(
                "geohash_precision must be between 1 and {MAX_PRECISION}, got {}",
                self.geohash_precision
            )));
        }
        Ok(())
    }
}

// ── Reports ───────────────────────────────────────────────────────────────────

/// Qualitative density bucket.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DensityCategory {
    Sparse,
    Moderate,
    Dense,
}

impl fmt::Display for DensityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DensityCategory::Sparse   => "sparse",
            DensityCategory::Moderate => "moderate",
            DensityCategory::Dense    => "dense",
        };
        f.write_str(s)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DensityMetrics {
    pub area_km2:        f64,
    pub density_per_km2: f64,
    pub category:        DensityCategory,
}

/// Result of [`SpatialAnalyzer::analyze_distribution`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DistributionReport {
    pub total:               usize,
    /// Always `<= total`.
    pub with_coordinates:    usize,
    /// `with_coordinates / total` as a percentage, two decimals; 0 when empty.
    pub coverage_percentage: f64,
    /// Absent when no settlement has coordinates.
    pub geographic_bounds:   Option<BoundingBox>,
    /// Absent when there are no coordinates or the bounding box has zero area.
    pub density:             Option<DensityMetrics>,
}

/// Pairwise great-circle distance statistics.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TravelReport {
    pub average_km: f64,
    pub max_km:     f64,
    pub min_km:     f64,
    /// Number of unordered pairs measured, `n (n - 1) / 2`.
    pub pair_count: usize,
}

/// A suggested spot for a new settlement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Candidate {
    pub game:                  GamePoint,
    pub geo:                   GeoPoint,
    /// Higher is better.  Equal to `nearest_settlement_km`, or 0 when the
    /// world has no located settlements.
    pub score:                 f64,
    pub nearest_settlement_km: Option<f64>,
    pub geohash:               String,
}

// ── Pairwise accumulator ──────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
struct DistanceStats {
    sum:   f64,
    min:   f64,
    max:   f64,
    count: usize,
}

impl DistanceStats {
    const EMPTY: DistanceStats = DistanceStats {
        sum:   0.0,
        min:   f64::INFINITY,
        max:   0.0,
        count: 0,
    };

    fn push(self, d: f64) -> Self {
        Self {
            sum:   self.sum + d,
            min:   self.min.min(d),
            max:   self.max.max(d),
            count: self.count + 1,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            sum:   self.sum + other.sum,
            min:   self.min.min(other.min),
            max:   self.max.max(other.max),
            count: self.count + other.count,
        }
    }

    /// Distances from `points[i]` to every later point.
    fn row(points: &[GeoPoint], i: usize) -> Self {
        let from = points[i];
        points[i + 1..]
            .iter()
            .fold(Self::EMPTY, |acc, &to| acc.push(distance_km(from, to)))
    }
}

// ── Candidate scoring ─────────────────────────────────────────────────────────

struct ScoredCell {
    game:          GamePoint,
    geo:           GeoPoint,
    nearest_km:    Option<f64>,
    center_offset: f64,
}

impl ScoredCell {
    fn score(&self) -> f64 {
        self.nearest_km.unwrap_or(0.0)
    }

    /// Best first: score descending, then closest to the grid centre, then
    /// row-major position.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .score()
            .total_cmp(&self.score())
            .then(self.center_offset.total_cmp(&other.center_offset))
            .then(self.game.y().total_cmp(&other.game.y()))
            .then(self.game.x().total_cmp(&other.game.x()))
    }
}

// ── SpatialAnalyzer ───────────────────────────────────────────────────────────

/// Runs distribution, travel, and site-selection analysis against a map.
///
/// ```
/// use wg_core::GeoPoint;
/// use wg_spatial::SpatialAnalyzer;
///
/// let world = [
///     Some(GeoPoint::new(52.52, 13.40)?),
///     None,
///     Some(GeoPoint::new(48.86, 2.35)?),
/// ];
/// let report = SpatialAnalyzer::default().analyze_distribution(&world);
/// assert_eq!(report.with_coordinates, 2);
/// assert_eq!(report.coverage_percentage, 66.67);
/// # Ok::<(), wg_core::GeoError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct SpatialAnalyzer {
    map:    MapConfig,
    config: AnalysisConfig,
}

impl SpatialAnalyzer {
    /// Build an analyzer, validating both configurations.
    pub fn new(map: MapConfig, config: AnalysisConfig) -> GeoResult<Self> {
        map.validate()?;
        config.validate()?;
        let (cols, rows) = grid_divisions(&map, config.candidate_step);
        if cols * rows > MAX_CANDIDATE_CELLS as f64 {
            return Err(GeoError::InvalidArgument(format!(
                "candidate_step {} yields {cols} × {rows} cells, more than {MAX_CANDIDATE_CELLS}",
                config.candidate_step
            )));
        }
        Ok(Self { map, config })
    }

    pub fn map(&self) -> &MapConfig {
        &self.map
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Coverage, bounding box, and density of the located settlements.
    pub fn analyze_distribution<S: Settlement>(&self, settlements: &[S]) -> DistributionReport {
        let total = settlements.len();
        let points: Vec<GeoPoint> = located(settlements).map(|(_, p)| p).collect();
        let with_coordinates = points.len();

        let coverage_percentage = if total == 0 {
            0.0
        } else {
            round2(with_coordinates as f64 / total as f64 * 100.0)
        };

        let geographic_bounds = BoundingBox::from_points(points.iter().copied());
        let density = geographic_bounds.and_then(|bounds| {
            let area_km2 = bounds.area_km2();
            (area_km2 > 0.0).then(|| {
                let density_per_km2 = with_coordinates as f64 / area_km2;
                DensityMetrics {
                    area_km2,
                    density_per_km2,
                    category: self.categorize(density_per_km2),
                }
            })
        });

        debug!(total, with_coordinates, coverage_percentage, "analyzed settlement distribution");

        DistributionReport {
            total,
            with_coordinates,
            coverage_percentage,
            geographic_bounds,
            density,
        }
    }

    /// Average, maximum, and minimum distance over every pair of located
    /// settlements.  `None` when fewer than two have a location.
    pub fn analyze_travel_patterns<S: Settlement>(&self, settlements: &[S]) -> Option<TravelReport> {
        let points: Vec<GeoPoint> = located(settlements).map(|(_, p)| p).collect();
        let n = points.len();
        if n < 2 {
            debug!(located = n, "too few located settlements for travel analysis");
            return None;
        }

        #[cfg(not(feature = "parallel"))]
        let stats = (0..n)
            .map(|i| DistanceStats::row(&points, i))
            .fold(DistanceStats::EMPTY, DistanceStats::merge);

        #[cfg(feature = "parallel")]
        let stats = {
            use rayon::prelude::*;

            (0..n)
                .into_par_iter()
                .map(|i| DistanceStats::row(&points, i))
                .reduce(|| DistanceStats::EMPTY, DistanceStats::merge)
        };

        debug!(located = n, pairs = stats.count, "analyzed travel patterns");

        Some(TravelReport {
            average_km: stats.sum / stats.count as f64,
            max_km:     stats.max,
            min_km:     stats.min,
            pair_count: stats.count,
        })
    }

    /// The `count` best sites for a new settlement.
    ///
    /// The grid is divided into cells of roughly `candidate_step` units and
    /// each cell centre is scored by its great-circle distance to the
    /// nearest located settlement; farther is better.  Fewer than `count`
    /// candidates are returned only when the grid has fewer cells.
    ///
    /// Fails with [`GeoError::InvalidArgument`] when `count` is zero.
    pub fn find_optimal_locations<S: Settlement>(
        &self,
        settlements: &[S],
        count: usize,
    ) -> GeoResult<Vec<Candidate>> {
        if count == 0 {
            return Err(GeoError::InvalidArgument(
                "candidate count must be at least 1".to_string(),
            ));
        }

        let index = SettlementIndex::build(settlements);
        let cells = self.candidate_cells();
        let center = self.map.center_point();

        let score_cell = |game: GamePoint| -> Option<ScoredCell> {
            // Cells off the valid globe under a custom projection are skipped.
            let geo = self.map.unproject(game).ok()?;
            Some(ScoredCell {
                game,
                geo,
                nearest_km: index.nearest_distance_km(geo),
                center_offset: game.distance_to(center),
            })
        };

        #[cfg(not(feature = "parallel"))]
        let mut scored: Vec<ScoredCell> = cells.into_iter().filter_map(score_cell).collect();

        #[cfg(feature = "parallel")]
        let mut scored: Vec<ScoredCell> = {
            use rayon::prelude::*;

            cells.into_par_iter().filter_map(score_cell).collect()
        };

        scored.sort_by(ScoredCell::rank);
        scored.truncate(count);

        debug!(
            located = index.len(),
            requested = count,
            returned = scored.len(),
            "ranked candidate locations"
        );

        scored
            .into_iter()
            .map(|cell| {
                Ok(Candidate {
                    game:                  cell.game,
                    geo:                   cell.geo,
                    score:                 cell.score(),
                    nearest_settlement_km: cell.nearest_km,
                    geohash:               cell.geo.geohash(self.config.geohash_precision)?,
                })
            })
            .collect()
    }

    /// Centres of the sampling cells, row-major from the south-west corner.
    fn candidate_cells(&self) -> Vec<GamePoint> {
        let (cols, rows) = grid_divisions(&self.map, self.config.candidate_step);
        let (cols, rows) = (cols as usize, rows as usize);
        let cell_w = self.map.grid_width / cols as f64;
        let cell_h = self.map.grid_height / rows as f64;

        (0..rows)
            .flat_map(|r| (0..cols).map(move |c| ((c as f64 + 0.5) * cell_w, (r as f64 + 0.5) * cell_h)))
            .filter_map(|(x, y)| self.map.game_point(x, y).ok())
            .collect()
    }

    fn categorize(&self, density_per_km2: f64) -> DensityCategory {
        if density_per_km2 >= self.config.dense_threshold {
            DensityCategory::Dense
        } else if density_per_km2 >= self.config.moderate_threshold {
            DensityCategory::Moderate
        } else {
            DensityCategory::Sparse
        }
    }
}

/// Columns and rows of sampling cells, each at least 1, kept in `f64` so an
/// oversized grid can be rejected before any integer cast.
fn grid_divisions(map: &MapConfig, step: f64) -> (f64, f64) {
    let cols = (map.grid_width / step).floor().max(1.0);
    let rows = (map.grid_height / step).floor().max(1.0);
    (cols, rows)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ── Free-function shorthands (default map and config) ─────────────────────────

/// [`SpatialAnalyzer::analyze_distribution`] with default configuration.
pub fn analyze_distribution<S: Settlement>(settlements: &[S]) -> DistributionReport {
    SpatialAnalyzer::default().analyze_distribution(settlements)
}

/// [`SpatialAnalyzer::analyze_travel_patterns`] with default configuration.
pub fn analyze_travel_patterns<S: Settlement>(settlements: &[S]) -> Option<TravelReport> {
    SpatialAnalyzer::default().analyze_travel_patterns(settlements)
}

/// [`SpatialAnalyzer::find_optimal_locations`] with default configuration.
pub fn find_optimal_locations<S: Settlement>(
    settlements: &[S],
    count: usize,
) -> GeoResult<Vec<Candidate>> {
    SpatialAnalyzer::default().find_optimal_locations(settlements, count)
}
