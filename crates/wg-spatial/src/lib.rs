//! `wg-spatial` — settlement analysis and spatial indexing.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`settlement`] | `Settlement` trait, `SettlementRecord`                      |
//! | [`analyzer`]   | `SpatialAnalyzer`, `AnalysisConfig`, report types           |
//! | [`index`]      | `SettlementIndex` (unit-sphere R-tree), `Neighbor`          |
//! | [`loader`]     | `load_settlements_csv`, `load_settlements_reader`           |
//! | [`error`]      | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Pairwise statistics and candidate scoring run on Rayon.   |
//! | `serde`    | Derives `Serialize` on reports and (de)serialization on configs. |

pub mod analyzer;
pub mod error;
pub mod index;
pub mod loader;
pub mod settlement;


pub use analyzer::{
    AnalysisConfig, Candidate, DensityCategory, DensityMetrics, DistributionReport,
    MAX_CANDIDATE_CELLS, SpatialAnalyzer, TravelReport, analyze_distribution,
    analyze_travel_patterns, find_optimal_locations,
};
pub use error::{SpatialError, SpatialResult};
pub use index::{Neighbor, SettlementIndex};
pub use loader::{load_settlements_csv, load_settlements_reader};
pub use settlement::{Settlement, SettlementRecord};
