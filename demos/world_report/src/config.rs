//! Optional JSON configuration file.
//!
//! ```json
//! {
//!   "map":      { "grid_width": 800.0, "grid_height": 800.0 },
//!   "analysis": { "candidate_step": 25.0, "geohash_precision": 9 }
//! }
//! ```
//!
//! Every field is optional; missing ones take the library defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use wg_core::MapConfig;
use wg_spatial::{AnalysisConfig, SpatialAnalyzer};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub map:      MapConfig,
    pub analysis: AnalysisConfig,
}

impl ReportConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Apply CLI overrides, then validate into an analyzer.
    pub fn into_analyzer(
        mut self,
        candidate_step: Option<f64>,
        geohash_precision: Option<usize>,
    ) -> Result<SpatialAnalyzer> {
        if let Some(step) = candidate_step {
            self.analysis.candidate_step = step;
        }
        if let Some(precision) = geohash_precision {
            self.analysis.geohash_precision = precision;
        }
        SpatialAnalyzer::new(self.map, self.analysis).context("invalid configuration")
    }
}
