//! Spatial-subsystem error type.

use thiserror::Error;

use wg_core::GeoError;

/// Errors produced by `wg-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error("settlement parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
