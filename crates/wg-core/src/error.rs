//! Error type shared by every `wg-*` crate.
//!
//! Only two things can go wrong in pure geometry: a value lies outside its
//! domain, or a caller-supplied parameter is meaningless.  Empty inputs are
//! never errors; the analysis layer reports them as absent fields instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// A coordinate (latitude, longitude, grid x/y) is outside its valid range.
    #[error("{field} {value} is outside the valid range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min:   f64,
        max:   f64,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Shorthand result type for geometry operations.
pub type GeoResult<T> = Result<T, GeoError>;
