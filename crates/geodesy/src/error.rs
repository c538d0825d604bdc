//! Error types for geodesic computations.

use ctm_common::CtmError;
use thiserror::Error;

pub type GeodesyResult<T> = Result<T, GeodesyError>;

#[derive(Error, Debug, PartialEq)]
pub enum GeodesyError {
    /// Latitude outside [-90, 90] or a non-finite coordinate
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Ellipsoid parameters that describe no ellipsoid
    #[error("Invalid ellipsoid: {0}")]
    InvalidEllipsoid(String),
}

impl From<GeodesyError> for CtmError {
    fn from(err: GeodesyError) -> Self {
        CtmError::InvalidQuery(err.to_string())
    }
}
