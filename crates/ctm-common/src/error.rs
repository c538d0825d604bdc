//! Error types for CTM query operations.

use thiserror::Error;

/// Result type alias using CtmError.
pub type CtmResult<T> = Result<T, CtmError>;

/// Primary error type for grid normalization, validation and queries.
#[derive(Debug, Error)]
pub enum CtmError {
    // === Model / schema errors ===
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Grid does not match the expected schema: {0}")]
    SchemaMismatch(String),

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    // === Query errors ===
    #[error("Error {coordinate}={value} is out of model domain [{min}, {max}]")]
    OutOfBounds {
        coordinate: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{0} not in model coordinates")]
    UnknownCoordinate(String),

    #[error("Zero vertical extent at location {location} (depth {depth} m)")]
    DegenerateGroup { location: usize, depth: f64 },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    // === Infrastructure errors ===
    #[error("Failed to read grid: {0}")]
    GridRead(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CtmError {
    /// Create a SchemaMismatch error.
    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch(msg.into())
    }

    /// Create an InvalidGrid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }

    /// Create an InvalidQuery error.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Create an OutOfBounds error.
    pub fn out_of_bounds(coordinate: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfBounds {
            coordinate: coordinate.into(),
            value,
            min,
            max,
        }
    }
}

impl From<serde_json::Error> for CtmError {
    fn from(err: serde_json::Error) -> Self {
        CtmError::GridRead(format!("JSON error: {}", err))
    }
}
