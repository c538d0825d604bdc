//! Canonical coordinate names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CtmError;

/// One of the three canonical axes of a thermal model grid.
///
/// The discriminant order is also the storage order of a canonical grid:
/// longitude outermost, depth fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coordinate {
    Longitude,
    Latitude,
    Depth,
}

impl Coordinate {
    /// All coordinates in storage order.
    pub const ALL: [Coordinate; 3] = [Coordinate::Longitude, Coordinate::Latitude, Coordinate::Depth];

    /// Bare canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Coordinate::Longitude => "longitude",
            Coordinate::Latitude => "latitude",
            Coordinate::Depth => "depth",
        }
    }

    /// Unit annotation.
    pub fn unit(&self) -> &'static str {
        match self {
            Coordinate::Longitude | Coordinate::Latitude => "°",
            Coordinate::Depth => "m",
        }
    }

    /// Name with embedded unit, as used for output columns (e.g. `depth[m]`).
    pub fn label(&self) -> &'static str {
        match self {
            Coordinate::Longitude => "longitude[°]",
            Coordinate::Latitude => "latitude[°]",
            Coordinate::Depth => "depth[m]",
        }
    }

    /// Axis index in the canonical struct-of-arrays layout.
    pub fn index(&self) -> usize {
        match self {
            Coordinate::Longitude => 0,
            Coordinate::Latitude => 1,
            Coordinate::Depth => 2,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl AsRef<str> for Coordinate {
    fn as_ref(&self) -> &str {
        self.label()
    }
}

impl FromStr for Coordinate {
    type Err = CtmError;

    /// Accepts the bare name (`depth`) or the labeled name (`depth[m]`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Coordinate::ALL
            .into_iter()
            .find(|c| s == c.name() || s == c.label())
            .ok_or_else(|| CtmError::UnknownCoordinate(s.to_string()))
    }
}

/// Label of the temperature column.
pub const TEMPERATURE_LABEL: &str = "temperature[°C]";

/// Label of the geothermal gradient column.
pub const GRADIENT_LABEL: &str = "dTdz[°C/km]";
