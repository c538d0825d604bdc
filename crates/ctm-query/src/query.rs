//! Query specifications and sample planning.

use std::fmt;

use ctm_common::{Coordinate, CtmError, CtmResult};
use serde::{Deserialize, Serialize};

/// The four query geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Point,
    VerticalProfile,
    VerticalCrossSection,
    HorizontalSlice,
}

impl QueryKind {
    /// Short name used in file names.
    pub fn name(&self) -> &'static str {
        match self {
            QueryKind::Point => "point",
            QueryKind::VerticalProfile => "profile",
            QueryKind::VerticalCrossSection => "cross_section",
            QueryKind::HorizontalSlice => "slice",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A query against a thermal model. Angles in degrees, depths in metres.
///
/// Serialized with a `type` tag, e.g. in a batch file:
///
/// ```yaml
/// - type: vertical_profile
///   lon: -117.5
///   lat: 34.0
///   depth_start: 0
///   depth_end: 50000
///   depth_step: 1000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuerySpec {
    Point {
        lon: f64,
        lat: f64,
        depth: f64,
    },
    VerticalProfile {
        lon: f64,
        lat: f64,
        depth_start: f64,
        depth_end: f64,
        depth_step: f64,
    },
    VerticalCrossSection {
        lon_start: f64,
        lat_start: f64,
        lon_end: f64,
        lat_end: f64,
        depth_start: f64,
        depth_end: f64,
    },
    HorizontalSlice {
        lon_start: f64,
        lat_start: f64,
        lon_end: f64,
        lat_end: f64,
        depth: f64,
    },
}

impl QuerySpec {
    pub fn kind(&self) -> QueryKind {
        match self {
            QuerySpec::Point { .. } => QueryKind::Point,
            QuerySpec::VerticalProfile { .. } => QueryKind::VerticalProfile,
            QuerySpec::VerticalCrossSection { .. } => QueryKind::VerticalCrossSection,
            QuerySpec::HorizontalSlice { .. } => QueryKind::HorizontalSlice,
        }
    }

    /// Coordinates to check against the grid, longitude first, then latitude, then depth.
    pub fn bounds_checks(&self) -> Vec<(Coordinate, Vec<f64>)> {
        match *self {
            QuerySpec::Point { lon, lat, depth } => vec![
                (Coordinate::Longitude, vec![lon]),
                (Coordinate::Latitude, vec![lat]),
                (Coordinate::Depth, vec![depth]),
            ],
            QuerySpec::VerticalProfile {
                lon,
                lat,
                depth_start,
                depth_end,
                ..
            } => vec![
                (Coordinate::Longitude, vec![lon]),
                (Coordinate::Latitude, vec![lat]),
                (Coordinate::Depth, vec![depth_start, depth_end]),
            ],
            QuerySpec::VerticalCrossSection {
                lon_start,
                lat_start,
                lon_end,
                lat_end,
                depth_start,
                depth_end,
            } => vec![
                (Coordinate::Longitude, vec![lon_start, lon_end]),
                (Coordinate::Latitude, vec![lat_start, lat_end]),
                (Coordinate::Depth, vec![depth_start, depth_end]),
            ],
            QuerySpec::HorizontalSlice {
                lon_start,
                lat_start,
                lon_end,
                lat_end,
                depth,
            } => vec![
                (Coordinate::Longitude, vec![lon_start, lon_end]),
                (Coordinate::Latitude, vec![lat_start, lat_end]),
                (Coordinate::Depth, vec![depth]),
            ],
        }
    }

    /// Checks that do not need the grid: finite values and a usable profile step.
    pub fn validate(&self) -> CtmResult<()> {
        for (coordinate, values) in self.bounds_checks() {
            if let Some(v) = values.iter().find(|v| !v.is_finite()) {
                return Err(CtmError::invalid_query(format!("{} must be finite, got {}", coordinate.name(), v)));
            }
        }
        if let QuerySpec::VerticalProfile {
            depth_start,
            depth_end,
            depth_step,
            ..
        } = *self
        {
            if !(depth_step > 0.0) || !depth_step.is_finite() {
                return Err(CtmError::invalid_query(format!(
                    "depth step must be positive, got {}",
                    depth_step
                )));
            }
            if depth_end < depth_start {
                return Err(CtmError::invalid_query(format!(
                    "profile end depth {} is above start depth {}",
                    depth_end, depth_start
                )));
            }
        }
        Ok(())
    }

    /// Parse a list of queries from YAML.
    pub fn list_from_yaml(text: &str) -> CtmResult<Vec<QuerySpec>> {
        serde_yaml::from_str(text).map_err(|e| CtmError::invalid_query(format!("invalid query list: {}", e)))
    }
}

/// `n` evenly spaced values from `start` to `end`, both included.
///
/// The last value is exactly `end`. `n == 1` gives `[start]`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            values[n - 1] = end;
            values
        }
    }
}

/// `start, start + step, ...` up to `end`, where `end` is included when it
/// falls within a tenth of a step of the last value.
///
/// Same as `arange(start, end + step / 10, step)`.
pub fn arange_inclusive(start: f64, end: f64, step: f64) -> CtmResult<Vec<f64>> {
    let n = arange_len(start, end, step)?;
    Ok((0..n).map(|i| start + i as f64 * step).collect())
}

/// Number of values [`arange_inclusive`] produces, without allocating them.
///
/// Saturates at `usize::MAX` for steps too small to count.
pub fn arange_len(start: f64, end: f64, step: f64) -> CtmResult<usize> {
    if !(step > 0.0) || !step.is_finite() {
        return Err(CtmError::invalid_query(format!("step must be positive, got {}", step)));
    }
    if end < start {
        return Ok(0);
    }
    Ok(((end + step / 10.0 - start) / step).ceil() as usize)
}

/// Longitude and latitude point counts of a horizontal slice.
///
/// Spacing is `sqrt(|lon_range| * |lat_range| / target)` degrees and each
/// axis gets `ceil(range / spacing) + 1` points. A zero-width range gets a
/// single point and the other axis `ceil(sqrt(target)) + 1`.
pub fn slice_point_counts(lon_range: f64, lat_range: f64, target: usize) -> (usize, usize) {
    let (lon_range, lat_range) = (lon_range.abs(), lat_range.abs());
    let line = (target as f64).sqrt().ceil() as usize + 1;
    match (lon_range == 0.0, lat_range == 0.0) {
        (true, true) => (1, 1),
        (true, false) => (1, line),
        (false, true) => (line, 1),
        (false, false) => {
            let spacing = (lon_range * lat_range / target as f64).sqrt();
            (
                (lon_range / spacing).ceil() as usize + 1,
                (lat_range / spacing).ceil() as usize + 1,
            )
        }
    }
}
