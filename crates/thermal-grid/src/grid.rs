//! Canonical grid: three ascending axes plus one dense temperature array.

use ctm_common::{Coordinate, CtmError, CtmResult};

/// A strictly ascending coordinate axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    coordinate: Coordinate,
    values: Vec<f64>,
}

impl Axis {
    /// Create an axis, rejecting empty, non-finite or non-ascending values.
    pub fn new(coordinate: Coordinate, values: Vec<f64>) -> CtmResult<Self> {
        if values.is_empty() {
            return Err(CtmError::invalid_grid(format!("{} axis is empty", coordinate.name())));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(CtmError::invalid_grid(format!(
                "{} axis contains non-finite value {}",
                coordinate.name(),
                bad
            )));
        }
        if let Some(pos) = values.windows(2).position(|w| w[1] <= w[0]) {
            return Err(CtmError::invalid_grid(format!(
                "{} axis is not strictly monotonic at index {} ({} then {})",
                coordinate.name(),
                pos,
                values[pos],
                values[pos + 1]
            )));
        }
        Ok(Self { coordinate, values })
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; axes hold at least one value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> f64 {
        self.values[0]
    }

    pub fn max(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Whether `value` lies in `[min, max]`. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min() && value <= self.max()
    }

    /// Locate `value` on the axis.
    ///
    /// Returns the index of the lower bracketing node and the fractional
    /// position towards the next node, in `[0, 1)`. A value sitting exactly
    /// on a node gives that node with fraction 0 (the last node included).
    /// `None` when the value is outside the axis.
    pub fn locate(&self, value: f64) -> Option<(usize, f64)> {
        if !self.contains(value) {
            return None;
        }
        let v = &self.values;
        let upper = v.partition_point(|&x| x <= value);
        if upper == v.len() {
            return Some((v.len() - 1, 0.0));
        }
        let lower = upper - 1;
        Some((lower, (value - v[lower]) / (v[upper] - v[lower])))
    }
}

/// Temperature field over (longitude, latitude, depth).
///
/// Temperature is stored row-major in (lon, lat, depth) order, depth
/// varying fastest. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalGrid {
    longitude: Axis,
    latitude: Axis,
    depth: Axis,
    temperature: Vec<f64>,
}

impl CanonicalGrid {
    /// Build a grid from ascending axis values (°, °, m) and temperatures (°C).
    pub fn new(
        longitude: Vec<f64>,
        latitude: Vec<f64>,
        depth: Vec<f64>,
        temperature: Vec<f64>,
    ) -> CtmResult<Self> {
        let longitude = Axis::new(Coordinate::Longitude, longitude)?;
        let latitude = Axis::new(Coordinate::Latitude, latitude)?;
        let depth = Axis::new(Coordinate::Depth, depth)?;

        let expected = longitude.len() * latitude.len() * depth.len();
        if temperature.len() != expected {
            return Err(CtmError::invalid_grid(format!(
                "temperature has {} values, expected {} ({} x {} x {})",
                temperature.len(),
                expected,
                longitude.len(),
                latitude.len(),
                depth.len()
            )));
        }

        Ok(Self {
            longitude,
            latitude,
            depth,
            temperature,
        })
    }

    /// Axis for a coordinate.
    pub fn axis(&self, coordinate: Coordinate) -> &Axis {
        match coordinate {
            Coordinate::Longitude => &self.longitude,
            Coordinate::Latitude => &self.latitude,
            Coordinate::Depth => &self.depth,
        }
    }

    /// Number of nodes along (lon, lat, depth).
    pub fn shape(&self) -> [usize; 3] {
        [self.longitude.len(), self.latitude.len(), self.depth.len()]
    }

    pub fn node_count(&self) -> usize {
        self.temperature.len()
    }

    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    /// Flat index of node (i, j, k).
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.latitude.len() + j) * self.depth.len() + k
    }

    /// Temperature at node (i, j, k).
    #[inline]
    pub fn value(&self, i: usize, j: usize, k: usize) -> f64 {
        self.temperature[self.index(i, j, k)]
    }

    /// Smallest and largest finite temperature, if any.
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        self.temperature
            .iter()
            .filter(|t| !t.is_nan())
            .fold(None, |acc, &t| match acc {
                None => Some((t, t)),
                Some((lo, hi)) => Some((lo.min(t), hi.max(t))),
            })
    }

    /// Split into axis values and temperatures.
    pub(crate) fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
        (
            self.longitude.values,
            self.latitude.values,
            self.depth.values,
            self.temperature,
        )
    }
}
