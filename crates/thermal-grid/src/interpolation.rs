//! Multilinear interpolation of the temperature field.
//!
//! Each sample coordinate is located on its axis by binary search, giving a
//! lower node and a fractional weight. The 2^3 surrounding nodes are blended
//! by the product of their per-axis weights. Nodes whose weight is zero are
//! skipped, so a sample sitting exactly on a node returns that node's value
//! unchanged and a NaN neighbour cannot leak into it. A NaN node with a
//! non-zero weight makes the result NaN.
//!
//! Samples outside the grid fail with `OutOfBounds` by default; nothing is
//! ever clamped. Callers that plan samples from an already validated query
//! can ask for NaN instead (see [`OutOfRange`]).

use ctm_common::{Coordinate, CtmError, CtmResult};

use crate::grid::CanonicalGrid;

/// Coordinates to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleSet {
    /// A single (lon, lat, depth) sample.
    Point { lon: f64, lat: f64, depth: f64 },
    /// Cartesian product of the three vectors; output shape
    /// `[lons, lats, depths]`, depth fastest.
    Grid {
        lons: Vec<f64>,
        lats: Vec<f64>,
        depths: Vec<f64>,
    },
    /// Paired `(lons[i], lats[i])` horizontal positions crossed with
    /// `depths`; output shape `[positions, depths]`, depth fastest.
    Track {
        lons: Vec<f64>,
        lats: Vec<f64>,
        depths: Vec<f64>,
    },
}

impl SampleSet {
    /// Number of values an evaluation produces.
    pub fn len(&self) -> usize {
        match self {
            SampleSet::Point { .. } => 1,
            SampleSet::Grid { lons, lats, depths } => lons.len() * lats.len() * depths.len(),
            SampleSet::Track { lons, depths, .. } => lons.len() * depths.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interpolated values and the shape they are laid out in.
#[derive(Debug, Clone, PartialEq)]
pub struct Samples {
    pub values: Vec<f64>,
    pub shape: Vec<usize>,
}

/// Handling of samples outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutOfRange {
    /// Fail with `OutOfBounds`.
    #[default]
    Fail,
    /// Evaluate to NaN.
    Nan,
}

#[derive(Debug, Clone, Copy)]
struct AxisWeight {
    lower: usize,
    frac: f64,
}

/// Evaluates a canonical grid at arbitrary coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Interpolator<'a> {
    grid: &'a CanonicalGrid,
    out_of_range: OutOfRange,
}

impl<'a> Interpolator<'a> {
    pub fn new(grid: &'a CanonicalGrid) -> Self {
        Self {
            grid,
            out_of_range: OutOfRange::Fail,
        }
    }

    /// Set how samples outside the grid are handled.
    pub fn with_out_of_range(mut self, out_of_range: OutOfRange) -> Self {
        self.out_of_range = out_of_range;
        self
    }

    /// Temperature at one point.
    pub fn point(&self, lon: f64, lat: f64, depth: f64) -> CtmResult<f64> {
        let w = [
            self.weight(Coordinate::Longitude, lon)?,
            self.weight(Coordinate::Latitude, lat)?,
            self.weight(Coordinate::Depth, depth)?,
        ];
        Ok(self.blend(w[0], w[1], w[2]))
    }

    /// Evaluate a sample set.
    pub fn evaluate(&self, samples: &SampleSet) -> CtmResult<Samples> {
        match samples {
            SampleSet::Point { lon, lat, depth } => Ok(Samples {
                values: vec![self.point(*lon, *lat, *depth)?],
                shape: Vec::new(),
            }),
            SampleSet::Grid { lons, lats, depths } => {
                let wx = self.weights(Coordinate::Longitude, lons)?;
                let wy = self.weights(Coordinate::Latitude, lats)?;
                let wz = self.weights(Coordinate::Depth, depths)?;

                let mut values = Vec::with_capacity(samples.len());
                for &x in &wx {
                    for &y in &wy {
                        for &z in &wz {
                            values.push(self.blend(x, y, z));
                        }
                    }
                }
                Ok(Samples {
                    values,
                    shape: vec![lons.len(), lats.len(), depths.len()],
                })
            }
            SampleSet::Track { lons, lats, depths } => {
                if lons.len() != lats.len() {
                    return Err(CtmError::invalid_query(format!(
                        "track has {} longitudes but {} latitudes",
                        lons.len(),
                        lats.len()
                    )));
                }
                let wx = self.weights(Coordinate::Longitude, lons)?;
                let wy = self.weights(Coordinate::Latitude, lats)?;
                let wz = self.weights(Coordinate::Depth, depths)?;

                let mut values = Vec::with_capacity(samples.len());
                for (&x, &y) in wx.iter().zip(&wy) {
                    for &z in &wz {
                        values.push(self.blend(x, y, z));
                    }
                }
                Ok(Samples {
                    values,
                    shape: vec![lons.len(), depths.len()],
                })
            }
        }
    }

    fn weight(&self, coordinate: Coordinate, value: f64) -> CtmResult<Option<AxisWeight>> {
        let axis = self.grid.axis(coordinate);
        match axis.locate(value) {
            Some((lower, frac)) => Ok(Some(AxisWeight { lower, frac })),
            None => match self.out_of_range {
                OutOfRange::Fail => Err(CtmError::out_of_bounds(
                    coordinate.label(),
                    value,
                    axis.min(),
                    axis.max(),
                )),
                OutOfRange::Nan => Ok(None),
            },
        }
    }

    fn weights(&self, coordinate: Coordinate, values: &[f64]) -> CtmResult<Vec<Option<AxisWeight>>> {
        values.iter().map(|&v| self.weight(coordinate, v)).collect()
    }

    fn blend(&self, x: Option<AxisWeight>, y: Option<AxisWeight>, z: Option<AxisWeight>) -> f64 {
        let (Some(x), Some(y), Some(z)) = (x, y, z) else {
            return f64::NAN;
        };
        let mut sum = 0.0;
        for corner in 0..8u8 {
            let mut weight = 1.0;
            let mut index = [0usize; 3];
            let mut skip = false;
            for (axis, w) in [x, y, z].iter().enumerate() {
                let upper = (corner >> axis) & 1 == 1;
                let axis_weight = if upper { w.frac } else { 1.0 - w.frac };
                if axis_weight == 0.0 {
                    skip = true;
                    break;
                }
                weight *= axis_weight;
                index[axis] = w.lower + usize::from(upper);
            }
            if skip {
                continue;
            }
            let value = self.grid.value(index[0], index[1], index[2]);
            if value.is_nan() {
                return f64::NAN;
            }
            sum += weight * value;
        }
        sum
    }
}
