//! Query results as rows.

use ctm_common::{CtmError, CtmResult};
use serde::Serialize;
use thermal_grid::SampleSet;

use crate::query::QueryKind;

/// One sample: coordinates, temperature and the horizontal location it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResultRow {
    /// Index of the horizontal position that produced this row (track index
    /// for cross-sections, lon x lat cell for slices, 0 otherwise)
    pub location: usize,
    pub longitude: f64,
    pub latitude: f64,
    pub depth: f64,
    pub temperature: f64,
}

/// Rows of a query result in sampling order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    kind: QueryKind,
    rows: Vec<ResultRow>,
    locations: usize,
    depths: usize,
}

impl ResultTable {
    /// Zip the sample coordinates with their interpolated values.
    ///
    /// Rows follow the layout produced by the interpolator: for grid sample
    /// sets longitude is outermost and depth fastest; for tracks the
    /// position index is outermost. Fails with `InvalidQuery` when the number
    /// of values does not match the sample set.
    pub fn assemble(kind: QueryKind, samples: &SampleSet, values: &[f64]) -> CtmResult<Self> {
        if values.len() != samples.len() {
            return Err(CtmError::invalid_query(format!(
                "{} values for {} samples",
                values.len(),
                samples.len()
            )));
        }

        let mut rows = Vec::with_capacity(values.len());
        let (locations, depths) = match samples {
            SampleSet::Point { lon, lat, depth } => {
                rows.push(ResultRow {
                    location: 0,
                    longitude: *lon,
                    latitude: *lat,
                    depth: *depth,
                    temperature: values[0],
                });
                (1, 1)
            }
            SampleSet::Grid { lons, lats, depths } => {
                let mut value = values.iter();
                for (i, &lon) in lons.iter().enumerate() {
                    for (j, &lat) in lats.iter().enumerate() {
                        for &depth in depths {
                            rows.push(ResultRow {
                                location: i * lats.len() + j,
                                longitude: lon,
                                latitude: lat,
                                depth,
                                temperature: value.next().copied().unwrap_or(f64::NAN),
                            });
                        }
                    }
                }
                (lons.len() * lats.len(), depths.len())
            }
            SampleSet::Track { lons, lats, depths } => {
                if lons.len() != lats.len() {
                    return Err(CtmError::invalid_query(format!(
                        "track has {} longitudes but {} latitudes",
                        lons.len(),
                        lats.len()
                    )));
                }
                let mut value = values.iter();
                for (p, (&lon, &lat)) in lons.iter().zip(lats).enumerate() {
                    for &depth in depths {
                        rows.push(ResultRow {
                            location: p,
                            longitude: lon,
                            latitude: lat,
                            depth,
                            temperature: value.next().copied().unwrap_or(f64::NAN),
                        });
                    }
                }
                (lons.len(), depths.len())
            }
        };

        Ok(Self {
            kind,
            rows,
            locations,
            depths,
        })
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct horizontal locations.
    pub fn location_count(&self) -> usize {
        self.locations
    }

    /// Number of depths sampled at each location.
    pub fn depth_count(&self) -> usize {
        self.depths
    }

    pub fn temperatures(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_table() {
        let samples = SampleSet::Point {
            lon: -117.0,
            lat: 34.0,
            depth: 500.0,
        };
        let table = ResultTable::assemble(QueryKind::Point, &samples, &[42.0]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].temperature, 42.0);
        assert_eq!(table.location_count(), 1);
    }

    #[test]
    fn test_grid_locations() {
        let samples = SampleSet::Grid {
            lons: vec![0.0, 1.0],
            lats: vec![5.0, 6.0, 7.0],
            depths: vec![100.0],
        };
        let values: Vec<f64> = (0..6).map(|v| v as f64).collect();
        let table = ResultTable::assemble(QueryKind::HorizontalSlice, &samples, &values).unwrap();
        let row = table.rows()[4];
        assert_eq!((row.location, row.longitude, row.latitude, row.temperature), (4, 1.0, 6.0, 4.0));
        assert_eq!(table.location_count(), 6);
        assert_eq!(table.depth_count(), 1);
    }

    #[test]
    fn test_track_locations() {
        let samples = SampleSet::Track {
            lons: vec![0.0, 0.5],
            lats: vec![1.0, 1.5],
            depths: vec![0.0, 10.0, 20.0],
        };
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let table = ResultTable::assemble(QueryKind::VerticalCrossSection, &samples, &values).unwrap();
        let locations: Vec<usize> = table.rows().iter().map(|r| r.location).collect();
        assert_eq!(locations, vec![0, 0, 0, 1, 1, 1]);
        assert_eq!(table.rows()[3].latitude, 1.5);
        assert_eq!(table.rows()[5].depth, 20.0);
    }

    #[test]
    fn test_length_mismatch() {
        let samples = SampleSet::Grid {
            lons: vec![0.0],
            lats: vec![0.0],
            depths: vec![0.0, 1.0],
        };
        let err = ResultTable::assemble(QueryKind::VerticalProfile, &samples, &[1.0]).unwrap_err();
        assert!(matches!(err, CtmError::InvalidQuery(_)));
    }
}
