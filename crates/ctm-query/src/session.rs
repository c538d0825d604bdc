//! Query pipeline over one normalized grid.

use std::sync::Arc;

use ctm_common::{CtmError, CtmResult};
use thermal_grid::{check_in_bounds_all, CanonicalGrid, Interpolator, ModelDescriptor, OutOfRange, SampleSet};
use tracing::{debug, info, warn};

use crate::config::QueryConfig;
use crate::query::{arange_inclusive, arange_len, linspace, slice_point_counts, QueryKind, QuerySpec};
use crate::report::{build_header, Header};
use crate::stats::{gradient, summarize, GradientRecord, TemperatureStats};
use crate::table::ResultTable;

/// Everything a query produces.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub spec: QuerySpec,
    pub table: ResultTable,
    pub stats: TemperatureStats,
    /// Per-location gradients (profiles and cross-sections only)
    pub gradients: Vec<GradientRecord>,
    pub header: Header,
}

/// Runs queries against a normalized model grid.
///
/// The grid is shared read-only, so one session can answer any number of
/// queries (batch mode) without reloading the model.
#[derive(Debug, Clone)]
pub struct QuerySession {
    grid: Arc<CanonicalGrid>,
    descriptor: ModelDescriptor,
    config: QueryConfig,
}

impl QuerySession {
    pub fn new(grid: Arc<CanonicalGrid>, descriptor: ModelDescriptor, config: QueryConfig) -> CtmResult<Self> {
        config.validate()?;
        Ok(Self {
            grid,
            descriptor,
            config,
        })
    }

    pub fn grid(&self) -> &CanonicalGrid {
        &self.grid
    }

    pub fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Sample coordinates for a query, without checking them against the grid.
    ///
    /// The sample count is worked out from the query and the config before
    /// any coordinate is generated; a plan above `max_samples` fails with
    /// `InvalidQuery`.
    pub fn plan(&self, spec: &QuerySpec) -> CtmResult<SampleSet> {
        let samples = match *spec {
            QuerySpec::Point { lon, lat, depth } => SampleSet::Point { lon, lat, depth },
            QuerySpec::VerticalProfile {
                lon,
                lat,
                depth_start,
                depth_end,
                depth_step,
            } => {
                self.check_sample_count(spec.kind(), arange_len(depth_start, depth_end, depth_step)?)?;
                SampleSet::Grid {
                    lons: vec![lon],
                    lats: vec![lat],
                    depths: arange_inclusive(depth_start, depth_end, depth_step)?,
                }
            }
            QuerySpec::VerticalCrossSection {
                lon_start,
                lat_start,
                lon_end,
                lat_end,
                depth_start,
                depth_end,
            } => {
                self.check_sample_count(
                    spec.kind(),
                    self.config.track_points.saturating_mul(self.config.depth_points),
                )?;
                let (lons, lats) = geodesy::track(lon_start, lat_start, lon_end, lat_end, self.config.track_points)?;
                SampleSet::Track {
                    lons,
                    lats,
                    depths: linspace(depth_start, depth_end, self.config.depth_points),
                }
            }
            QuerySpec::HorizontalSlice {
                lon_start,
                lat_start,
                lon_end,
                lat_end,
                depth,
            } => {
                let (nlon, nlat) = slice_point_counts(
                    lon_end - lon_start,
                    lat_end - lat_start,
                    self.config.slice_target_points,
                );
                self.check_sample_count(spec.kind(), nlon.saturating_mul(nlat))?;
                SampleSet::Grid {
                    lons: linspace(lon_start, lon_end, nlon),
                    lats: linspace(lat_start, lat_end, nlat),
                    depths: vec![depth],
                }
            }
        };
        debug!(kind = %spec.kind(), samples = samples.len(), "Planned samples");
        Ok(samples)
    }

    fn check_sample_count(&self, kind: QueryKind, count: usize) -> CtmResult<()> {
        if count > self.config.max_samples {
            return Err(CtmError::invalid_query(format!(
                "{} would need {} samples, more than the limit of {}",
                kind, count, self.config.max_samples
            )));
        }
        Ok(())
    }

    /// Validate, sample, interpolate and summarize one query.
    ///
    /// The query's own coordinates must lie inside the grid (`OutOfBounds`
    /// otherwise). Planned samples that still leave the domain, such as a
    /// geodesic bulging past the grid edge between two valid endpoints,
    /// evaluate to NaN.
    pub fn run(&self, spec: &QuerySpec) -> CtmResult<QueryOutcome> {
        spec.validate()?;
        check_in_bounds_all(&self.grid, spec.bounds_checks())?;

        let samples = self.plan(spec)?;
        let values = Interpolator::new(&self.grid)
            .with_out_of_range(OutOfRange::Nan)
            .evaluate(&samples)?
            .values;

        let table = ResultTable::assemble(spec.kind(), &samples, &values)?;
        let stats = summarize(&table);
        if stats.nan_count > 0 {
            warn!(
                kind = %spec.kind(),
                missing = stats.nan_count,
                total = table.len(),
                "Some samples have no temperature"
            );
        }

        let gradients = match spec.kind() {
            QueryKind::VerticalProfile | QueryKind::VerticalCrossSection => gradient(&table),
            QueryKind::Point | QueryKind::HorizontalSlice => Vec::new(),
        };
        let header = build_header(spec, &self.descriptor, &table, &stats, &gradients);

        info!(
            model = %self.descriptor.name,
            kind = %spec.kind(),
            rows = table.len(),
            t_min = stats.min,
            t_max = stats.max,
            "Query complete"
        );

        Ok(QueryOutcome {
            spec: spec.clone(),
            table,
            stats,
            gradients,
            header,
        })
    }
}
