//! Temperature statistics and geothermal gradients.

use ctm_common::{CtmError, CtmResult};
use serde::Serialize;
use tracing::warn;

use crate::table::{ResultRow, ResultTable};

/// Summary of the temperature column, NaN excluded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Finite values summarized
    pub count: usize,
    /// NaN values skipped
    pub nan_count: usize,
}

/// Min, max and mean temperature. All three are NaN when no value is finite.
pub fn summarize(table: &ResultTable) -> TemperatureStats {
    let mut stats = TemperatureStats {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
        mean: f64::NAN,
        count: 0,
        nan_count: 0,
    };
    let mut sum = 0.0;
    for t in table.temperatures() {
        if t.is_nan() {
            stats.nan_count += 1;
            continue;
        }
        stats.min = stats.min.min(t);
        stats.max = stats.max.max(t);
        sum += t;
        stats.count += 1;
    }
    if stats.count == 0 {
        stats.min = f64::NAN;
        stats.max = f64::NAN;
    } else {
        stats.mean = sum / stats.count as f64;
    }
    stats
}

/// Geothermal gradient at one horizontal location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientRecord {
    pub location: usize,
    pub longitude: f64,
    pub latitude: f64,
    /// °C per km; NaN when the location has no vertical extent
    pub dtdz_c_per_km: f64,
}

/// Slope between the shallowest and deepest sample, in °C/km.
pub fn two_point_gradient(z_first: f64, t_first: f64, z_last: f64, t_last: f64) -> CtmResult<f64> {
    if z_last == z_first {
        return Err(CtmError::DegenerateGroup {
            location: 0,
            depth: z_first,
        });
    }
    Ok((t_last - t_first) / ((z_last - z_first) / 1000.0))
}

/// One gradient per location, in location order.
///
/// Rows are grouped by their location index and sorted by depth; the
/// gradient is the two-point slope between the shallowest and deepest row.
/// A location sampled at a single depth gets a NaN gradient.
pub fn gradient(table: &ResultTable) -> Vec<GradientRecord> {
    let mut groups: Vec<Vec<&ResultRow>> = vec![Vec::new(); table.location_count()];
    for row in table.rows() {
        if row.location >= groups.len() {
            groups.resize(row.location + 1, Vec::new());
        }
        groups[row.location].push(row);
    }

    let mut degenerate = 0usize;
    let mut first_degenerate = None;
    let records = groups
        .into_iter()
        .filter(|group| !group.is_empty())
        .map(|mut group| {
            group.sort_by(|a, b| a.depth.total_cmp(&b.depth));
            let (first, last) = (group[0], group[group.len() - 1]);
            let dtdz = match two_point_gradient(first.depth, first.temperature, last.depth, last.temperature) {
                Ok(value) => value,
                Err(_) => {
                    degenerate += 1;
                    first_degenerate.get_or_insert(first.location);
                    f64::NAN
                }
            };
            GradientRecord {
                location: first.location,
                longitude: first.longitude,
                latitude: first.latitude,
                dtdz_c_per_km: dtdz,
            }
        })
        .collect();

    if let Some(location) = first_degenerate {
        warn!(
            locations = degenerate,
            first_location = location,
            "Zero vertical extent, gradient reported as NaN"
        );
    }
    records
}

/// Average gradient of a vertical profile, in °C/km.
///
/// The temperature range (NaN skipped) over the full planned depth span, so
/// an inversion still counts and a NaN tail below the grid does not blank
/// the result. NaN when the span is zero or no temperature is finite.
pub fn profile_gradient(table: &ResultTable) -> f64 {
    let stats = summarize(table);
    let (shallowest, deepest) = table
        .rows()
        .iter()
        .map(|r| r.depth)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), z| (lo.min(z), hi.max(z)));
    let span_km = (deepest - shallowest) / 1000.0;
    if stats.count == 0 || span_km.is_nan() || span_km <= 0.0 {
        return f64::NAN;
    }
    (stats.max - stats.min) / span_km
}

/// Largest gradient, ignoring NaN. NaN when there is none.
pub fn max_gradient(records: &[GradientRecord]) -> f64 {
    records
        .iter()
        .map(|r| r.dtdz_c_per_km)
        .filter(|g| !g.is_nan())
        .fold(f64::NAN, f64::max)
}
