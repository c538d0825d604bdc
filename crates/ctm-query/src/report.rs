//! Metadata header written in front of query results.

use serde::ser::{Serialize, SerializeMap, Serializer};
use thermal_grid::ModelDescriptor;

use crate::query::QuerySpec;
use crate::stats::{max_gradient, profile_gradient, GradientRecord, TemperatureStats};
use crate::table::ResultTable;

/// Ordered `key: value` fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    fields: Vec<(String, String)>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Header {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Fixed-point formatting; non-finite values print as `nan`, `inf`, `-inf`.
pub(crate) fn fixed(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:.*}", decimals, value)
    }
}

/// Distinct depths of a table in ascending order.
fn sorted_depths(table: &ResultTable) -> Vec<f64> {
    let mut depths: Vec<f64> = table.rows().iter().map(|r| r.depth).collect();
    depths.sort_by(|a, b| a.total_cmp(b));
    depths.dedup();
    depths
}

fn push_stats(header: &mut Header, stats: &TemperatureStats) {
    header.push("T Min", fixed(stats.min, 6));
    header.push("T Max", fixed(stats.max, 6));
    header.push("T Mean", fixed(stats.mean, 6));
}

/// Header fields for a finished query.
///
/// Depths and spacings use three decimals, coordinates and statistics six.
pub fn build_header(
    spec: &QuerySpec,
    descriptor: &ModelDescriptor,
    table: &ResultTable,
    stats: &TemperatureStats,
    gradients: &[GradientRecord],
) -> Header {
    let mut header = Header::new();
    let rows = table.rows();

    match *spec {
        QuerySpec::Point { lon, lat, depth } => {
            header.push("Title", "CTM 0D Point");
            header.push("CTM(abbr)", descriptor.abbreviation.as_str());
            header.push("Lat", fixed(lat, 6));
            header.push("Lon", fixed(lon, 6));
            header.push("Depth(m)", fixed(depth, 3));
            let temperature = rows.first().map(|r| r.temperature).unwrap_or(f64::NAN);
            header.push("Temperature(°C)", fixed(temperature, 6));
        }
        QuerySpec::VerticalProfile { lon, lat, depth_step, .. } => {
            let depths = sorted_depths(table);
            let gradient = profile_gradient(table);
            header.push("Title", "CTM 1D Profile");
            header.push("CTM(abbr)", descriptor.abbreviation.as_str());
            header.push("Lat", fixed(lat, 6));
            header.push("Lon", fixed(lon, 6));
            header.push("Start_depth(m)", fixed(depths.first().copied().unwrap_or(f64::NAN), 3));
            header.push("End_depth(m)", fixed(depths.last().copied().unwrap_or(f64::NAN), 3));
            header.push("Vert_spacing(m)", fixed(depth_step, 3));
            header.push("Average dT/dz(°C/km)", fixed(gradient, 3));
        }
        QuerySpec::HorizontalSlice { depth, .. } => {
            let mut lons: Vec<f64> = rows.iter().map(|r| r.longitude).collect();
            let mut lats: Vec<f64> = rows.iter().map(|r| r.latitude).collect();
            lons.sort_by(|a, b| a.total_cmp(b));
            lons.dedup();
            lats.sort_by(|a, b| a.total_cmp(b));
            lats.dedup();

            header.push("Title", format!("CTM Horizontal Slice at {} m depth", fixed(depth, 3)));
            header.push("CTM(abbr)", descriptor.abbreviation.as_str());
            header.push("Data_type", "T[°C]");
            header.push("Depth(m)", fixed(depth, 3));
            header.push("Lon_pts", lons.len().to_string());
            header.push("Lat_pts", lats.len().to_string());
            header.push("Total_pts", (lons.len() * lats.len()).to_string());
            push_stats(&mut header, stats);
            header.push("Lat1", fixed(lats.first().copied().unwrap_or(f64::NAN), 6));
            header.push("Lat2", fixed(lats.last().copied().unwrap_or(f64::NAN), 6));
            header.push("Lon1", fixed(lons.first().copied().unwrap_or(f64::NAN), 6));
            header.push("Lon2", fixed(lons.last().copied().unwrap_or(f64::NAN), 6));
        }
        QuerySpec::VerticalCrossSection { .. } => {
            let depths = sorted_depths(table);
            let spacing = if depths.len() > 1 { depths[1] - depths[0] } else { 0.0 };
            let (first, last) = match (rows.first(), rows.last()) {
                (Some(first), Some(last)) => ((first.longitude, first.latitude), (last.longitude, last.latitude)),
                _ => ((f64::NAN, f64::NAN), (f64::NAN, f64::NAN)),
            };
            let horizontal = table.location_count();

            header.push(
                "Title",
                format!(
                    "CTM Cross Section from ({}, {}) to ({}, {})",
                    fixed(first.0, 3),
                    fixed(first.1, 3),
                    fixed(last.0, 3),
                    fixed(last.1, 3)
                ),
            );
            header.push("CTM(abbr)", descriptor.abbreviation.as_str());
            header.push("Data_type", "T[°C]");
            header.push("Start_depth(m)", fixed(depths.first().copied().unwrap_or(f64::NAN), 3));
            header.push("End_depth(m)", fixed(depths.last().copied().unwrap_or(f64::NAN), 3));
            header.push("Vert_spacing(m)", fixed(spacing, 3));
            header.push("Depth_pts", depths.len().to_string());
            header.push("Horizontal_pts", horizontal.to_string());
            header.push("Total_pts", (horizontal * depths.len()).to_string());
            push_stats(&mut header, stats);
            header.push("Average dT/dz Max (°C/km)", fixed(max_gradient(gradients), 6));
            header.push("Num_x", horizontal.to_string());
            header.push("Num_y", depths.len().to_string());
            header.push("Lat1", fixed(first.1, 6));
            header.push("Lat2", fixed(last.1, 6));
            header.push("Lon1", fixed(first.0, 6));
            header.push("Lon2", fixed(last.0, 6));
        }
    }

    header
}
