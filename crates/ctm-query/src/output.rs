//! CSV and JSON writers.
//!
//! CSV output starts with the header as `# key: value` comment lines, then
//! the column names and one row per sample with six decimals (`nan` for
//! missing values). JSON output carries the same header as an ordered
//! object plus the rows, with missing values as `null`.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use ctm_common::coord::{GRADIENT_LABEL, TEMPERATURE_LABEL};
use ctm_common::{Coordinate, CtmError, CtmResult};
use serde::{Deserialize, Serialize};

use crate::report::{fixed, Header};
use crate::session::QueryOutcome;
use crate::stats::GradientRecord;
use crate::table::ResultTable;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = CtmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(CtmError::Config(format!("unknown output format '{}'", other))),
        }
    }
}

fn columns() -> [&'static str; 4] {
    [
        Coordinate::Longitude.label(),
        Coordinate::Latitude.label(),
        Coordinate::Depth.label(),
        TEMPERATURE_LABEL,
    ]
}

/// Write the header and rows as CSV.
pub fn write_csv<W: Write>(mut writer: W, header: &Header, table: &ResultTable) -> CtmResult<()> {
    for (key, value) in header.iter() {
        writeln!(writer, "# {}: {}", key, value)?;
    }
    writeln!(writer, "{}", columns().join(","))?;
    for row in table.rows() {
        writeln!(
            writer,
            "{},{},{},{}",
            fixed(row.longitude, 6),
            fixed(row.latitude, 6),
            fixed(row.depth, 6),
            fixed(row.temperature, 6)
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Write per-location gradients as CSV.
pub fn write_gradients_csv<W: Write>(mut writer: W, gradients: &[GradientRecord]) -> CtmResult<()> {
    writeln!(
        writer,
        "{},{},{}",
        Coordinate::Longitude.label(),
        Coordinate::Latitude.label(),
        GRADIENT_LABEL
    )?;
    for g in gradients {
        writeln!(
            writer,
            "{},{},{}",
            fixed(g.longitude, 6),
            fixed(g.latitude, 6),
            fixed(g.dtdz_c_per_km, 6)
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[derive(Serialize)]
struct JsonGradient {
    longitude: f64,
    latitude: f64,
    #[serde(rename = "dTdz[°C/km]")]
    dtdz: Option<f64>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated: String,
    header: &'a Header,
    columns: [&'static str; 4],
    rows: Vec<[Option<f64>; 4]>,
    gradients: Vec<JsonGradient>,
}

/// Write the header, rows and gradients as pretty-printed JSON.
pub fn write_json<W: Write>(
    mut writer: W,
    header: &Header,
    table: &ResultTable,
    gradients: &[GradientRecord],
) -> CtmResult<()> {
    let report = JsonReport {
        generated: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        header,
        columns: columns(),
        rows: table
            .rows()
            .iter()
            .map(|r| [finite(r.longitude), finite(r.latitude), finite(r.depth), finite(r.temperature)])
            .collect(),
        gradients: gradients
            .iter()
            .map(|g| JsonGradient {
                longitude: g.longitude,
                latitude: g.latitude,
                dtdz: finite(g.dtdz_c_per_km),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut writer, &report).map_err(|e| CtmError::Io(e.into()))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a finished query in the requested format.
pub fn write_outcome<W: Write>(writer: W, format: OutputFormat, outcome: &QueryOutcome) -> CtmResult<()> {
    match format {
        OutputFormat::Csv => write_csv(writer, &outcome.header, &outcome.table),
        OutputFormat::Json => write_json(writer, &outcome.header, &outcome.table, &outcome.gradients),
    }
}
