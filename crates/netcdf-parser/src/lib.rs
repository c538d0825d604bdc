//! Readers for thermal model grid files.
//!
//! Every reader produces a [`ctm_common::RawGrid`]: the file's own dimension
//! and variable names, unpacked to `f64` with fill values turned into NaN.
//! Mapping onto the canonical schema happens later, in `thermal-grid`.
//!
//! # Backends
//!
//! - `.nc`, `.nc4`, `.h5`: the native netcdf library when built with the
//!   `native` feature, otherwise the `ncdump` command-line tool.
//! - `.cdl`: CDL text (the output of `ncdump`), parsed directly.
//! - `.json`: a serialized `RawGrid`, handy for small test models.

pub mod cdl;
pub mod error;
pub mod ncdump;
#[cfg(feature = "native")]
pub mod native;

use std::path::Path;

use ctm_common::RawGrid;
use tracing::info;

pub use cdl::parse_cdl;
pub use error::{NetCdfError, NetCdfResult};

/// File formats understood by [`load_raw_grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridFormat {
    NetCdf,
    Cdl,
    Json,
}

impl GridFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> NetCdfResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "nc" | "nc4" | "netcdf" | "h5" => Ok(GridFormat::NetCdf),
            "cdl" => Ok(GridFormat::Cdl),
            "json" => Ok(GridFormat::Json),
            _ => Err(NetCdfError::Unsupported(path.display().to_string())),
        }
    }
}

/// Load a grid file, optionally restricted to the named variables.
///
/// Restricting is only an optimization for the netCDF backends; CDL and JSON
/// files are always read whole.
pub fn load_raw_grid<P: AsRef<Path>>(path: P, variables: Option<&[&str]>) -> NetCdfResult<RawGrid> {
    let path = path.as_ref();
    let format = GridFormat::from_path(path)?;

    let grid = match format {
        GridFormat::NetCdf => read_netcdf(path, variables)?,
        GridFormat::Cdl => parse_cdl(&std::fs::read_to_string(path)?)?,
        GridFormat::Json => {
            let text = std::fs::read_to_string(path)?;
            RawGrid::from_json(&text).map_err(|e| NetCdfError::InvalidFormat(e.to_string()))?
        }
    };

    info!(
        file = %path.display(),
        format = ?format,
        dimensions = ?grid.dimensions.iter().map(|d| (d.name.as_str(), d.len)).collect::<Vec<_>>(),
        "Loaded model grid"
    );

    Ok(grid)
}

#[cfg(feature = "native")]
fn read_netcdf(path: &Path, variables: Option<&[&str]>) -> NetCdfResult<RawGrid> {
    native::read_native(path, variables)
}

#[cfg(not(feature = "native"))]
fn read_netcdf(path: &Path, variables: Option<&[&str]>) -> NetCdfResult<RawGrid> {
    ncdump::read_with_ncdump(path, variables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(GridFormat::from_path(Path::new("Lee_2025.nc")).unwrap(), GridFormat::NetCdf);
        assert_eq!(GridFormat::from_path(Path::new("m.CDL")).unwrap(), GridFormat::Cdl);
        assert_eq!(GridFormat::from_path(Path::new("m.json")).unwrap(), GridFormat::Json);
        assert!(matches!(
            GridFormat::from_path(Path::new("m.grib2")),
            Err(NetCdfError::Unsupported(_))
        ));
    }
}
