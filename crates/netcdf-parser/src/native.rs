//! Native NetCDF parsing using the netcdf library.
//!
//! Enabled with the `native` feature. Reads the file in-process through
//! libnetcdf/HDF5, which is much faster than the ncdump subprocess for the
//! larger thermal models.

use std::path::Path;
use std::sync::Once;

use ctm_common::{RawDimension, RawGrid, RawVariable};
use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints diagnostics even for errors the Rust side
/// handles (e.g. probing optional attributes). Only needs to run once per
/// process; call it before any other netCDF operation.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and null handlers are a
        // documented way to disable the automatic error stack printing.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Read a netCDF file with the native library.
///
/// `variables` restricts which variables are loaded; `None` loads every
/// numeric variable.
pub fn read_native<P: AsRef<Path>>(path: P, variables: Option<&[&str]>) -> NetCdfResult<RawGrid> {
    silence_hdf5_errors();

    let path = path.as_ref();
    let nc_file = netcdf::open(path)
        .map_err(|e| NetCdfError::InvalidFormat(format!("Failed to open NetCDF: {}", e)))?;

    let dimensions = nc_file
        .dimensions()
        .map(|d| RawDimension {
            name: d.name(),
            len: d.len(),
        })
        .collect();

    let mut grid = RawGrid {
        dimensions,
        variables: Vec::new(),
    };

    for var in nc_file.variables() {
        let name = var.name();
        if let Some(wanted) = variables {
            if !wanted.contains(&name.as_str()) {
                continue;
            }
        }

        let raw: Vec<f64> = match var.get_values::<f64, _>(..) {
            Ok(values) => values,
            Err(e) => {
                debug!(variable = %name, error = %e, "Skipping non-numeric variable");
                continue;
            }
        };

        let scale_factor = get_f64_attr(&var, "scale_factor").unwrap_or(1.0);
        let add_offset = get_f64_attr(&var, "add_offset").unwrap_or(0.0);
        let fill_value = get_f64_attr(&var, "_FillValue");
        let missing_value = get_f64_attr(&var, "missing_value");

        let values = raw
            .into_iter()
            .map(|val| {
                if val.is_nan() || Some(val) == fill_value || Some(val) == missing_value {
                    f64::NAN
                } else {
                    val * scale_factor + add_offset
                }
            })
            .collect();

        grid.variables.push(RawVariable {
            name,
            dimensions: var.dimensions().iter().map(|d| d.name()).collect(),
            values,
        });
    }

    if let Some(wanted) = variables {
        for name in wanted {
            if grid.variable(name).is_none() {
                return Err(NetCdfError::MissingData(format!("{} variable", name)));
            }
        }
    }

    grid.validate()
        .map_err(|e| NetCdfError::InvalidFormat(e.to_string()))?;

    debug!(
        file = %path.display(),
        variables = grid.variables.len(),
        "Loaded netCDF file natively"
    );

    Ok(grid)
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get f64 attribute.
fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}
