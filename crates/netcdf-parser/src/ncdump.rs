//! Reading netCDF files through the `ncdump` command-line tool.
//!
//! This is the default backend: it needs the netCDF utilities on `PATH` but
//! no native libraries at build time. `ncdump -p 9,17` prints enough digits
//! to round-trip single and double precision values.

use std::path::Path;
use std::process::Command;

use ctm_common::RawGrid;
use tracing::debug;

use crate::cdl::parse_cdl;
use crate::error::{NetCdfError, NetCdfResult};

/// Dump a netCDF file and parse it.
///
/// `variables` restricts the data section to the named variables (the header
/// always lists everything). `None` dumps all data.
pub fn read_with_ncdump<P: AsRef<Path>>(path: P, variables: Option<&[&str]>) -> NetCdfResult<RawGrid> {
    let path = path.as_ref();

    let mut command = Command::new("ncdump");
    command.arg("-p").arg("9,17");
    if let Some(vars) = variables {
        command.arg("-v").arg(vars.join(","));
    }
    command.arg(path);

    debug!(file = %path.display(), variables = ?variables, "Running ncdump");

    let output = command
        .output()
        .map_err(|e| NetCdfError::CommandError(format!("Failed to run ncdump: {}", e)))?;

    if !output.status.success() {
        return Err(NetCdfError::CommandError(format!(
            "ncdump failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    parse_cdl(&String::from_utf8_lossy(&output.stdout))
}
