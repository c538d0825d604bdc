//! Common test fixtures for CTM tests.

use std::io::Write;

use tempfile::NamedTempFile;

/// CDL of a tiny Lee-style model (depth in km, `temperature_diffused`).
///
/// Temperature is `10 + 2·(lon + 120) + 3·(lat − 34) + 25·depth_km`, so every
/// multilinear interpolation on it is exact.
pub const LEE_STYLE_CDL: &str = r#"netcdf Lee_2025_subset {
dimensions:
	longitude = 3 ;
	latitude = 2 ;
	depth = 3 ;
variables:
	double longitude(longitude) ;
		longitude:units = "degrees_east" ;
	double latitude(latitude) ;
		latitude:units = "degrees_north" ;
	double depth(depth) ;
		depth:units = "km" ;
	float temperature_diffused(longitude, latitude, depth) ;
		temperature_diffused:units = "degC" ;
		temperature_diffused:_FillValue = -9999.f ;

// global attributes:
		:title = "Community Thermal Model subset" ;
		:source = "https://www.scec.org/research/ctm" ;
data:

 longitude = -120, -119, -118 ;

 latitude = 34, 35 ;

 depth = 0, 10, 20 ;

 temperature_diffused =
  10, 260, 510,
  13, 263, 513,
  12, 262, 512,
  15, 265, 515,
  14, 264, 514,
  17, 267, 517 ;
}
"#;

/// Expected temperature of [`LEE_STYLE_CDL`] at a point (depth in metres).
pub fn lee_style_cdl_temperature(lon: f64, lat: f64, depth_m: f64) -> f64 {
    10.0 + 2.0 * (lon + 120.0) + 3.0 * (lat - 34.0) + 0.025 * depth_m
}

/// Write `contents` to a temporary file with the given suffix (e.g. `.cdl`).
pub fn write_temp_file(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}
