//! Synthetic thermal model generators.
//!
//! Fields are linear in every coordinate so that multilinear interpolation
//! reproduces them exactly, which makes expected values easy to compute.

use ctm_common::RawGrid;

/// Evenly spaced axis values: `start, start + step, ...` (`n` values).
pub fn axis(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Temperature linear in longitude, latitude and depth.
#[derive(Debug, Clone, Copy)]
pub struct LinearField {
    /// Temperature at lon = 0, lat = 0, depth = 0 (°C)
    pub surface: f64,
    /// °C per degree of longitude
    pub per_lon: f64,
    /// °C per degree of latitude
    pub per_lat: f64,
    /// °C per kilometre of depth
    pub per_km: f64,
}

impl LinearField {
    /// A crust-like default: 10 °C surface, 25 °C/km, gentle lateral trends.
    pub fn crust() -> Self {
        Self {
            surface: 10.0,
            per_lon: 0.5,
            per_lat: -0.25,
            per_km: 25.0,
        }
    }

    /// Temperature at a point, depth in metres.
    pub fn at(&self, lon: f64, lat: f64, depth_m: f64) -> f64 {
        self.surface + self.per_lon * lon + self.per_lat * lat + self.per_km * depth_m / 1000.0
    }
}

/// Fill values in (lon, lat, depth) order, depth fastest.
pub fn fill_values<F>(lons: &[f64], lats: &[f64], depths: &[f64], f: F) -> Vec<f64>
where
    F: Fn(f64, f64, f64) -> f64,
{
    let mut values = Vec::with_capacity(lons.len() * lats.len() * depths.len());
    for &lon in lons {
        for &lat in lats {
            for &depth in depths {
                values.push(f(lon, lat, depth));
            }
        }
    }
    values
}

/// Native names of a synthetic model file.
#[derive(Debug, Clone, Copy)]
pub struct NativeNames {
    pub longitude: &'static str,
    pub latitude: &'static str,
    pub depth: &'static str,
    pub temperature: &'static str,
}

impl NativeNames {
    /// Names used by the Lee models.
    pub const LEE: NativeNames = NativeNames {
        longitude: "longitude",
        latitude: "latitude",
        depth: "depth",
        temperature: "temperature_diffused",
    };

    /// Names used by the Shinevar models.
    pub const SHINEVAR: NativeNames = NativeNames {
        longitude: "longitude",
        latitude: "latitude",
        depth: "depth",
        temperature: "temperature",
    };
}

/// Build a raw grid with the data variable over (lon, lat, depth).
///
/// `depths` are in the file's native unit; `values` must be in
/// (lon, lat, depth) order.
pub fn create_raw_grid(
    names: NativeNames,
    lons: &[f64],
    lats: &[f64],
    depths: &[f64],
    values: Vec<f64>,
) -> RawGrid {
    RawGrid::new()
        .with_dimension(names.longitude, lons.len())
        .with_dimension(names.latitude, lats.len())
        .with_dimension(names.depth, depths.len())
        .with_coordinate(names.longitude, lons.to_vec())
        .with_coordinate(names.latitude, lats.to_vec())
        .with_coordinate(names.depth, depths.to_vec())
        .with_variable(
            names.temperature,
            &[names.longitude, names.latitude, names.depth],
            values,
        )
}

/// Same as [`create_raw_grid`] but stores the data variable as
/// (depth, lat, lon), the layout many netCDF writers use.
pub fn create_raw_grid_depth_major(
    names: NativeNames,
    lons: &[f64],
    lats: &[f64],
    depths: &[f64],
    values: &[f64],
) -> RawGrid {
    let (nlat, ndep) = (lats.len(), depths.len());
    let mut transposed = Vec::with_capacity(values.len());
    for k in 0..ndep {
        for j in 0..nlat {
            for i in 0..lons.len() {
                transposed.push(values[(i * nlat + j) * ndep + k]);
            }
        }
    }

    RawGrid::new()
        .with_dimension(names.depth, ndep)
        .with_dimension(names.latitude, nlat)
        .with_dimension(names.longitude, lons.len())
        .with_coordinate(names.depth, depths.to_vec())
        .with_coordinate(names.latitude, lats.to_vec())
        .with_coordinate(names.longitude, lons.to_vec())
        .with_variable(
            names.temperature,
            &[names.depth, names.latitude, names.longitude],
            transposed,
        )
}

/// A small Lee-style model: depth in km, linear crust field.
///
/// 5 longitudes (-121..=-117), 4 latitudes (33..=36), depths 0..=50 km
/// every 10 km.
pub fn create_lee_style_grid() -> RawGrid {
    let lons = axis(-121.0, 1.0, 5);
    let lats = axis(33.0, 1.0, 4);
    let depths_km = axis(0.0, 10.0, 6);
    let field = LinearField::crust();
    let values = fill_values(&lons, &lats, &depths_km, |lon, lat, z_km| {
        field.at(lon, lat, z_km * 1000.0)
    });
    create_raw_grid(NativeNames::LEE, &lons, &lats, &depths_km, values)
}

/// A small Shinevar-style model: depth already in metres.
pub fn create_shinevar_style_grid() -> RawGrid {
    let lons = axis(-121.0, 1.0, 5);
    let lats = axis(33.0, 1.0, 4);
    let depths = axis(0.0, 10_000.0, 6);
    let field = LinearField::crust();
    let values = fill_values(&lons, &lats, &depths, |lon, lat, z| field.at(lon, lat, z));
    create_raw_grid(NativeNames::SHINEVAR, &lons, &lats, &depths, values)
}
