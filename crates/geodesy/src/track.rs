//! Evenly spaced points along a geodesic.

use tracing::debug;

use crate::ellipsoid::Ellipsoid;
use crate::error::GeodesyResult;
use crate::vincenty::{check_position, direct, inverse, wrap_180};

/// `n` points from A to B on WGS84, equally spaced by geodesic distance.
///
/// Returns `(lons, lats)`. Index 0 is exactly A and index `n - 1` exactly B.
/// See [`track_on`].
pub fn track(lon_a: f64, lat_a: f64, lon_b: f64, lat_b: f64, n: usize) -> GeodesyResult<(Vec<f64>, Vec<f64>)> {
    track_on(&Ellipsoid::wgs84(), lon_a, lat_a, lon_b, lat_b, n)
}

/// `n` points from A to B on `ellipsoid`, equally spaced by geodesic distance.
///
/// Intermediate longitudes are `lon_a` plus the longitude change along the
/// path wrapped into (-180, 180], so they keep the convention of the inputs
/// (a track between 240° and 250° stays in 0..360). When A == B every point
/// is A. `n == 0` gives empty vectors and `n == 1` gives just A.
///
/// Nearly antipodal endpoints have no well-defined shortest path; the
/// points still lie on a geodesic from A to B but which one is arbitrary.
pub fn track_on(
    ellipsoid: &Ellipsoid,
    lon_a: f64,
    lat_a: f64,
    lon_b: f64,
    lat_b: f64,
    n: usize,
) -> GeodesyResult<(Vec<f64>, Vec<f64>)> {
    check_position(lon_a, lat_a)?;
    check_position(lon_b, lat_b)?;

    match n {
        0 => return Ok((Vec::new(), Vec::new())),
        1 => return Ok((vec![lon_a], vec![lat_a])),
        _ => {}
    }

    let geodesic = inverse(ellipsoid, lon_a, lat_a, lon_b, lat_b)?;
    if geodesic.distance_m == 0.0 {
        return Ok((vec![lon_a; n], vec![lat_a; n]));
    }

    let step = geodesic.distance_m / (n - 1) as f64;
    let mut lons = Vec::with_capacity(n);
    let mut lats = Vec::with_capacity(n);
    lons.push(lon_a);
    lats.push(lat_a);
    for i in 1..n - 1 {
        let point = direct(ellipsoid, lon_a, lat_a, geodesic.azimuth1_deg, step * i as f64)?;
        lons.push(lon_a + wrap_180(point.lon - lon_a));
        lats.push(point.lat);
    }
    lons.push(lon_b);
    lats.push(lat_b);

    debug!(
        distance_km = geodesic.distance_m / 1000.0,
        azimuth = geodesic.azimuth1_deg,
        points = n,
        "Computed geodesic track"
    );

    Ok((lons, lats))
}
