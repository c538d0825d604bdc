//! Surface layer extrapolation.

use ctm_common::{Coordinate, CtmError, CtmResult};
use tracing::debug;

use crate::grid::CanonicalGrid;

/// Add a depth = 0 layer to a grid whose shallowest sample is below the surface.
///
/// Each (lon, lat) column is extended by a straight line through its two
/// shallowest samples: `T0 = T1 + (0 - z1) * (T2 - T1) / (z2 - z1)`. A grid
/// that already reaches the surface is returned unchanged.
pub fn extrapolate_to_surface(grid: CanonicalGrid) -> CtmResult<CanonicalGrid> {
    let depth = grid.axis(Coordinate::Depth);
    if depth.min() <= 0.0 {
        return Ok(grid);
    }
    if depth.len() < 2 {
        return Err(CtmError::invalid_grid(
            "surface extrapolation needs at least two depth samples",
        ));
    }

    let z1 = depth.values()[0];
    let z2 = depth.values()[1];
    let slope_factor = (0.0 - z1) / (z2 - z1);
    let [nlon, nlat, ndepth] = grid.shape();

    let (longitude, latitude, old_depth, old_temperature) = grid.into_parts();

    let mut temperature = Vec::with_capacity(nlon * nlat * (ndepth + 1));
    for column in old_temperature.chunks_exact(ndepth) {
        let (t1, t2) = (column[0], column[1]);
        temperature.push(t1 + slope_factor * (t2 - t1));
        temperature.extend_from_slice(column);
    }

    let mut depth = Vec::with_capacity(ndepth + 1);
    depth.push(0.0);
    depth.extend(old_depth);

    debug!(
        shallowest_m = z1,
        columns = nlon * nlat,
        "Extrapolated surface layer"
    );

    CanonicalGrid::new(longitude, latitude, depth, temperature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extrapolated_value() {
        // Column: 100 °C at 5 km, 150 °C at 10 km -> 50 °C at the surface
        let grid = CanonicalGrid::new(vec![0.0], vec![0.0], vec![5000.0, 10000.0], vec![100.0, 150.0]).unwrap();
        let grid = extrapolate_to_surface(grid).unwrap();
        assert_eq!(grid.axis(Coordinate::Depth).values(), &[0.0, 5000.0, 10000.0]);
        assert!((grid.value(0, 0, 0) - 50.0).abs() < 1e-9);
        assert_eq!(grid.value(0, 0, 1), 100.0);
    }

    #[test]
    fn test_surface_grid_unchanged() {
        let grid = CanonicalGrid::new(vec![0.0], vec![0.0], vec![0.0, 10.0], vec![1.0, 2.0]).unwrap();
        assert_eq!(extrapolate_to_surface(grid.clone()).unwrap(), grid);
    }

    #[test]
    fn test_single_depth_rejected() {
        let grid = CanonicalGrid::new(vec![0.0], vec![0.0], vec![10.0], vec![1.0]).unwrap();
        assert!(matches!(extrapolate_to_surface(grid), Err(CtmError::InvalidGrid(_))));
    }
}
