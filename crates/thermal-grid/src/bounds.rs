//! Domain checks for query coordinates.
//!
//! Queries are validated before any interpolation; values outside an axis
//! are rejected, never clamped.

use ctm_common::{Coordinate, CtmError, CtmResult};

use crate::grid::CanonicalGrid;

/// Fail with `OutOfBounds` unless `value` lies within the coordinate's axis.
pub fn check_coordinate(grid: &CanonicalGrid, coordinate: Coordinate, value: f64) -> CtmResult<()> {
    let axis = grid.axis(coordinate);
    if axis.contains(value) {
        Ok(())
    } else {
        Err(CtmError::out_of_bounds(coordinate.label(), value, axis.min(), axis.max()))
    }
}

/// Check one value against a coordinate given by name (`depth` or `depth[m]`).
///
/// Unknown names fail with `UnknownCoordinate`.
pub fn check_in_bounds(grid: &CanonicalGrid, name: &str, value: f64) -> CtmResult<()> {
    let coordinate: Coordinate = name.parse()?;
    check_coordinate(grid, coordinate, value)
}

/// Check every value of every coordinate, in the order given.
///
/// Stops at the first failure; later values are not examined.
pub fn check_in_bounds_all<I, K, V>(grid: &CanonicalGrid, checks: I) -> CtmResult<()>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<[f64]>,
{
    for (name, values) in checks {
        let coordinate: Coordinate = name.as_ref().parse()?;
        for &value in values.as_ref() {
            check_coordinate(grid, coordinate, value)?;
        }
    }
    Ok(())
}
