//! Map a model's raw grid onto the canonical schema.

use ctm_common::{Coordinate, CtmError, CtmResult, RawGrid};
use tracing::debug;

use crate::extrapolate::extrapolate_to_surface;
use crate::grid::CanonicalGrid;
use crate::registry::ModelDescriptor;

/// Normalize `raw` using `descriptor`.
///
/// Resolves the native dimensions and temperature variable, converts depth
/// to metres and temperature to °C, transposes the data into (lon, lat,
/// depth) order whatever the file's layout, flips descending axes so every
/// axis ascends, and finally adds a surface layer when the model asks for it.
pub fn normalize(descriptor: &ModelDescriptor, raw: &RawGrid) -> CtmResult<CanonicalGrid> {
    raw.validate()?;

    let native = Coordinate::ALL.map(|c| descriptor.dimensions.name(c));
    for (coordinate, name) in Coordinate::ALL.iter().zip(native) {
        if raw.dimension(name).is_none() {
            return Err(CtmError::schema_mismatch(format!(
                "model {} expects dimension '{}' for {}",
                descriptor.name,
                name,
                coordinate.name()
            )));
        }
    }

    let variable = raw.variable(&descriptor.temperature).ok_or_else(|| {
        CtmError::schema_mismatch(format!(
            "model {} expects temperature variable '{}'",
            descriptor.name, descriptor.temperature
        ))
    })?;

    // Position of each canonical axis among the variable's dimensions
    if variable.dimensions.len() != 3 {
        return Err(CtmError::schema_mismatch(format!(
            "variable '{}' must span {:?}, found {:?}",
            variable.name, native, variable.dimensions
        )));
    }
    let mut position = [0usize; 3];
    for (axis, name) in native.iter().enumerate() {
        position[axis] = variable
            .dimensions
            .iter()
            .position(|d| d == name)
            .ok_or_else(|| {
                CtmError::schema_mismatch(format!(
                    "variable '{}' must span {:?}, found {:?}",
                    variable.name, native, variable.dimensions
                ))
            })?;
    }

    let mut axes: [Vec<f64>; 3] = [
        raw.coordinate_values(native[0])?.to_vec(),
        raw.coordinate_values(native[1])?.to_vec(),
        raw.coordinate_values(native[2])?
            .iter()
            .map(|&z| descriptor.depth_transform.apply(z))
            .collect(),
    ];

    // Row-major strides of the variable as stored
    let native_lens: Vec<usize> = variable
        .dimensions
        .iter()
        .map(|d| raw.dimension(d).map(|dim| dim.len).unwrap_or(0))
        .collect();
    let mut native_strides = [1usize; 3];
    for p in (0..2).rev() {
        native_strides[p] = native_strides[p + 1] * native_lens[p + 1];
    }
    let strides = position.map(|p| native_strides[p]);

    let reversed = axes.each_ref().map(|values| {
        values.len() > 1 && values[0] > values[values.len() - 1]
    });
    let lens = axes.each_ref().map(|values| values.len());

    let transform = descriptor.temperature_transform;
    let mut temperature = Vec::with_capacity(lens[0] * lens[1] * lens[2]);
    for i in 0..lens[0] {
        let si = if reversed[0] { lens[0] - 1 - i } else { i };
        for j in 0..lens[1] {
            let sj = if reversed[1] { lens[1] - 1 - j } else { j };
            let base = si * strides[0] + sj * strides[1];
            for k in 0..lens[2] {
                let sk = if reversed[2] { lens[2] - 1 - k } else { k };
                temperature.push(transform.apply(variable.values[base + sk * strides[2]]));
            }
        }
    }

    for (values, flip) in axes.iter_mut().zip(reversed) {
        if flip {
            values.reverse();
        }
    }

    let [longitude, latitude, depth] = axes;
    let grid = CanonicalGrid::new(longitude, latitude, depth, temperature)?;

    debug!(
        model = %descriptor.name,
        shape = ?grid.shape(),
        nodes = grid.node_count(),
        temperature_range = ?grid.temperature_range(),
        layout = ?variable.dimensions,
        reversed_axes = ?reversed,
        depth_scale = descriptor.depth_transform.scale,
        "Normalized model grid"
    );

    if descriptor.extrapolate_to_surface {
        return extrapolate_to_surface(grid);
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::UnitTransform;

    fn descriptor() -> ModelDescriptor {
        ModelDescriptor::new("Test", "test")
    }

    fn raw() -> RawGrid {
        RawGrid::new()
            .with_dimension("longitude", 2)
            .with_dimension("latitude", 1)
            .with_dimension("depth", 2)
            .with_coordinate("longitude", vec![0.0, 1.0])
            .with_coordinate("latitude", vec![0.0])
            .with_coordinate("depth", vec![0.0, 1.0])
            .with_variable("temperature", &["longitude", "latitude", "depth"], vec![1.0, 2.0, 3.0, 4.0])
    }

    #[test]
    fn test_identity_layout() {
        let grid = normalize(&descriptor(), &raw()).unwrap();
        assert_eq!(grid.temperature(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_missing_dimension() {
        let mut model = descriptor();
        model.dimensions.depth = "z".to_string();
        let err = normalize(&model, &raw()).unwrap_err();
        assert!(matches!(err, CtmError::SchemaMismatch(ref m) if m.contains("'z'")));
    }

    #[test]
    fn test_missing_variable() {
        let mut model = descriptor();
        model.temperature = "temperature_diffused".to_string();
        let err = normalize(&model, &raw()).unwrap_err();
        assert!(matches!(err, CtmError::SchemaMismatch(ref m) if m.contains("temperature_diffused")));
    }

    #[test]
    fn test_variable_over_wrong_dimensions() {
        let raw = raw().with_dimension("time", 1).with_variable(
            "t2",
            &["longitude", "time", "depth"],
            vec![0.0; 4],
        );
        let mut model = descriptor();
        model.temperature = "t2".to_string();
        assert!(matches!(normalize(&model, &raw), Err(CtmError::SchemaMismatch(_))));
    }

    #[test]
    fn test_unit_transforms() {
        let mut model = descriptor();
        model.depth_transform = UnitTransform::KM_TO_M;
        model.temperature_transform = UnitTransform::KELVIN_TO_CELSIUS;
        let grid = normalize(&model, &raw()).unwrap();
        assert_eq!(grid.axis(Coordinate::Depth).values(), &[0.0, 1000.0]);
        assert!((grid.value(0, 0, 0) - (1.0 - 273.15)).abs() < 1e-12);
    }

    #[test]
    fn test_non_monotonic_axis() {
        let raw = RawGrid::new()
            .with_dimension("longitude", 3)
            .with_dimension("latitude", 1)
            .with_dimension("depth", 1)
            .with_coordinate("longitude", vec![0.0, 2.0, 1.0])
            .with_coordinate("latitude", vec![0.0])
            .with_coordinate("depth", vec![0.0])
            .with_variable("temperature", &["longitude", "latitude", "depth"], vec![0.0; 3]);
        assert!(matches!(normalize(&descriptor(), &raw), Err(CtmError::InvalidGrid(_))));
    }
}
