//! Normalization of synthetic model grids.

use approx::assert_relative_eq;
use ctm_common::{Coordinate, CtmError};
use test_utils::{
    axis, create_lee_style_grid, create_raw_grid, create_raw_grid_depth_major,
    create_shinevar_style_grid, fill_values, registry_path, LinearField, NativeNames,
};
use thermal_grid::{extrapolate_to_surface, normalize, CanonicalGrid, Interpolator, ModelDescriptor, ModelRegistry};

#[test]
fn test_shipped_registry_file_matches_builtin() {
    let from_file = ModelRegistry::load(registry_path()).unwrap();
    let builtin = ModelRegistry::builtin().unwrap();
    assert_eq!(from_file.names().collect::<Vec<_>>(), builtin.names().collect::<Vec<_>>());
    for descriptor in builtin.iter() {
        assert_eq!(from_file.get(&descriptor.name).unwrap(), descriptor);
    }
}

#[test]
fn test_lee_depth_converted_to_metres() {
    let registry = ModelRegistry::builtin().unwrap();
    let grid = registry.normalize("Lee_2025", &create_lee_style_grid()).unwrap();

    assert_eq!(grid.shape(), [5, 4, 6]);
    assert_eq!(
        grid.axis(Coordinate::Depth).values(),
        &[0.0, 10_000.0, 20_000.0, 30_000.0, 40_000.0, 50_000.0]
    );

    let field = LinearField::crust();
    let value = Interpolator::new(&grid).point(-118.0, 35.0, 20_000.0).unwrap();
    assert_relative_eq!(value, field.at(-118.0, 35.0, 20_000.0), epsilon = 1e-9);
}

#[test]
fn test_lee_and_shinevar_agree_after_normalization() {
    let registry = ModelRegistry::builtin().unwrap();
    let lee = registry.normalize("Lee_2025", &create_lee_style_grid()).unwrap();
    let shinevar = registry.normalize("Shinevar_2018", &create_shinevar_style_grid()).unwrap();

    assert_eq!(lee.axis(Coordinate::Depth).values(), shinevar.axis(Coordinate::Depth).values());
    for (a, b) in lee.temperature().iter().zip(shinevar.temperature()) {
        assert_relative_eq!(*a, *b, epsilon = 1e-9);
    }
}

#[test]
fn test_wrong_model_for_file_is_schema_mismatch() {
    let registry = ModelRegistry::builtin().unwrap();
    // Shinevar file has `temperature`, Lee expects `temperature_diffused`
    let err = registry.normalize("Lee_2025", &create_shinevar_style_grid()).unwrap_err();
    assert!(matches!(err, CtmError::SchemaMismatch(_)), "got {:?}", err);
}

#[test]
fn test_unknown_model() {
    let registry = ModelRegistry::builtin().unwrap();
    let err = registry.normalize("NotAModel", &create_lee_style_grid()).unwrap_err();
    assert!(matches!(err, CtmError::UnknownModel(_)));
    assert_eq!(err.to_string(), "Unknown model: NotAModel");
}

#[test]
fn test_depth_major_layout_transposed() {
    let lons = axis(-120.0, 0.5, 4);
    let lats = axis(34.0, 0.5, 3);
    let depths = axis(0.0, 5000.0, 5);
    let field = LinearField::crust();
    let values = fill_values(&lons, &lats, &depths, |x, y, z| field.at(x, y, z));

    let reference = normalize(
        &ModelDescriptor::new("Ref", "ref"),
        &create_raw_grid(NativeNames::SHINEVAR, &lons, &lats, &depths, values.clone()),
    )
    .unwrap();
    let transposed = normalize(
        &ModelDescriptor::new("Ref", "ref"),
        &create_raw_grid_depth_major(NativeNames::SHINEVAR, &lons, &lats, &depths, &values),
    )
    .unwrap();

    assert_eq!(reference, transposed);
    assert_eq!(reference.temperature(), values.as_slice());
}

#[test]
fn test_descending_axes_reversed() {
    let lons = axis(-120.0, 1.0, 3);
    let lats = axis(36.0, -1.0, 3); // north to south
    let depths = axis(30_000.0, -10_000.0, 4); // deepest first
    let field = LinearField::crust();
    let values = fill_values(&lons, &lats, &depths, |x, y, z| field.at(x, y, z));
    let raw = create_raw_grid(NativeNames::SHINEVAR, &lons, &lats, &depths, values);

    let grid = normalize(&ModelDescriptor::new("Desc", "desc"), &raw).unwrap();
    assert_eq!(grid.axis(Coordinate::Latitude).values(), &[34.0, 35.0, 36.0]);
    assert_eq!(grid.axis(Coordinate::Depth).values(), &[0.0, 10_000.0, 20_000.0, 30_000.0]);

    for (i, &x) in grid.axis(Coordinate::Longitude).values().iter().enumerate() {
        for (j, &y) in grid.axis(Coordinate::Latitude).values().iter().enumerate() {
            for (k, &z) in grid.axis(Coordinate::Depth).values().iter().enumerate() {
                assert_relative_eq!(grid.value(i, j, k), field.at(x, y, z), epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn test_extrapolation_matches_manual_line() {
    // Model starting at 2 km depth, non-linear in depth
    let lons = axis(-117.0, 1.0, 2);
    let lats = axis(33.0, 1.0, 2);
    let depths_km = vec![2.0, 5.0, 10.0];
    let values = fill_values(&lons, &lats, &depths_km, |x, y, z| 15.0 + x.abs() * 0.1 + y * 0.2 + 3.0 * z * z);

    let raw = create_raw_grid(NativeNames::SHINEVAR, &lons, &lats, &depths_km, values.clone());
    let registry = ModelRegistry::from_yaml(
        "models:\n  - name: Deep\n    abbreviation: deep\n    depth_transform:\n      scale: 1000.0\n    extrapolate_to_surface: true\n",
    )
    .unwrap();
    let grid = registry.normalize("Deep", &raw).unwrap();

    assert_eq!(grid.axis(Coordinate::Depth).values(), &[0.0, 2000.0, 5000.0, 10_000.0]);
    for i in 0..2 {
        for j in 0..2 {
            let column = &values[(i * 2 + j) * 3..(i * 2 + j) * 3 + 3];
            let (z1, z2) = (2000.0, 5000.0);
            let expected = column[0] + (0.0 - z1) * (column[1] - column[0]) / (z2 - z1);
            assert_relative_eq!(grid.value(i, j, 0), expected, epsilon = 1e-9);
            // Existing layers are untouched
            assert_eq!(grid.value(i, j, 1), column[0]);
            assert_eq!(grid.value(i, j, 3), column[2]);
        }
    }

    // The surface is now queryable
    assert!(Interpolator::new(&grid).point(-116.5, 33.5, 0.0).is_ok());
}

#[test]
fn test_extrapolation_is_idempotent() {
    let grid = CanonicalGrid::new(vec![0.0], vec![0.0], vec![1000.0, 2000.0], vec![40.0, 60.0]).unwrap();
    let once = extrapolate_to_surface(grid).unwrap();
    let twice = extrapolate_to_surface(once.clone()).unwrap();
    assert_eq!(once, twice);
    assert_relative_eq!(once.value(0, 0, 0), 20.0, epsilon = 1e-12);
}
