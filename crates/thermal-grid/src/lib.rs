//! Canonical thermal model grids.
//!
//! This crate turns a [`ctm_common::RawGrid`] read from a model file into a
//! [`CanonicalGrid`] (ascending longitude/latitude/depth axes in °/°/m and a
//! dense temperature array in °C), checks query coordinates against its
//! domain and evaluates the temperature field by multilinear interpolation.
//!
//! # Example
//!
//! ```ignore
//! use thermal_grid::{Interpolator, ModelRegistry};
//!
//! let registry = ModelRegistry::builtin()?;
//! let grid = registry.normalize("Lee_2025", &raw)?;
//! let temperature = Interpolator::new(&grid).point(-117.5, 34.0, 10_000.0)?;
//! ```

pub mod bounds;
pub mod extrapolate;
pub mod grid;
pub mod interpolation;
pub mod normalize;
pub mod registry;

pub use bounds::{check_coordinate, check_in_bounds, check_in_bounds_all};
pub use extrapolate::extrapolate_to_surface;
pub use grid::{Axis, CanonicalGrid};
pub use interpolation::{Interpolator, OutOfRange, SampleSet, Samples};
pub use normalize::normalize;
pub use registry::{ModelDescriptor, ModelRegistry, NativeDimensions, UnitTransform};
