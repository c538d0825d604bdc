//! Geodesics on an ellipsoidal Earth.
//!
//! Provides Vincenty's inverse and direct solutions on a reference
//! ellipsoid (WGS84 by default) and [`track`], which samples evenly spaced
//! points along the geodesic between two positions. Angles are decimal
//! degrees, distances metres.

pub mod ellipsoid;
pub mod error;
pub mod track;
pub mod vincenty;

pub use ellipsoid::Ellipsoid;
pub use error::{GeodesyError, GeodesyResult};
pub use track::{track, track_on};
pub use vincenty::{direct, inverse, Destination, Geodesic};
