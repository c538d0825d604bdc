//! Reference ellipsoids.

/// WGS84 semi-major axis (m)
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// An oblate ellipsoid of revolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in metres
    pub semi_major: f64,
    /// Flattening `(a - b) / a`
    pub flattening: f64,
}

impl Ellipsoid {
    pub const fn wgs84() -> Self {
        Self {
            semi_major: WGS84_A,
            flattening: WGS84_F,
        }
    }

    /// Sphere of the given radius.
    pub const fn sphere(radius: f64) -> Self {
        Self {
            semi_major: radius,
            flattening: 0.0,
        }
    }

    /// Semi-minor axis in metres.
    pub fn semi_minor(&self) -> f64 {
        self.semi_major * (1.0 - self.flattening)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}
