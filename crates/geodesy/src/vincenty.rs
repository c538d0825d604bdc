//! Vincenty's inverse and direct solutions.
//!
//! T. Vincenty, "Direct and inverse solutions of geodesics on the ellipsoid
//! with application of nested equations", Survey Review 23 (1975).

use tracing::debug;

use crate::ellipsoid::Ellipsoid;
use crate::error::{GeodesyError, GeodesyResult};

/// Iteration cap for both solutions.
const MAX_ITERATIONS: usize = 200;
/// Convergence threshold on lambda / sigma (radians, about 0.006 mm).
const TOLERANCE: f64 = 1e-12;

/// Solution of the inverse problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodesic {
    /// Length of the geodesic in metres
    pub distance_m: f64,
    /// Azimuth at the start, degrees clockwise from north in [0, 360)
    pub azimuth1_deg: f64,
    /// Azimuth at the end (direction of travel), degrees in [0, 360)
    pub azimuth2_deg: f64,
}

/// Solution of the direct problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Destination {
    /// Longitude reached. Equals the start longitude plus the longitude
    /// change along the geodesic, so it is not wrapped into any range.
    pub lon: f64,
    pub lat: f64,
    /// Azimuth of travel at the destination, degrees in [0, 360)
    pub azimuth_deg: f64,
}

/// Coefficients A and B of the series for the geodesic on the auxiliary sphere.
fn series_coefficients(cos2_alpha: f64, ellipsoid: &Ellipsoid) -> (f64, f64) {
    let a = ellipsoid.semi_major;
    let b = ellipsoid.semi_minor();
    let u2 = cos2_alpha * (a * a - b * b) / (b * b);
    let big_a = 1.0 + u2 / 16384.0 * (4096.0 + u2 * (-768.0 + u2 * (320.0 - 175.0 * u2)));
    let big_b = u2 / 1024.0 * (256.0 + u2 * (-128.0 + u2 * (74.0 - 47.0 * u2)));
    (big_a, big_b)
}

fn delta_sigma(big_b: f64, sin_sigma: f64, cos_sigma: f64, cos_2sigma_m: f64) -> f64 {
    let c2 = cos_2sigma_m * cos_2sigma_m;
    big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * c2)
                    - big_b / 6.0 * cos_2sigma_m * (-3.0 + 4.0 * sin_sigma * sin_sigma) * (-3.0 + 4.0 * c2)))
}

/// Wrap an angle in degrees into (-180, 180].
pub(crate) fn wrap_180(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

fn normalize_azimuth(radians: f64) -> f64 {
    let deg = radians.to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if deg >= 360.0 {
        0.0
    } else {
        deg
    }
}

pub(crate) fn check_position(lon: f64, lat: f64) -> GeodesyResult<()> {
    if !lon.is_finite() || !lat.is_finite() {
        return Err(GeodesyError::InvalidCoordinate(format!("({}, {}) is not finite", lon, lat)));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(GeodesyError::InvalidCoordinate(format!(
            "latitude {} outside [-90, 90]",
            lat
        )));
    }
    Ok(())
}

fn check_ellipsoid(ellipsoid: &Ellipsoid) -> GeodesyResult<()> {
    if !(ellipsoid.semi_major > 0.0) || !(0.0..1.0).contains(&ellipsoid.flattening) {
        return Err(GeodesyError::InvalidEllipsoid(format!(
            "a = {}, f = {}",
            ellipsoid.semi_major, ellipsoid.flattening
        )));
    }
    Ok(())
}

/// Distance and azimuths of the geodesic from (lon1, lat1) to (lon2, lat2).
///
/// Takes the short way round in longitude. For nearly antipodal points the
/// iteration may not converge; after [`MAX_ITERATIONS`] the result falls
/// back to the great-circle solution on a sphere of radius `a`, which is
/// still usable for sampling but loses ellipsoidal accuracy.
pub fn inverse(ellipsoid: &Ellipsoid, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> GeodesyResult<Geodesic> {
    check_ellipsoid(ellipsoid)?;
    check_position(lon1, lat1)?;
    check_position(lon2, lat2)?;

    let f = ellipsoid.flattening;
    let b = ellipsoid.semi_minor();

    let l = wrap_180(lon2 - lon1).to_radians();
    let u1 = ((1.0 - f) * lat1.to_radians().tan()).atan();
    let u2 = ((1.0 - f) * lat2.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();

        if sin_sigma == 0.0 {
            // Coincident points
            return Ok(Geodesic {
                distance_m: 0.0,
                azimuth1_deg: 0.0,
                azimuth2_deg: 0.0,
            });
        }

        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos2_alpha = 1.0 - sin_alpha * sin_alpha;
        // Equatorial lines have cos2_alpha = 0
        let cos_2sigma_m = if cos2_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos2_alpha
        } else {
            0.0
        };

        let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));
        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma + c * sin_sigma * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda - lambda_prev).abs() < TOLERANCE {
            let (big_a, big_b) = series_coefficients(cos2_alpha, ellipsoid);
            let distance_m = b * big_a * (sigma - delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m));
            let (sin_lambda, cos_lambda) = lambda.sin_cos();
            let alpha1 = (cos_u2 * sin_lambda).atan2(cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda);
            let alpha2 = (cos_u1 * sin_lambda).atan2(-sin_u1 * cos_u2 + cos_u1 * sin_u2 * cos_lambda);
            return Ok(Geodesic {
                distance_m,
                azimuth1_deg: normalize_azimuth(alpha1),
                azimuth2_deg: normalize_azimuth(alpha2),
            });
        }
    }

    debug!(lon1, lat1, lon2, lat2, "Vincenty inverse did not converge, using spherical solution");
    Ok(spherical_inverse(ellipsoid.semi_major, lon1, lat1, lon2, lat2))
}

fn spherical_inverse(radius: f64, lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Geodesic {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dl = wrap_180(lon2 - lon1).to_radians();
    let central = (phi1.sin() * phi2.sin() + phi1.cos() * phi2.cos() * dl.cos())
        .clamp(-1.0, 1.0)
        .acos();
    let alpha1 = (dl.sin() * phi2.cos()).atan2(phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dl.cos());
    let alpha2 = (dl.sin() * phi1.cos()).atan2(-phi2.cos() * phi1.sin() + phi2.sin() * phi1.cos() * dl.cos());
    Geodesic {
        distance_m: radius * central,
        azimuth1_deg: normalize_azimuth(alpha1),
        azimuth2_deg: normalize_azimuth(alpha2),
    }
}

/// Point reached after travelling `distance_m` from (lon1, lat1) at `azimuth_deg`.
pub fn direct(
    ellipsoid: &Ellipsoid,
    lon1: f64,
    lat1: f64,
    azimuth_deg: f64,
    distance_m: f64,
) -> GeodesyResult<Destination> {
    check_ellipsoid(ellipsoid)?;
    check_position(lon1, lat1)?;
    if !azimuth_deg.is_finite() || !distance_m.is_finite() {
        return Err(GeodesyError::InvalidCoordinate(format!(
            "azimuth {} / distance {} is not finite",
            azimuth_deg, distance_m
        )));
    }

    let f = ellipsoid.flattening;
    let b = ellipsoid.semi_minor();

    let (sin_alpha1, cos_alpha1) = azimuth_deg.to_radians().sin_cos();
    let u1 = ((1.0 - f) * lat1.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();

    let sigma1 = u1.tan().atan2(cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos2_alpha = 1.0 - sin_alpha * sin_alpha;
    let (big_a, big_b) = series_coefficients(cos2_alpha, ellipsoid);

    let sigma0 = distance_m / (b * big_a);
    let mut sigma = sigma0;
    let mut cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
    for _ in 0..MAX_ITERATIONS {
        cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        let (sin_sigma, cos_sigma) = sigma.sin_cos();
        let sigma_prev = sigma;
        sigma = sigma0 + delta_sigma(big_b, sin_sigma, cos_sigma, cos_2sigma_m);
        if (sigma - sigma_prev).abs() < TOLERANCE {
            break;
        }
    }

    let (sin_sigma, cos_sigma) = sigma.sin_cos();
    let tmp = sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1;
    let lat2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1)
        .atan2((1.0 - f) * (sin_alpha * sin_alpha + tmp * tmp).sqrt());
    let lambda = (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
    let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));
    let l = lambda
        - (1.0 - c)
            * f
            * sin_alpha
            * (sigma + c * sin_sigma * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));
    let alpha2 = sin_alpha.atan2(-tmp);

    Ok(Destination {
        lon: lon1 + l.to_degrees(),
        lat: lat2.to_degrees(),
        azimuth_deg: normalize_azimuth(alpha2),
    })
}
