//! WGS84 <-> Lambert-93 projection.
//!
//! Lambert-93 (EPSG:2154) is a Lambert conformal conic projection with two
//! standard parallels on the GRS80 ellipsoid. RGF93 and WGS84 coincide to well
//! under a meter, so no datum shift is applied.

use std::f64::consts::FRAC_PI_2;
use std::f64::consts::FRAC_PI_4;
use std::sync::OnceLock;

use crate::models::{GlobalPoint, PlanarPoint};

/// GRS80 semi-major axis (m)
const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
const INVERSE_FLATTENING: f64 = 298.257_222_101;

const STANDARD_PARALLEL_1: f64 = 44.0;
const STANDARD_PARALLEL_2: f64 = 49.0;
const LATITUDE_OF_ORIGIN: f64 = 46.5;
const CENTRAL_MERIDIAN: f64 = 3.0;
const FALSE_EASTING: f64 = 700_000.0;
const FALSE_NORTHING: f64 = 6_600_000.0;

const MAX_ITERATIONS: usize = 15;
const CONVERGENCE: f64 = 1e-12;

/// Derived cone constants, computed once.
struct Lambert93 {
    e: f64,
    n: f64,
    /// a * F
    scale: f64,
    rho0: f64,
    lambda0: f64,
}

impl Lambert93 {
    fn get() -> &'static Lambert93 {
        static PARAMS: OnceLock<Lambert93> = OnceLock::new();
        PARAMS.get_or_init(Lambert93::derive)
    }

    fn derive() -> Self {
        let f = 1.0 / INVERSE_FLATTENING;
        let e = (f * (2.0 - f)).sqrt();

        let phi1 = STANDARD_PARALLEL_1.to_radians();
        let phi2 = STANDARD_PARALLEL_2.to_radians();
        let (m1, m2) = (meridian_factor(phi1, e), meridian_factor(phi2, e));
        let (t1, t2) = (isometric_t(phi1, e), isometric_t(phi2, e));

        let n = (m1.ln() - m2.ln()) / (t1.ln() - t2.ln());
        let scale = SEMI_MAJOR_AXIS * m1 / (n * t1.powf(n));
        let rho0 = scale * isometric_t(LATITUDE_OF_ORIGIN.to_radians(), e).powf(n);

        Self {
            e,
            n,
            scale,
            rho0,
            lambda0: CENTRAL_MERIDIAN.to_radians(),
        }
    }
}

fn meridian_factor(phi: f64, e: f64) -> f64 {
    let s = e * phi.sin();
    phi.cos() / (1.0 - s * s).sqrt()
}

fn isometric_t(phi: f64, e: f64) -> f64 {
    let s = e * phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - s) / (1.0 + s)).powf(e / 2.0)
}

/// Project WGS84 degrees to Lambert-93 meters.
///
/// Inputs must be finite; [`GlobalPoint::new`] enforces that for external
/// callers.
pub fn to_planar_coordinates(lat: f64, lon: f64) -> PlanarPoint {
    let p = Lambert93::get();
    let phi = lat.to_radians();

    let rho = p.scale * isometric_t(phi, p.e).powf(p.n);
    let theta = p.n * (lon.to_radians() - p.lambda0);

    PlanarPoint::new(
        FALSE_EASTING + rho * theta.sin(),
        FALSE_NORTHING + p.rho0 - rho * theta.cos(),
    )
}

/// Inverse projection from Lambert-93 meters back to WGS84 degrees.
pub fn to_global_coordinates(x: f64, y: f64) -> GlobalPoint {
    let p = Lambert93::get();

    let dx = x - FALSE_EASTING;
    let dy = p.rho0 - (y - FALSE_NORTHING);
    let rho = dx.hypot(dy).copysign(p.n);
    let theta = dx.atan2(dy);

    let t = (rho / p.scale).powf(1.0 / p.n);
    let mut phi = FRAC_PI_2 - 2.0 * t.atan();
    for _ in 0..MAX_ITERATIONS {
        let s = p.e * phi.sin();
        let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - s) / (1.0 + s)).powf(p.e / 2.0)).atan();
        let delta = (next - phi).abs();
        phi = next;
        if delta < CONVERGENCE {
            break;
        }
    }

    let lambda = theta / p.n + p.lambda0;
    GlobalPoint::from_degrees(lambda.to_degrees(), phi.to_degrees())
}

impl From<GlobalPoint> for PlanarPoint {
    fn from(point: GlobalPoint) -> Self {
        to_planar_coordinates(point.lat(), point.lon())
    }
}

impl From<PlanarPoint> for GlobalPoint {
    fn from(point: PlanarPoint) -> Self {
        to_global_coordinates(point.x, point.y)
    }
}
