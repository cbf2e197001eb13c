//! Keplerian orbital mechanics. Pure math, no engine dependencies.
//!
//! Uses f64 throughout for precision (centuries × deg/century = large numbers).
//! Positions are heliocentric, J2000 ecliptic frame, in AU.

const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Mean obliquity of the ecliptic at J2000, degrees.
pub const OBLIQUITY_J2000: f64 = 23.439_28;

/// Keplerian orbital elements at J2000 epoch with secular rates per century.
#[derive(Debug, Clone, Copy)]
pub struct OrbitalElements {
    /// Semi-major axis (AU)
    pub a0: f64,
    /// Eccentricity
    pub e0: f64,
    /// Inclination to the ecliptic (degrees)
    pub i0: f64,
    /// Mean longitude (degrees) at J2000
    pub l0: f64,
    /// Mean longitude rate (degrees per Julian century)
    pub l_dot: f64,
    /// Longitude of perihelion (degrees) at J2000
    pub w0: f64,
    /// Longitude of perihelion rate (degrees per Julian century)
    pub w_dot: f64,
    /// Longitude of the ascending node (degrees) at J2000
    pub node0: f64,
    /// Longitude of the ascending node rate (degrees per Julian century)
    pub node_dot: f64,
}

/// Solve Kepler's equation: E - e·sin(E) = M
/// Using Newton-Raphson iteration.
/// `mean_anomaly` in radians, returns eccentric anomaly in radians.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut ea = mean_anomaly;
    for _ in 0..15 {
        let delta = ea - eccentricity * ea.sin() - mean_anomaly;
        let derivative = 1.0 - eccentricity * ea.cos();
        ea -= delta / derivative;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ea
}

/// Heliocentric ecliptic position `[x, y, z]` in AU at `t_centuries`
/// Julian centuries from J2000.
pub fn heliocentric_position(elements: &OrbitalElements, t_centuries: f64) -> [f64; 3] {
    let a = elements.a0;
    let e = elements.e0;
    let inc = elements.i0 * DEG_TO_RAD;

    let l = elements.l0 + elements.l_dot * t_centuries;
    let w_bar = elements.w0 + elements.w_dot * t_centuries;
    let node = elements.node0 + elements.node_dot * t_centuries;

    // Argument of perihelion and mean anomaly wrapped to (-180, 180]
    let omega = (w_bar - node) * DEG_TO_RAD;
    let m = ((l - w_bar + 180.0).rem_euclid(360.0) - 180.0) * DEG_TO_RAD;
    let node = node * DEG_TO_RAD;

    let ea = solve_kepler(m, e);

    // Position in the orbital plane, x toward perihelion
    let xp = a * (ea.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ea.sin();

    let (sin_w, cos_w) = omega.sin_cos();
    let (sin_n, cos_n) = node.sin_cos();
    let (sin_i, cos_i) = inc.sin_cos();

    [
        (cos_w * cos_n - sin_w * sin_n * cos_i) * xp + (-sin_w * cos_n - cos_w * sin_n * cos_i) * yp,
        (cos_w * sin_n + sin_w * cos_n * cos_i) * xp + (-sin_w * sin_n + cos_w * cos_n * cos_i) * yp,
        (sin_w * sin_i) * xp + (cos_w * sin_i) * yp,
    ]
}

/// Rotate an ecliptic vector into the equatorial frame.
pub fn ecliptic_to_equatorial(v: [f64; 3]) -> [f64; 3] {
    let (sin_e, cos_e) = (OBLIQUITY_J2000 * DEG_TO_RAD).sin_cos();
    [v[0], v[1] * cos_e - v[2] * sin_e, v[1] * sin_e + v[2] * cos_e]
}

/// Equatorial vector → (right ascension hours [0, 24), declination degrees).
pub fn ra_dec(v: [f64; 3]) -> (f64, f64) {
    let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    let ra = v[1].atan2(v[0]).to_degrees().rem_euclid(360.0) / 15.0;
    let dec = (v[2] / r).clamp(-1.0, 1.0).asin().to_degrees();
    (ra, dec)
}

/// Ecliptic longitude/latitude (degrees) → (ra hours, dec degrees).
pub fn ecliptic_lon_lat_to_ra_dec(lon: f64, lat: f64) -> (f64, f64) {
    let (sin_b, cos_b) = (lat * DEG_TO_RAD).sin_cos();
    let (sin_l, cos_l) = (lon * DEG_TO_RAD).sin_cos();
    ra_dec(ecliptic_to_equatorial([cos_b * cos_l, cos_b * sin_l, sin_b]))
}
