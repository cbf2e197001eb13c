//! Equatorial to horizontal coordinate math. Pure functions, no engine state.
//!
//! Uses f64 throughout (day counts since J2000 × degrees per day are large).
//! Angles are degrees at the API boundary, right ascension is hours.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Julian Date of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Days per Julian century.
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Observer-relative position of a sky object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Horizontal {
    /// Degrees above the horizon, [-90, 90].
    pub altitude: f64,
    /// Degrees from North, [0, 360).
    pub azimuth: f64,
    /// `altitude > 0`.
    pub visible: bool,
}

/// Wrap an angle into [0, 360). Non-finite input stays non-finite.
#[inline]
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 { 0.0 } else { r }
}

/// Julian Date of a UTC instant.
///
/// Civil date → Julian Day Number by the integer algorithm, then the
/// time of day (millisecond resolution) as a fraction measured from noon.
pub fn julian_date(instant: &DateTime<Utc>) -> f64 {
    let year = instant.year() as i64;
    let month = instant.month() as i64;
    let day = instant.day() as i64;

    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;

    let jdn = day + (153 * m + 2) / 5 + 365 * y + y.div_euclid(4) - y.div_euclid(100)
        + y.div_euclid(400)
        - 32_045;

    let seconds = instant.num_seconds_from_midnight() as f64
        + instant.timestamp_subsec_millis().min(999) as f64 / 1000.0;

    jdn as f64 - 0.5 + seconds / 86_400.0
}

/// Julian centuries elapsed since J2000.
#[inline]
pub fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

/// Greenwich mean sidereal time in degrees, [0, 360).
///
/// The linear term runs on the full Julian Date, so the time of day is
/// already included and must not be added again.
pub fn greenwich_sidereal_degrees(jd: f64) -> f64 {
    let d = jd - J2000_JD;
    let t = d / DAYS_PER_CENTURY;
    let gmst = 280.460_618_37 + 360.985_647_366_29 * d + t * t * (0.000_387_933 - t / 38_710_000.0);
    normalize_degrees(gmst)
}

/// Local sidereal time in degrees, [0, 360).
pub fn local_sidereal_degrees(longitude: f64, instant: &DateTime<Utc>) -> f64 {
    normalize_degrees(greenwich_sidereal_degrees(julian_date(instant)) + longitude)
}

/// Convert equatorial coordinates to horizontal ones for an observer,
/// given a precomputed local sidereal time.
///
/// A recompute evaluates sidereal time once and calls this per object.
pub fn equatorial_to_horizontal_at(ra_hours: f64, dec: f64, latitude: f64, lst_degrees: f64) -> Horizontal {
    let ha = (lst_degrees - ra_hours * 15.0).to_radians();
    let dec = dec.to_radians();
    let lat = latitude.to_radians();

    let (sin_dec, cos_dec) = dec.sin_cos();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_ha, cos_ha) = ha.sin_cos();

    let sin_alt = (sin_dec * sin_lat + cos_dec * cos_lat * cos_ha).clamp(-1.0, 1.0);
    let altitude = sin_alt.asin().to_degrees();

    let x = cos_dec * sin_ha;
    let y = sin_dec * cos_lat - cos_dec * cos_ha * sin_lat;
    let azimuth = normalize_degrees(x.atan2(y).to_degrees());

    Horizontal {
        altitude,
        azimuth,
        visible: altitude > 0.0,
    }
}

/// Convert equatorial coordinates to horizontal ones for an observer at
/// `(latitude, longitude)` at `instant`.
pub fn equatorial_to_horizontal(
    ra_hours: f64,
    dec: f64,
    latitude: f64,
    longitude: f64,
    instant: &DateTime<Utc>,
) -> Horizontal {
    let lst = local_sidereal_degrees(longitude, instant);
    equatorial_to_horizontal_at(ra_hours, dec, latitude, lst)
}

/// J2000 galactic (l, b) in degrees → equatorial (ra hours, dec degrees).
pub fn galactic_to_equatorial(l: f64, b: f64) -> (f64, f64) {
    const ROWS: [[f64; 3]; 3] = [
        [-0.054_875_560_4, 0.494_109_427_9, -0.867_666_149],
        [-0.873_437_090_2, -0.444_829_63, -0.198_076_376_2],
        [-0.483_835_015_5, 0.746_982_244_5, 0.455_983_776_2],
    ];

    let (sin_b, cos_b) = b.to_radians().sin_cos();
    let (sin_l, cos_l) = l.to_radians().sin_cos();
    let g = [cos_b * cos_l, cos_b * sin_l, sin_b];

    let dot = |row: [f64; 3]| row[0] * g[0] + row[1] * g[1] + row[2] * g[2];
    let (x, y, z) = (dot(ROWS[0]), dot(ROWS[1]), dot(ROWS[2]));

    let ra = normalize_degrees(y.atan2(x).to_degrees()) / 15.0;
    let dec = z.clamp(-1.0, 1.0).asin().to_degrees();
    (ra, dec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const GREENWICH_LAT: f64 = 51.4779;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).single().unwrap()
    }

    #[test]
    fn julian_date_at_j2000() {
        let jd = julian_date(&utc(2000, 1, 1, 12, 0, 0));
        assert!((jd - J2000_JD).abs() < 1e-9, "jd = {jd}");
    }

    #[test]
    fn julian_date_at_midnight() {
        // 2024-01-01T00:00Z = JD 2460310.5
        let jd = julian_date(&utc(2024, 1, 1, 0, 0, 0));
        assert!((jd - 2_460_310.5).abs() < 1e-9, "jd = {jd}");
    }

    #[test]
    fn gmst_at_j2000() {
        let gst = greenwich_sidereal_degrees(J2000_JD);
        assert!((gst - 280.460_618_37).abs() < 1e-6, "gst = {gst}");
    }

    #[test]
    fn lst_wraps_negative_longitude() {
        let instant = utc(2024, 6, 1, 3, 0, 0);
        for lon in [-179.9, -90.0, -0.1, 0.0, 45.0, 179.9] {
            let lst = local_sidereal_degrees(lon, &instant);
            assert!((0.0..360.0).contains(&lst), "lst({lon}) = {lst}");
        }
    }

    #[test]
    fn outputs_are_in_range() {
        let instants = [utc(2024, 1, 1, 0, 0, 0), utc(1999, 12, 31, 23, 59, 59), utc(2031, 7, 15, 13, 30, 0)];
        for instant in &instants {
            for ra in [0.0, 2.53, 6.0, 12.7, 23.99] {
                for dec in [-90.0, -45.0, 0.0, 30.0, 89.26, 90.0] {
                    for lat in [-90.0, -33.9, 0.0, GREENWICH_LAT, 90.0] {
                        let h = equatorial_to_horizontal(ra, dec, lat, -73.9, instant);
                        assert!((-90.0..=90.0).contains(&h.altitude), "alt = {}", h.altitude);
                        assert!((0.0..360.0).contains(&h.azimuth), "az = {}", h.azimuth);
                        assert_eq!(h.visible, h.altitude > 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn north_pole_altitude_equals_latitude() {
        for hour in 0..24 {
            let instant = utc(2024, 3, 20, hour, 17, 0);
            let h = equatorial_to_horizontal(0.0, 90.0, GREENWICH_LAT, 0.0, &instant);
            assert!((h.altitude - GREENWICH_LAT).abs() < 0.5, "alt = {}", h.altitude);
            assert!(h.visible);
        }
    }

    #[test]
    fn south_pole_never_visible_from_greenwich() {
        for hour in 0..24 {
            let instant = utc(2024, 9, 1, hour, 0, 0);
            let h = equatorial_to_horizontal(7.0, -90.0, GREENWICH_LAT, 0.0, &instant);
            assert!(!h.visible, "alt = {}", h.altitude);
        }
    }

    #[test]
    fn polaris_from_greenwich_new_year() {
        let instant = utc(2024, 1, 1, 0, 0, 0);
        let h = equatorial_to_horizontal(2.53, 89.26, GREENWICH_LAT, 0.0, &instant);
        assert!((50.0..=52.0).contains(&h.altitude), "alt = {}", h.altitude);
        assert!(h.visible);
    }

    #[test]
    fn non_finite_input_propagates() {
        let instant = utc(2024, 1, 1, 0, 0, 0);
        let h = equatorial_to_horizontal(f64::NAN, 10.0, GREENWICH_LAT, 0.0, &instant);
        assert!(!h.altitude.is_finite());
        assert!(!h.visible);
    }

    #[test]
    fn galactic_center_maps_to_sagittarius() {
        // l = 0, b = 0 → RA ≈ 17.76h, Dec ≈ −28.94°
        let (ra, dec) = galactic_to_equatorial(0.0, 0.0);
        assert!((ra - 17.76).abs() < 0.05, "ra = {ra}");
        assert!((dec + 28.94).abs() < 0.2, "dec = {dec}");
    }
}
