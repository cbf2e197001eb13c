//! Low-precision lunar position and illumination.

use crate::ephemeris::orbit::ecliptic_lon_lat_to_ra_dec;

/// Geocentric ecliptic position of the Moon, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarPosition {
    pub longitude: f64,
    pub latitude: f64,
}

impl LunarPosition {
    /// Equatorial coordinates (ra hours, dec degrees).
    pub fn ra_dec(&self) -> (f64, f64) {
        ecliptic_lon_lat_to_ra_dec(self.longitude, self.latitude)
    }
}

/// Moon position `days` after J2000 using the leading terms of the lunar
/// theory (mean longitude, equation of center, main latitude term).
/// Good to about a degree.
pub fn position(days: f64) -> LunarPosition {
    let mean_longitude = 218.316 + 13.176_396 * days;
    let mean_anomaly = (134.963 + 13.064_993 * days).to_radians();
    let node_distance = (93.272 + 13.229_350 * days).to_radians();

    LunarPosition {
        longitude: (mean_longitude + 6.289 * mean_anomaly.sin()).rem_euclid(360.0),
        latitude: 5.128 * node_distance.sin(),
    }
}

/// Illuminated fraction of the disc (0 = new, 1 = full) from the Moon's
/// elongation from the Sun.
pub fn illumination(moon: LunarPosition, sun_longitude: f64) -> f64 {
    let cos_elongation = moon.latitude.to_radians().cos() * (moon.longitude - sun_longitude).to_radians().cos();
    ((1.0 - cos_elongation) / 2.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::astronomy::{julian_date, J2000_JD};
    use crate::ephemeris::sun_ecliptic_longitude;
    use chrono::{TimeZone, Utc};

    fn phase_at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> f64 {
        let instant = Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap();
        let days = julian_date(&instant) - J2000_JD;
        illumination(position(days), sun_ecliptic_longitude(days / 36_525.0))
    }

    #[test]
    fn new_moon_january_2000() {
        let f = phase_at(2000, 1, 6, 18, 14);
        assert!(f < 0.02, "f = {f}");
    }

    #[test]
    fn full_moon_january_2000() {
        let f = phase_at(2000, 1, 21, 4, 40);
        assert!(f > 0.98, "f = {f}");
    }

    #[test]
    fn first_quarter_is_about_half() {
        // 2000-01-14 13:34 UTC
        let f = phase_at(2000, 1, 14, 13, 34);
        assert!((f - 0.5).abs() < 0.1, "f = {f}");
    }

    #[test]
    fn latitude_stays_within_inclination() {
        for day in 0..60 {
            let p = position(day as f64 * 0.5);
            assert!(p.latitude.abs() <= 5.13);
            assert!((0.0..360.0).contains(&p.longitude));
        }
    }
}
