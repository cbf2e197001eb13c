//! Built-in approximate ephemeris.
//!
//! Planets from J2000 Keplerian elements, the Moon from a truncated lunar
//! theory. Accurate to a fraction of a degree for the planets and about a
//! degree for the Moon, which is plenty at screen scale.

pub mod bodies;
pub mod moon;
pub mod orbit;

use chrono::{DateTime, Utc};

use crate::api::services::EphemerisProvider;
use crate::api::types::{BodyKind, SolarBody};
use crate::core::astronomy::{
    centuries_since_j2000, equatorial_to_horizontal_at, julian_date, local_sidereal_degrees, J2000_JD,
};
use bodies::{planet_elements, EARTH, MOON_MAGNITUDE, PLANET_COUNT, PLANET_MAGNITUDES, PLANET_NAMES, SUN_MAGNITUDE};
use orbit::{ecliptic_to_equatorial, heliocentric_position, ra_dec};

/// Geocentric ecliptic longitude of the Sun, degrees [0, 360).
pub fn sun_ecliptic_longitude(t_centuries: f64) -> f64 {
    let earth = heliocentric_position(&planet_elements()[EARTH], t_centuries);
    (-earth[1]).atan2(-earth[0]).to_degrees().rem_euclid(360.0)
}

/// Keplerian ephemeris for the Sun, Moon and the seven other planets.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeplerianEphemeris;

impl KeplerianEphemeris {
    pub fn new() -> Self {
        Self
    }
}

impl EphemerisProvider for KeplerianEphemeris {
    fn bodies(&self, instant: &DateTime<Utc>, latitude: f64, longitude: f64) -> Vec<SolarBody> {
        let jd = julian_date(instant);
        let t = centuries_since_j2000(jd);
        let lst = local_sidereal_degrees(longitude, instant);

        let elements = planet_elements();
        let earth = heliocentric_position(&elements[EARTH], t);

        let place = |name: &str, kind: BodyKind, (ra, dec): (f64, f64), magnitude: f64, phase: Option<f64>| {
            let h = equatorial_to_horizontal_at(ra, dec, latitude, lst);
            SolarBody {
                name: name.to_string(),
                kind,
                ra,
                dec,
                altitude: h.altitude,
                azimuth: h.azimuth,
                visible: h.visible,
                magnitude: magnitude.is_finite().then_some(magnitude),
                phase_fraction: phase,
            }
        };

        let mut out = Vec::with_capacity(PLANET_COUNT + 1);

        let sun_geo = [-earth[0], -earth[1], -earth[2]];
        out.push(place("Sun", BodyKind::Sun, ra_dec(ecliptic_to_equatorial(sun_geo)), SUN_MAGNITUDE, None));

        let lunar = moon::position(jd - J2000_JD);
        out.push(place(
            "Moon",
            BodyKind::Moon,
            lunar.ra_dec(),
            MOON_MAGNITUDE,
            Some(moon::illumination(lunar, sun_ecliptic_longitude(t))),
        ));

        for (i, el) in elements.iter().enumerate() {
            if i == EARTH {
                continue;
            }
            let p = heliocentric_position(el, t);
            let geo = [p[0] - earth[0], p[1] - earth[1], p[2] - earth[2]];
            out.push(place(
                PLANET_NAMES[i],
                BodyKind::Planet,
                ra_dec(ecliptic_to_equatorial(geo)),
                PLANET_MAGNITUDES[i],
                None,
            ));
        }

        out.retain(|b| {
            let ok = b.ra.is_finite() && b.dec.is_finite() && b.altitude.is_finite() && b.azimuth.is_finite();
            if !ok {
                log::debug!("dropping body {} with non-finite position", b.name);
            }
            ok
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn returns_sun_moon_and_seven_planets() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let bodies = KeplerianEphemeris::new().bodies(&instant, 51.4779, 0.0);
        assert_eq!(bodies.len(), 9);
        assert_eq!(bodies[0].kind, BodyKind::Sun);
        assert_eq!(bodies[1].kind, BodyKind::Moon);
        assert!(bodies[1].phase_fraction.is_some());
        assert!(bodies.iter().filter(|b| b.kind == BodyKind::Planet).all(|b| b.phase_fraction.is_none()));
        assert!(bodies.iter().all(|b| b.name != "Earth"));
    }

    #[test]
    fn sun_near_equinox_point_in_march() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 20, 3, 6, 0).unwrap();
        let bodies = KeplerianEphemeris::new().bodies(&instant, 0.0, 0.0);
        let sun = &bodies[0];
        assert!(sun.dec.abs() < 0.5, "dec = {}", sun.dec);
        assert!(sun.ra < 0.1 || sun.ra > 23.9, "ra = {}", sun.ra);
    }

    #[test]
    fn sun_is_high_at_equatorial_noon_on_equinox() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        let bodies = KeplerianEphemeris::new().bodies(&instant, 0.0, 0.0);
        assert!(bodies[0].altitude > 80.0, "alt = {}", bodies[0].altitude);
        assert!(bodies[0].visible);
    }

    #[test]
    fn sun_longitude_in_june_is_near_solstice() {
        let instant = Utc.with_ymd_and_hms(2024, 6, 20, 21, 0, 0).unwrap();
        let t = centuries_since_j2000(julian_date(&instant));
        assert!((sun_ecliptic_longitude(t) - 90.0).abs() < 0.5);
    }

    #[test]
    fn planets_stay_near_the_ecliptic() {
        let instant = Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap();
        for body in KeplerianEphemeris::new().bodies(&instant, 40.0, -74.0) {
            assert!(body.dec.abs() < 30.0, "{} dec = {}", body.name, body.dec);
            assert!((0.0..24.0).contains(&body.ra));
        }
    }
}
