//! Planetary data: J2000 orbital elements and sky-drawing properties.
//!
//! Orbital elements from Standish (1992) / JPL approximate planetary positions,
//! valid 1800 AD - 2050 AD. Earth's entry is the Earth-Moon barycenter.

use crate::ephemeris::orbit::OrbitalElements;

pub const MERCURY: usize = 0;
pub const VENUS: usize = 1;
pub const EARTH: usize = 2;
pub const MARS: usize = 3;
pub const JUPITER: usize = 4;
pub const SATURN: usize = 5;
pub const URANUS: usize = 6;
pub const NEPTUNE: usize = 7;
pub const PLANET_COUNT: usize = 8;

pub const PLANET_NAMES: [&str; PLANET_COUNT] = [
    "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
];

/// Mean visual magnitude near opposition (or greatest elongation), for display only.
pub const PLANET_MAGNITUDES: [f64; PLANET_COUNT] = [
    -0.4, // Mercury
    -4.4, // Venus
    f64::NAN,
    -2.0, // Mars
    -2.7, // Jupiter
    0.5,  // Saturn
    5.7,  // Uranus
    7.8,  // Neptune
];

pub const SUN_MAGNITUDE: f64 = -26.74;
pub const MOON_MAGNITUDE: f64 = -12.74;

/// Apparent angular diameter used to size the Sun and Moon discs, degrees.
pub const SUN_ANGULAR_DIAMETER: f64 = 0.533;
pub const MOON_ANGULAR_DIAMETER: f64 = 0.518;

/// Drawing properties for one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyVisuals {
    pub radius_px: f32,
    pub color: [u8; 3],
}

const DEFAULT_VISUALS: BodyVisuals = BodyVisuals {
    radius_px: 4.0,
    color: [255, 255, 255],
};

/// Look up drawing properties by body name; unknown names get a small white disc.
pub fn body_visuals(name: &str) -> BodyVisuals {
    let (radius_px, color) = match name {
        "Sun" => (6.0, [0xff, 0xd1, 0x66]),
        "Moon" => (5.5, [0xe9, 0xec, 0xef]),
        "Mercury" => (4.0, [0xc2, 0xc2, 0xc2]),
        "Venus" => (4.5, [0xff, 0xe8, 0xa3]),
        "Mars" => (4.0, [0xff, 0x6b, 0x6b]),
        "Jupiter" => (4.8, [0xf4, 0xd6, 0xa0]),
        "Saturn" => (4.6, [0xf2, 0xe2, 0xb6]),
        "Uranus" => (4.2, [0xb3, 0xe5, 0xff]),
        "Neptune" => (4.2, [0x6a, 0xa5, 0xff]),
        _ => return DEFAULT_VISUALS,
    };
    BodyVisuals { radius_px, color }
}

/// J2000 Keplerian elements for the 8 planets.
pub fn planet_elements() -> [OrbitalElements; PLANET_COUNT] {
    [
        // Mercury
        OrbitalElements {
            a0: 0.387_099_27, e0: 0.205_635_93, i0: 7.004_979_02,
            l0: 252.250_323_50, l_dot: 149_472.674_111_75,
            w0: 77.457_796_28, w_dot: 0.160_476_89,
            node0: 48.330_765_93, node_dot: -0.125_340_81,
        },
        // Venus
        OrbitalElements {
            a0: 0.723_335_66, e0: 0.006_776_72, i0: 3.394_676_05,
            l0: 181.979_099_50, l_dot: 58_517.815_387_29,
            w0: 131.602_467_18, w_dot: 0.002_683_29,
            node0: 76.679_842_55, node_dot: -0.277_694_18,
        },
        // Earth-Moon barycenter
        OrbitalElements {
            a0: 1.000_002_61, e0: 0.016_711_23, i0: -0.000_015_31,
            l0: 100.464_571_66, l_dot: 35_999.372_449_81,
            w0: 102.937_681_93, w_dot: 0.323_273_64,
            node0: 0.0, node_dot: 0.0,
        },
        // Mars
        OrbitalElements {
            a0: 1.523_710_34, e0: 0.093_394_10, i0: 1.849_691_42,
            l0: -4.553_432_05, l_dot: 19_140.302_684_99,
            w0: -23.943_629_59, w_dot: 0.444_410_88,
            node0: 49.559_538_91, node_dot: -0.292_573_43,
        },
        // Jupiter
        OrbitalElements {
            a0: 5.202_887_00, e0: 0.048_386_24, i0: 1.304_396_95,
            l0: 34.396_440_51, l_dot: 3_034.746_127_75,
            w0: 14.728_479_83, w_dot: 0.212_526_68,
            node0: 100.473_909_09, node_dot: 0.204_691_06,
        },
        // Saturn
        OrbitalElements {
            a0: 9.536_675_94, e0: 0.053_861_79, i0: 2.485_991_87,
            l0: 49.954_244_23, l_dot: 1_222.493_622_01,
            w0: 92.598_878_31, w_dot: -0.418_972_16,
            node0: 113.662_424_48, node_dot: -0.288_677_94,
        },
        // Uranus
        OrbitalElements {
            a0: 19.189_164_64, e0: 0.047_257_44, i0: 0.772_637_83,
            l0: 313.238_104_51, l_dot: 428.482_027_85,
            w0: 170.954_276_30, w_dot: 0.408_052_81,
            node0: 74.016_925_03, node_dot: 0.042_405_89,
        },
        // Neptune
        OrbitalElements {
            a0: 30.069_922_76, e0: 0.008_590_48, i0: 1.770_043_47,
            l0: -55.120_029_69, l_dot: 218.459_453_25,
            w0: 44.964_762_27, w_dot: -0.322_414_64,
            node0: 131.784_225_74, node_dot: -0.005_086_64,
        },
    ]
}
