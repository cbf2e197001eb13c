//! Stateless integer hashes.
//!
//! Everything that must look random but stay stable per star (twinkle,
//! tint) or per pick (pulse scheduling) is derived from these pure
//! functions instead of a PRNG stream, so the same inputs always produce
//! the same outputs.

/// Integer avalanche mix (lowbias32).
#[inline]
pub fn hash32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

/// Hash `(n, salt)` to a float in [0, 1).
#[inline]
pub fn hash01(n: u32, salt: u32) -> f64 {
    hash32(n ^ salt.wrapping_mul(0x9e37_79b9)) as f64 / 4_294_967_296.0
}

/// FNV-1a over the UTF-16 code units of `s`.
pub fn hash_str32(s: &str) -> u32 {
    let mut h: u32 = 2_166_136_261;
    for unit in s.encode_utf16() {
        h ^= unit as u32;
        h = h.wrapping_mul(16_777_619);
    }
    h
}
