// extensions/mod.rs
//
// Decoupled helpers with no dependency on the simulation state.

pub mod easing;

pub use easing::{Easing, lerp, ease, approach, smoothing_alpha};
