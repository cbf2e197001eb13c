//! Pointer interaction: hover and click resolution, drag-to-pan and the
//! reset animation.

pub mod hit_test;
pub mod pointer;
pub mod reset;

pub use hit_test::{ClickTarget, HitRadii, HoverTarget};
pub use pointer::{PointerAction, PointerMachine, PointerState};
pub use reset::{ResetAnimation, TimeOffsetEasing};
