//! Pointer state machine: hover, press, drag-to-pan and click.
//!
//! ```text
//! Idle ──move──▶ Hovering ──down──▶ Dragging ──up──▶ Hovering
//!   ▲                                   │
//!   └───────────── cancel ──────────────┘
//! ```
//!
//! A press only becomes a drag once the pointer travels past the threshold;
//! releasing before that is a click.

use glam::Vec2;

use crate::api::config::SkyConfig;
use crate::api::types::GeoLocation;

/// Wrap a longitude into [-180, 180).
pub fn wrap_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// An in-progress press/drag, bound to one pointer id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub pointer_id: i32,
    pub start: Vec2,
    pub start_location: GeoLocation,
    /// Degrees of (latitude, longitude) per pixel of (dy, dx).
    pub deg_per_px: (f64, f64),
    /// Whether the pointer has passed the drag threshold.
    pub moved: bool,
}

impl DragSession {
    /// Location for a pointer at `pos`.
    pub fn location_at(&self, pos: Vec2) -> GeoLocation {
        let d = pos - self.start;
        GeoLocation {
            latitude: (self.start_location.latitude + d.y as f64 * self.deg_per_px.0).clamp(-90.0, 90.0),
            longitude: wrap_longitude(self.start_location.longitude + d.x as f64 * self.deg_per_px.1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerState {
    #[default]
    Idle,
    Hovering {
        pos: Vec2,
    },
    Dragging(DragSession),
}

/// What the view should do in response to a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    /// Event did not concern the active pointer.
    Ignored,
    /// Press started: cancel the reset animation and clear hover.
    Pressed,
    /// Pointer moved freely: re-run hover resolution at this point.
    Hover(Vec2),
    /// Dragged past the threshold: move the observer.
    Pan {
        location: GeoLocation,
        /// True the first time any drag in this view passes the threshold.
        first_drag: bool,
    },
    /// Released without dragging.
    Click(Vec2),
    /// A drag finished (or was cancelled).
    Released,
}

#[derive(Debug, Clone)]
pub struct PointerMachine {
    state: PointerState,
    threshold_px: f32,
    drag_scale: f64,
    dragged_once: bool,
}

impl PointerMachine {
    pub fn new(threshold_px: f32, drag_scale: f64) -> Self {
        Self {
            state: PointerState::Idle,
            threshold_px,
            drag_scale,
            dragged_once: false,
        }
    }

    pub fn from_config(config: &SkyConfig) -> Self {
        Self::new(config.drag_threshold_px, config.drag_scale)
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, PointerState::Dragging(_))
    }

    /// Last free-hover position, if the pointer is hovering.
    pub fn hover_pos(&self) -> Option<Vec2> {
        match self.state {
            PointerState::Hovering { pos } => Some(pos),
            _ => None,
        }
    }

    /// Begin a press. `from` is the location the drag starts from.
    pub fn down(&mut self, pointer_id: i32, pos: Vec2, from: GeoLocation, width: f32, height: f32) -> PointerAction {
        if self.is_dragging() {
            return PointerAction::Ignored;
        }
        let per_px = |span: f64, extent: f32| if extent > 0.0 { span / extent as f64 * self.drag_scale } else { 0.0 };
        self.state = PointerState::Dragging(DragSession {
            pointer_id,
            start: pos,
            start_location: from,
            deg_per_px: (per_px(180.0, height), per_px(360.0, width)),
            moved: false,
        });
        PointerAction::Pressed
    }

    pub fn move_to(&mut self, pointer_id: i32, pos: Vec2) -> PointerAction {
        match &mut self.state {
            PointerState::Dragging(session) => {
                if session.pointer_id != pointer_id {
                    return PointerAction::Ignored;
                }
                if !session.moved {
                    if pos.distance(session.start) <= self.threshold_px {
                        return PointerAction::Ignored;
                    }
                    session.moved = true;
                }
                let first_drag = !self.dragged_once;
                self.dragged_once = true;
                PointerAction::Pan {
                    location: session.location_at(pos),
                    first_drag,
                }
            }
            state => {
                *state = PointerState::Hovering { pos };
                PointerAction::Hover(pos)
            }
        }
    }

    pub fn up(&mut self, pointer_id: i32, pos: Vec2) -> PointerAction {
        let PointerState::Dragging(session) = self.state else {
            return PointerAction::Ignored;
        };
        if session.pointer_id != pointer_id {
            return PointerAction::Ignored;
        }
        self.state = PointerState::Hovering { pos };
        if session.moved {
            PointerAction::Released
        } else {
            PointerAction::Click(pos)
        }
    }

    pub fn cancel(&mut self, pointer_id: i32) -> PointerAction {
        match self.state {
            PointerState::Dragging(session) if session.pointer_id == pointer_id => {
                self.state = PointerState::Idle;
                PointerAction::Released
            }
            _ => PointerAction::Ignored,
        }
    }

    /// Drop any press in progress (viewport changed under it).
    pub fn abort(&mut self) {
        if self.is_dragging() {
            self.state = PointerState::Idle;
        }
    }
}

impl Default for PointerMachine {
    fn default() -> Self {
        Self::from_config(&SkyConfig::default())
    }
}
