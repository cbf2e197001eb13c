/// Input events the sky view understands, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began.
    PointerDown { id: i32, x: f32, y: f32 },
    /// A touch/cursor moved.
    PointerMove { id: i32, x: f32, y: f32 },
    /// A touch/click ended.
    PointerUp { id: i32, x: f32, y: f32 },
    /// The pointer was lost (capture released, touch cancelled).
    PointerCancel { id: i32 },
    /// The viewport changed size.
    Resize { width: f32, height: f32 },
}

/// A queue of input events.
/// The host pushes events as they arrive; the view drains them each tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Drop everything pending.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { id: 1, x: 10.0, y: 20.0 });
        q.push(InputEvent::Resize { width: 800.0, height: 600.0 });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn events_keep_arrival_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { id: 3, x: 0.0, y: 0.0 });
        q.push(InputEvent::PointerMove { id: 3, x: 5.0, y: 0.0 });
        q.push(InputEvent::PointerCancel { id: 3 });
        let events = q.drain();
        let ids: Vec<i32> = events
            .iter()
            .map(|e| match *e {
                InputEvent::PointerDown { id, .. }
                | InputEvent::PointerMove { id, .. }
                | InputEvent::PointerUp { id, .. }
                | InputEvent::PointerCancel { id } => id,
                InputEvent::Resize { .. } => -1,
            })
            .collect();
        assert_eq!(ids, vec![3, 3, 3]);
        assert!(matches!(events[2], InputEvent::PointerCancel { id: 3 }));
    }

    #[test]
    fn clear_discards_pending() {
        let mut q = InputQueue::default();
        q.push(InputEvent::PointerUp { id: 0, x: 1.0, y: 1.0 });
        q.clear();
        assert!(q.is_empty());
    }
}
