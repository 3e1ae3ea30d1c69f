/// Input events the journey reacts to.
/// The host pushes them as they happen; the session drains them at the
/// start of the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Absolute scroll offset of the page, in pixels.
    Scroll { offset: f32 },
    /// The render surface changed size (CSS pixels).
    Resize { width: f32, height: f32 },
    /// A click inside the render surface, in surface pixels.
    Click { x: f32, y: f32 },
}

/// A queue of input events.
/// JS writes events into the queue; Rust reads and drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Latest scroll offset still pending, if any. Earlier scroll events
    /// in the same frame are superseded by it.
    pub fn latest_scroll(&self) -> Option<f32> {
        self.events.iter().rev().find_map(|e| match e {
            InputEvent::Scroll { offset } => Some(*offset),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
