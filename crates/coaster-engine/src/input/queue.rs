/// Host input the session understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A click/tap at canvas pixel coordinates (x, y), y down.
    PointerDown { x: f64, y: f64 },
    /// Put the ball back at the spawn point and run again.
    Restart,
    /// Rebuild the rail from the current expression.
    Rebuild,
}

/// A queue of input events.
/// The host pushes events between frames; the session drains them each tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(8),
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
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::Restart);
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events[1], InputEvent::Restart);
        assert!(q.is_empty());
    }
}
