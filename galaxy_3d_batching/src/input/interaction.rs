/// InteractionTracker: decides when interaction culling runs.
///
/// Interaction is active while any pointer button is held, and for an idle
/// window after the last wheel event. The tracker reports the edge where
/// interaction ends so the owner can restore every hidden entry.

use std::time::{Duration, Instant};
use super::pointer::PointerEvent;

#[derive(Debug, Clone)]
pub struct InteractionTracker {
    idle_window: Duration,
    buttons_held: u32,
    last_wheel: Option<Instant>,
    was_interacting: bool,
}

/// Change of interaction state observed by `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEdge {
    Started,
    Ended,
    Unchanged,
}

impl InteractionTracker {
    pub fn new(idle_window: Duration) -> Self {
        Self { idle_window, buttons_held: 0, last_wheel: None, was_interacting: false }
    }

    pub fn idle_window(&self) -> Duration {
        self.idle_window
    }

    /// Record one pointer event observed at `now`
    pub fn observe(&mut self, event: &PointerEvent, now: Instant) {
        match event {
            PointerEvent::Pressed { .. } => self.buttons_held += 1,
            PointerEvent::Released { .. } => self.buttons_held = self.buttons_held.saturating_sub(1),
            PointerEvent::Left => self.buttons_held = 0,
            PointerEvent::Wheel { .. } => self.last_wheel = Some(now),
            PointerEvent::Moved { .. } => {}
        }
    }

    pub fn is_pointer_down(&self) -> bool {
        self.buttons_held > 0
    }

    /// True while a button is held or the wheel idle window is open
    pub fn is_interacting(&self, now: Instant) -> bool {
        if self.is_pointer_down() {
            return true;
        }
        match self.last_wheel {
            Some(last) => now.saturating_duration_since(last) < self.idle_window,
            None => false,
        }
    }

    /// Sample the state once per frame and report its edge
    pub fn update(&mut self, now: Instant) -> InteractionEdge {
        let interacting = self.is_interacting(now);
        let edge = match (self.was_interacting, interacting) {
            (false, true) => InteractionEdge::Started,
            (true, false) => InteractionEdge::Ended,
            _ => InteractionEdge::Unchanged,
        };
        self.was_interacting = interacting;
        edge
    }

    pub fn reset(&mut self) {
        self.buttons_held = 0;
        self.last_wheel = None;
        self.was_interacting = false;
    }
}

#[cfg(test)]
#[path = "interaction_tests.rs"]
mod tests;
