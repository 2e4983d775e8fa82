/// Click discrimination and deferred picking.
///
/// A press followed by a release within `threshold_px` counts as a click;
/// anything farther is a drag (camera orbit) and never picks. Accepted
/// clicks are not raycast immediately: the pick runs on the next frame and
/// is dropped if newer input arrives first.

use glam::Vec2;

// ===== CLICK DETECTOR =====

#[derive(Debug, Clone)]
pub struct ClickDetector {
    threshold_px: f32,
    press_position: Option<Vec2>,
}

impl ClickDetector {
    pub fn new(threshold_px: f32) -> Self {
        Self { threshold_px, press_position: None }
    }

    pub fn threshold_px(&self) -> f32 {
        self.threshold_px
    }

    pub fn press(&mut self, position: Vec2) {
        self.press_position = Some(position);
    }

    /// Returns true if the release completes a click
    pub fn release(&mut self, position: Vec2) -> bool {
        match self.press_position.take() {
            Some(pressed) => pressed.distance(position) <= self.threshold_px,
            None => false,
        }
    }

    pub fn cancel(&mut self) {
        self.press_position = None;
    }

    pub fn is_pressed(&self) -> bool {
        self.press_position.is_some()
    }
}

// ===== PICK SCHEDULER =====

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingPick {
    position: Vec2,
    requested_frame: u64,
}

/// One pending pick, run one frame after it was requested
#[derive(Debug, Clone, Default)]
pub struct PickScheduler {
    pending: Option<PendingPick>,
}

impl PickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a pick at `position`; replaces any pending request
    pub fn schedule(&mut self, position: Vec2, frame: u64) {
        self.pending = Some(PendingPick { position, requested_frame: frame });
    }

    /// Drop the pending pick (newer input arrived)
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Position to pick on `frame`, once a later frame than the request
    pub fn poll(&mut self, frame: u64) -> Option<Vec2> {
        let pending = self.pending?;
        if frame > pending.requested_frame {
            self.pending = None;
            Some(pending.position)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "click_tests.rs"]
mod tests;
