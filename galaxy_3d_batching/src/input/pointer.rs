/// Pointer events consumed by the batching system.
///
/// Hosts either build `PointerEvent`s directly or feed winit window events
/// through a `PointerEventTranslator`, which tracks the cursor position
/// winit only reports on `CursorMoved`.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Pointer input in viewport pixels (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed { position: Vec2, button: MouseButton },
    Released { position: Vec2, button: MouseButton },
    Moved { position: Vec2 },
    /// Wheel or trackpad scroll; vertical delta in lines or pixels
    Wheel { delta: f32 },
    /// Pointer left the viewport
    Left,
}

/// Converts winit window events into pointer events
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerEventTranslator {
    cursor: Vec2,
}

impl PointerEventTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Translate one event; None for events the system ignores
    pub fn translate(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                Some(PointerEvent::Moved { position: self.cursor })
            }
            WindowEvent::MouseInput { state, button, .. } => Some(match state {
                ElementState::Pressed => PointerEvent::Pressed { position: self.cursor, button: *button },
                ElementState::Released => PointerEvent::Released { position: self.cursor, button: *button },
            }),
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32,
                };
                Some(PointerEvent::Wheel { delta })
            }
            WindowEvent::CursorLeft { .. } => Some(PointerEvent::Left),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "pointer_tests.rs"]
mod tests;
