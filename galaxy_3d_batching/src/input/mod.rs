//! Pointer input and interaction state

mod interaction;
mod pointer;

pub use interaction::{InteractionEdge, InteractionTracker};
pub use pointer::{PointerEvent, PointerEventTranslator};
