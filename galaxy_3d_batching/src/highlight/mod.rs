//! Highlighting
//!
//! Selection and search overlays sliced out of batch ranges.

mod highlight_engine;
mod overlay;

pub use highlight_engine::HighlightEngine;
pub use overlay::SelectionOverlay;
