//! Camera module - passive view description read by culling and picking.
//!
//! The engine does NOT drive cameras. The host's camera controls own them
//! and hand a snapshot to each frame.

mod view_camera;

pub use view_camera::{Projection, ViewCamera};
