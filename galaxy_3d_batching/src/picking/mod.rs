//! Picking
//!
//! Ray casting against renderables with batch-aware reverse mapping, plus
//! click/drag discrimination and one-frame pick deferral.

mod click;
mod pick_resolver;
mod ray;

pub use click::{ClickDetector, PickScheduler};
pub use pick_resolver::{PickHit, PickResolver, SelectionInfo};
pub use ray::{Ray, Triangle};
