//! Interaction-driven visibility culling
//!
//! Screen-size and occlusion classifiers behind one budgeted, round-robin
//! driver with per-entry hysteresis.

mod classifier;
mod hysteresis;
mod incremental;
mod projection;

pub use classifier::{CullClassifier, OcclusionClassifier, ScreenSizeClassifier, VisibilityEntry};
pub use hysteresis::CullState;
pub use incremental::{CullFlips, IncrementalCuller};
pub use projection::projected_radius_px;

pub type ScreenSizeCuller = IncrementalCuller<ScreenSizeClassifier>;
pub type OcclusionCuller = IncrementalCuller<OcclusionClassifier>;
