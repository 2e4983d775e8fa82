//! Draw-call batching
//!
//! Collects eligible meshes of a model, groups them by material and vertex
//! layout, and merges each group into capped batches that keep a
//! per-source range model for picking and highlighting.

mod builder;
mod collector;
mod group_key;
mod merged_batch;

pub use builder::{BatchBuilder, BatchBuildReport};
pub use collector::{IneligibleReason, MeshCollector};
pub use group_key::{GroupKey, GroupKeyer};
pub use merged_batch::{FaceLookup, MergedBatch, Range};
