//! Scene module
//!
//! Renderable arena, bounds and per-model bookkeeping shared by the
//! batching, picking, highlight and culling subsystems.

mod bounds;
mod renderable;
mod scene;

pub use bounds::{AABB, BoundingSphere};
pub use renderable::{
    BatchMembership, Material, MaterialKey, MaterialSlot, ModelKey,
    Renderable, RenderableBody, RenderableClass, RenderableKey, SourceMesh,
};
pub use scene::{MeshDesc, Model, ModelDesc, Scene};
