/// Renderable types stored in the Scene arena.
///
/// Every renderable carries exactly one `RenderableClass`, stored once and
/// updated by the Scene when batching is attached or detached. Queries such
/// as "all pick targets" read the class instead of tagging objects.

use glam::Mat4;
use slotmap::new_key_type;
use crate::batch::MergedBatch;
use crate::highlight::SelectionOverlay;
use crate::resource::Geometry;
use super::bounds::{AABB, BoundingSphere};

// ===== SLOT MAP KEYS =====

new_key_type! {
    /// Stable key for a Renderable within a Scene.
    pub struct RenderableKey;

    /// Stable key for a Material; doubles as the material identity for batching.
    pub struct MaterialKey;

    /// Stable key for a loaded Model (a scene root).
    pub struct ModelKey;
}

// ===== CLASSIFICATION =====

/// What a renderable is and how it participates in drawing and picking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderableClass {
    /// Source mesh drawn on its own
    Unbatched,
    /// Source mesh covered by a merged batch: hidden, still addressable by key
    BatchedOriginalHidden,
    /// Merged geometry standing in for several source meshes
    MergedBatch,
    /// Selection / search highlight geometry parented to another renderable
    Overlay,
}

impl RenderableClass {
    /// Classes tested by ray picks and occlusion rays
    pub fn is_pick_target(&self) -> bool {
        matches!(self, RenderableClass::Unbatched | RenderableClass::MergedBatch)
    }
}

// ===== MATERIAL =====

/// Material record. Only its identity matters to the batching core.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
}

/// Material assignment of a source mesh
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialSlot {
    Single(MaterialKey),
    /// Multi-material meshes are never batched
    Multi(Vec<MaterialKey>),
}

impl MaterialSlot {
    pub fn single(&self) -> Option<MaterialKey> {
        match self {
            MaterialSlot::Single(key) => Some(*key),
            MaterialSlot::Multi(_) => None,
        }
    }

    pub fn keys(&self) -> &[MaterialKey] {
        match self {
            MaterialSlot::Single(key) => std::slice::from_ref(key),
            MaterialSlot::Multi(keys) => keys,
        }
    }
}

// ===== SOURCE MESH =====

/// Where a batched source mesh lives inside its batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchMembership {
    /// The MergedBatch renderable
    pub batch: RenderableKey,
    /// Index into the batch's range list
    pub range_index: usize,
}

/// A mesh as loaded from the model, with cached world bounds
#[derive(Debug, Clone)]
pub struct SourceMesh {
    geometry: Geometry,
    material: MaterialSlot,
    world_matrix: Mat4,
    world_bounding_box: AABB,
    world_bounding_sphere: BoundingSphere,
    membership: Option<BatchMembership>,
}

impl SourceMesh {
    pub(crate) fn new(geometry: Geometry, material: MaterialSlot, world_matrix: Mat4) -> Self {
        let world_bounding_box = geometry.bounding_box().transformed(&world_matrix);
        let world_bounding_sphere = BoundingSphere::from_points(geometry.positions(), geometry.bounding_box())
            .transformed(&world_matrix);
        Self {
            geometry,
            material,
            world_matrix,
            world_bounding_box,
            world_bounding_sphere,
            membership: None,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn material(&self) -> &MaterialSlot {
        &self.material
    }

    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    /// Local bounding box transformed to world space
    pub fn world_bounding_box(&self) -> &AABB {
        &self.world_bounding_box
    }

    pub fn world_bounding_sphere(&self) -> &BoundingSphere {
        &self.world_bounding_sphere
    }

    /// Batch slot, if this mesh is currently merged
    pub fn membership(&self) -> Option<BatchMembership> {
        self.membership
    }

    pub(crate) fn set_membership(&mut self, membership: Option<BatchMembership>) {
        self.membership = membership;
    }
}

// ===== RENDERABLE =====

/// Payload of a renderable
#[derive(Debug, Clone)]
pub enum RenderableBody {
    Mesh(SourceMesh),
    Batch(MergedBatch),
    Overlay(SelectionOverlay),
}

/// An entry of the Scene arena
#[derive(Debug, Clone)]
pub struct Renderable {
    name: String,
    model: Option<ModelKey>,
    class: RenderableClass,
    visible: bool,
    body: RenderableBody,
}

impl Renderable {
    pub(crate) fn new(name: String, model: Option<ModelKey>, class: RenderableClass, body: RenderableBody) -> Self {
        Self { name, model, class, visible: true, body }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning model (None for overlays)
    pub fn model(&self) -> Option<ModelKey> {
        self.model
    }

    pub fn class(&self) -> RenderableClass {
        self.class
    }

    pub(crate) fn set_class(&mut self, class: RenderableClass) {
        self.class = class;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn body(&self) -> &RenderableBody {
        &self.body
    }

    pub fn as_mesh(&self) -> Option<&SourceMesh> {
        match &self.body {
            RenderableBody::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub(crate) fn as_mesh_mut(&mut self) -> Option<&mut SourceMesh> {
        match &mut self.body {
            RenderableBody::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_batch(&self) -> Option<&MergedBatch> {
        match &self.body {
            RenderableBody::Batch(batch) => Some(batch),
            _ => None,
        }
    }

    pub fn as_overlay(&self) -> Option<&SelectionOverlay> {
        match &self.body {
            RenderableBody::Overlay(overlay) => Some(overlay),
            _ => None,
        }
    }

    /// Geometry drawn by this renderable
    pub fn geometry(&self) -> &Geometry {
        match &self.body {
            RenderableBody::Mesh(mesh) => mesh.geometry(),
            RenderableBody::Batch(batch) => batch.geometry(),
            RenderableBody::Overlay(overlay) => overlay.geometry(),
        }
    }

    /// World bounding sphere; None for overlays (they follow their parent)
    pub fn world_bounding_sphere(&self) -> Option<BoundingSphere> {
        match &self.body {
            RenderableBody::Mesh(mesh) => Some(*mesh.world_bounding_sphere()),
            RenderableBody::Batch(batch) => Some(*batch.bounding_sphere()),
            RenderableBody::Overlay(_) => None,
        }
    }
}
