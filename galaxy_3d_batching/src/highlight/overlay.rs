/// SelectionOverlay: highlight geometry drawn on top of one source mesh.
///
/// The overlay draws its parent's position buffer (shared, not copied)
/// with its own index buffer holding only the source mesh's triangles.
/// For a batched mesh the parent is the merged batch and the indices are
/// the mesh's range; for an unbatched mesh the parent is the mesh itself.

use crate::error::Result;
use crate::resource::Geometry;
use crate::scene::{RenderableBody, RenderableKey, Scene};
use crate::{engine_bail, engine_err};

#[derive(Debug, Clone)]
pub struct SelectionOverlay {
    parent: RenderableKey,
    source_mesh: RenderableKey,
    geometry: Geometry,
}

impl SelectionOverlay {
    /// Build the overlay for a source mesh in its current batching state
    pub fn for_mesh(scene: &Scene, mesh_key: RenderableKey) -> Result<Self> {
        let renderable = scene.renderable(mesh_key)
            .ok_or_else(|| engine_err!("galaxy3d::SelectionOverlay", "Mesh {:?} not found", mesh_key))?;
        let RenderableBody::Mesh(mesh) = renderable.body() else {
            engine_bail!("galaxy3d::SelectionOverlay", "Renderable '{}' is not a source mesh", renderable.name());
        };

        let (parent, parent_geometry, start, count, bounding_box) = match mesh.membership() {
            Some(membership) => {
                let batch = scene.batch(membership.batch)
                    .ok_or_else(|| engine_err!("galaxy3d::SelectionOverlay", "Batch {:?} not found", membership.batch))?;
                let range = batch.ranges().get(membership.range_index)
                    .ok_or_else(|| engine_err!("galaxy3d::SelectionOverlay",
                        "Range {} out of bounds in batch {:?}", membership.range_index, membership.batch))?;
                (membership.batch, batch.geometry(), range.index_start, range.index_count, range.world_bounding_box)
            }
            None => {
                let geometry = mesh.geometry();
                (mesh_key, geometry, 0, geometry.index_count(), *geometry.bounding_box())
            }
        };

        let source = parent_geometry.indices()
            .ok_or_else(|| engine_err!("galaxy3d::SelectionOverlay", InvalidGeometry =>
                "Renderable '{}' has no index buffer", renderable.name()))?;

        let start = start as usize;
        let count = count as usize;
        let indices = source.slice(start, count)?;

        Ok(Self {
            parent,
            source_mesh: mesh_key,
            geometry: Geometry::with_shared_positions(parent_geometry.shared_positions().clone(), indices, bounding_box),
        })
    }

    /// Renderable whose transform and positions the overlay uses
    pub fn parent(&self) -> RenderableKey {
        self.parent
    }

    /// Highlighted source mesh
    pub fn source_mesh(&self) -> RenderableKey {
        self.source_mesh
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn triangle_count(&self) -> u32 {
        self.geometry.triangle_count()
    }
}
