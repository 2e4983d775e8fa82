/// PickResolver: nearest ray hit across renderables, resolved to a source mesh.
///
/// Every pick target (unbatched meshes and merged batches) is tested in a
/// single pass. Bounding spheres reject whole renderables before any
/// triangle test. Hits on a merged batch go through its face lookup, so the
/// caller always receives the originating source mesh.

use glam::Vec3;
use crate::scene::{Renderable, RenderableBody, RenderableKey, Scene};
use super::ray::{Ray, Triangle};

/// Nearest hit of a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Renderable actually hit (a mesh or a merged batch)
    pub target: RenderableKey,
    /// Source mesh owning the hit triangle
    pub mesh: RenderableKey,
    /// Triangle ordinal within `target`'s geometry
    pub face: u32,
    /// Triangle ordinal within the source mesh
    pub source_face: u32,
    pub distance: f32,
    pub point: Vec3,
}

/// Description of a picked mesh for the host UI
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionInfo {
    pub mesh: RenderableKey,
    pub name: String,
    pub vertex_count: u32,
    pub triangle_count: u32,
}

pub struct PickResolver;

impl PickResolver {
    /// Nearest hit across every pick target
    pub fn pick(scene: &Scene, ray: &Ray) -> Option<PickHit> {
        Self::raycast_excluding(scene, ray, None)
    }

    /// Nearest hit, skipping `exclude`
    pub fn raycast_excluding(scene: &Scene, ray: &Ray, exclude: Option<RenderableKey>) -> Option<PickHit> {
        let mut nearest: Option<(RenderableKey, u32, f32)> = None;

        for (key, renderable) in scene.pick_targets() {
            if Some(key) == exclude {
                continue;
            }
            if let Some((face, distance)) = Self::raycast_renderable(scene, key, renderable, ray) {
                if nearest.map_or(true, |(_, _, best)| distance < best) {
                    nearest = Some((key, face, distance));
                }
            }
        }

        let (target, face, distance) = nearest?;
        let (mesh, source_face) = Self::resolve_face(scene, target, face)?;
        Some(PickHit {
            target,
            mesh,
            face,
            source_face,
            distance,
            point: ray.point_at(distance),
        })
    }

    /// Map a triangle of `target` to its source mesh and source-local face
    pub fn resolve_face(scene: &Scene, target: RenderableKey, face: u32) -> Option<(RenderableKey, u32)> {
        match scene.renderable(target)?.body() {
            RenderableBody::Mesh(_) => Some((target, face)),
            RenderableBody::Batch(batch) => {
                let range = batch.range_for_face(face)?;
                Some((range.source, face - range.first_face()))
            }
            RenderableBody::Overlay(_) => None,
        }
    }

    /// Selection details of a source mesh
    pub fn selection_info(scene: &Scene, mesh: RenderableKey) -> Option<SelectionInfo> {
        let renderable = scene.renderable(mesh)?;
        let source = renderable.as_mesh()?;
        Some(SelectionInfo {
            mesh,
            name: renderable.name().to_string(),
            vertex_count: source.geometry().vertex_count(),
            triangle_count: source.geometry().triangle_count(),
        })
    }

    /// Nearest triangle of one renderable: (face, world distance)
    fn raycast_renderable(scene: &Scene, key: RenderableKey, renderable: &Renderable, ray: &Ray) -> Option<(u32, f32)> {
        let sphere = renderable.world_bounding_sphere()?;
        if !ray.intersects_sphere(&sphere) {
            return None;
        }

        let world = scene.world_matrix(key)?;
        let local = ray.to_local(&world);
        let geometry = renderable.geometry();
        let positions = geometry.positions();

        let mut nearest: Option<(u32, f32)> = None;
        for (face, [a, b, c]) in geometry.triangles() {
            let triangle = Triangle::new(positions[a as usize], positions[b as usize], positions[c as usize]);
            if let Some(t) = triangle.intersect_ray(&local) {
                if nearest.map_or(true, |(_, best)| t < best) {
                    nearest = Some((face, t));
                }
            }
        }
        nearest
    }
}

#[cfg(test)]
#[path = "pick_resolver_tests.rs"]
mod tests;
