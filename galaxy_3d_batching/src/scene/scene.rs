/// Scene - arena of renderables with typed per-model sub-lists.
///
/// Uses SlotMaps for O(1) insert/remove with stable keys. Each model keeps
/// its source meshes (load order) and its current merged batches as plain
/// key lists, maintained on every attach/detach so no query has to walk
/// the whole arena to recover "all meshes of a model" or "all batches".

use glam::Mat4;
use slotmap::SlotMap;
use crate::batch::MergedBatch;
use crate::error::Result;
use crate::highlight::SelectionOverlay;
use crate::resource::{Geometry, GeometryDesc};
use crate::{engine_bail, engine_err, engine_info};
use super::renderable::{
    BatchMembership, Material, MaterialKey, MaterialSlot, ModelKey,
    Renderable, RenderableBody, RenderableClass, RenderableKey, SourceMesh,
};

// ===== MODEL =====

/// A loaded model (scene root)
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    /// Source meshes in load order
    meshes: Vec<RenderableKey>,
    /// Merged batches currently standing in for some of `meshes`
    batches: Vec<RenderableKey>,
}

impl Model {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meshes(&self) -> &[RenderableKey] {
        &self.meshes
    }

    pub fn batches(&self) -> &[RenderableKey] {
        &self.batches
    }

    pub fn is_batched(&self) -> bool {
        !self.batches.is_empty()
    }
}

// ===== DESCRIPTORS =====

/// Descriptor for one source mesh of a model
#[derive(Debug, Clone)]
pub struct MeshDesc {
    pub name: String,
    pub geometry: GeometryDesc,
    pub material: MaterialSlot,
    /// World transform, pre-computed by the scene-graph collaborator
    pub world_matrix: Mat4,
}

/// Descriptor for a model
#[derive(Debug, Clone)]
pub struct ModelDesc {
    pub name: String,
    pub meshes: Vec<MeshDesc>,
}

// ===== SCENE =====

/// Owner of every renderable, material and model
#[derive(Default)]
pub struct Scene {
    renderables: SlotMap<RenderableKey, Renderable>,
    materials: SlotMap<MaterialKey, Material>,
    models: SlotMap<ModelKey, Model>,
    /// Live overlays, in creation order
    overlays: Vec<RenderableKey>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== MATERIALS =====

    pub fn add_material(&mut self, name: &str) -> MaterialKey {
        self.materials.insert(Material { name: name.to_string() })
    }

    pub fn material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key)
    }

    // ===== MODELS =====

    /// Create every mesh of a model. Nothing is inserted if any mesh is invalid.
    pub fn add_model(&mut self, desc: ModelDesc) -> Result<ModelKey> {
        let mut prepared = Vec::with_capacity(desc.meshes.len());
        for mesh_desc in desc.meshes {
            if let Some(missing) = mesh_desc.material.keys().iter().find(|k| !self.materials.contains_key(**k)) {
                engine_bail!("galaxy3d::Scene", "Mesh '{}' references unknown material {:?}", mesh_desc.name, missing);
            }
            let geometry = Geometry::from_desc(mesh_desc.geometry)
                .map_err(|e| engine_err!("galaxy3d::Scene", InvalidGeometry => "Mesh '{}': {}", mesh_desc.name, e))?;
            prepared.push((mesh_desc.name, SourceMesh::new(geometry, mesh_desc.material, mesh_desc.world_matrix)));
        }

        let model_key = self.models.insert(Model {
            name: desc.name,
            meshes: Vec::with_capacity(prepared.len()),
            batches: Vec::new(),
        });

        let mut keys = Vec::with_capacity(prepared.len());
        for (name, mesh) in prepared {
            keys.push(self.renderables.insert(Renderable::new(
                name, Some(model_key), RenderableClass::Unbatched, RenderableBody::Mesh(mesh),
            )));
        }

        if let Some(model) = self.models.get_mut(model_key) {
            engine_info!("galaxy3d::Scene", "Model '{}' added with {} meshes", model.name, keys.len());
            model.meshes = keys;
        }
        Ok(model_key)
    }

    /// Remove a model with its meshes and batches.
    ///
    /// Overlays parented to them must be released first (see `HighlightEngine::clear`).
    pub fn remove_model(&mut self, key: ModelKey) -> bool {
        let Some(model) = self.models.remove(key) else {
            return false;
        };
        for renderable_key in model.meshes.iter().chain(model.batches.iter()) {
            self.renderables.remove(*renderable_key);
        }
        true
    }

    pub fn model(&self, key: ModelKey) -> Option<&Model> {
        self.models.get(key)
    }

    pub fn model_keys(&self) -> impl Iterator<Item = ModelKey> + '_ {
        self.models.keys()
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    // ===== RENDERABLES =====

    pub fn renderable(&self, key: RenderableKey) -> Option<&Renderable> {
        self.renderables.get(key)
    }

    /// Source mesh behind `key`, if it is one
    pub fn mesh(&self, key: RenderableKey) -> Option<&SourceMesh> {
        self.renderables.get(key).and_then(Renderable::as_mesh)
    }

    /// Merged batch behind `key`, if it is one
    pub fn batch(&self, key: RenderableKey) -> Option<&MergedBatch> {
        self.renderables.get(key).and_then(Renderable::as_batch)
    }

    pub fn render_instances(&self) -> impl Iterator<Item = (RenderableKey, &Renderable)> {
        self.renderables.iter()
    }

    pub fn renderable_count(&self) -> usize {
        self.renderables.len()
    }

    /// Renderables tested by picks and occlusion rays
    pub fn pick_targets(&self) -> impl Iterator<Item = (RenderableKey, &Renderable)> {
        self.renderables.iter().filter(|(_, r)| r.class().is_pick_target())
    }

    /// Set the visibility flag. Returns false if the key is invalid.
    ///
    /// Overlays parented to `key` follow it.
    pub fn set_visible(&mut self, key: RenderableKey, visible: bool) -> bool {
        match self.renderables.get_mut(key) {
            Some(renderable) => renderable.set_visible(visible),
            None => return false,
        }
        for overlay_key in &self.overlays {
            if let Some(overlay) = self.renderables.get_mut(*overlay_key) {
                if overlay.as_overlay().map(|o| o.parent()) == Some(key) {
                    overlay.set_visible(visible);
                }
            }
        }
        true
    }

    /// World transform; overlays inherit their parent's.
    pub fn world_matrix(&self, key: RenderableKey) -> Option<Mat4> {
        match self.renderables.get(key)?.body() {
            RenderableBody::Mesh(mesh) => Some(*mesh.world_matrix()),
            RenderableBody::Batch(_) => Some(Mat4::IDENTITY),
            RenderableBody::Overlay(overlay) => self.world_matrix(overlay.parent()),
        }
    }

    /// Renderables currently drawn for a model: its batches plus its unbatched meshes
    pub fn attached_renderables(&self, key: ModelKey) -> Vec<RenderableKey> {
        let Some(model) = self.models.get(key) else {
            return Vec::new();
        };
        let unbatched = model.meshes.iter().copied().filter(|k| {
            self.renderables.get(*k).map_or(false, |r| r.class() == RenderableClass::Unbatched)
        });
        model.batches.iter().copied().chain(unbatched).collect()
    }

    /// Number of draw calls the current state issues
    pub fn draw_call_count(&self) -> usize {
        self.renderables.values()
            .filter(|r| r.is_visible() && r.class() != RenderableClass::BatchedOriginalHidden)
            .count()
    }

    // ===== BATCHES =====

    /// Insert merged batches for a model and hide the meshes they cover.
    ///
    /// Every range must reference an unbatched mesh of the same model.
    pub(crate) fn attach_batches(&mut self, model_key: ModelKey, batches: Vec<MergedBatch>) -> Result<Vec<RenderableKey>> {
        let model_meshes = self.models.get(model_key)
            .ok_or_else(|| engine_err!("galaxy3d::Scene", "Model {:?} not found", model_key))?
            .meshes.clone();

        for batch in &batches {
            for range in batch.ranges() {
                let valid = model_meshes.contains(&range.source)
                    && self.renderables.get(range.source)
                        .map_or(false, |r| r.class() == RenderableClass::Unbatched);
                if !valid {
                    engine_bail!("galaxy3d::Scene", "Range source {:?} is not an unbatched mesh of model {:?}",
                        range.source, model_key);
                }
            }
        }

        let mut keys = Vec::with_capacity(batches.len());
        for (ordinal, batch) in batches.into_iter().enumerate() {
            let sources: Vec<RenderableKey> = batch.ranges().iter().map(|r| r.source).collect();
            let name = format!("batch_{}", ordinal);
            let batch_key = self.renderables.insert(Renderable::new(
                name, Some(model_key), RenderableClass::MergedBatch, RenderableBody::Batch(batch),
            ));

            for (range_index, source) in sources.into_iter().enumerate() {
                if let Some(renderable) = self.renderables.get_mut(source) {
                    renderable.set_class(RenderableClass::BatchedOriginalHidden);
                    renderable.set_visible(false);
                    if let Some(mesh) = renderable.as_mesh_mut() {
                        mesh.set_membership(Some(BatchMembership { batch: batch_key, range_index }));
                    }
                }
            }
            keys.push(batch_key);
        }

        if let Some(model) = self.models.get_mut(model_key) {
            model.batches.extend_from_slice(&keys);
        }
        Ok(keys)
    }

    /// Dispose a model's batches and restore its meshes. Returns the number disposed.
    pub(crate) fn detach_batches(&mut self, model_key: ModelKey) -> usize {
        let Some(model) = self.models.get_mut(model_key) else {
            return 0;
        };
        let batches = std::mem::take(&mut model.batches);
        let meshes = model.meshes.clone();

        for key in &batches {
            self.renderables.remove(*key);
        }
        for key in meshes {
            if let Some(renderable) = self.renderables.get_mut(key) {
                if renderable.class() == RenderableClass::BatchedOriginalHidden {
                    renderable.set_class(RenderableClass::Unbatched);
                    renderable.set_visible(true);
                }
                if let Some(mesh) = renderable.as_mesh_mut() {
                    mesh.set_membership(None);
                }
            }
        }
        batches.len()
    }

    // ===== OVERLAYS =====

    /// Insert an overlay; its parent must be live. It starts with the parent's visibility.
    pub(crate) fn insert_overlay(&mut self, name: String, overlay: SelectionOverlay) -> Result<RenderableKey> {
        let Some(parent_visible) = self.renderables.get(overlay.parent()).map(|p| p.is_visible()) else {
            engine_bail!("galaxy3d::Scene", "Overlay parent {:?} not found", overlay.parent());
        };
        let mut renderable = Renderable::new(
            name, None, RenderableClass::Overlay, RenderableBody::Overlay(overlay),
        );
        renderable.set_visible(parent_visible);
        let key = self.renderables.insert(renderable);
        self.overlays.push(key);
        Ok(key)
    }

    pub(crate) fn remove_overlay(&mut self, key: RenderableKey) -> bool {
        let is_overlay = self.renderables.get(key)
            .map_or(false, |r| r.class() == RenderableClass::Overlay);
        if !is_overlay {
            return false;
        }
        self.renderables.remove(key);
        self.overlays.retain(|k| *k != key);
        true
    }

    pub fn overlays(&self) -> &[RenderableKey] {
        &self.overlays
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.renderables.clear();
        self.materials.clear();
        self.models.clear();
        self.overlays.clear();
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
