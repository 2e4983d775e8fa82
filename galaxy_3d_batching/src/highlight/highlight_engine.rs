/// HighlightEngine: owner of every live selection overlay.
///
/// Overlays are inserted into the scene arena so the host draws them like
/// any other renderable, but only this engine creates or disposes them.
/// Batching rebuilds invalidate overlay parents, so the owner clears all
/// highlights before touching batches.

use crate::error::Result;
use crate::scene::{RenderableKey, Scene};
use crate::engine_debug;
use super::overlay::SelectionOverlay;

#[derive(Debug, Default)]
pub struct HighlightEngine {
    /// (source mesh, overlay renderable), in highlight order
    overlays: Vec<(RenderableKey, RenderableKey)>,
}

impl HighlightEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highlight one more mesh. Returns the overlay key (existing one if already highlighted).
    pub fn add_highlight(&mut self, scene: &mut Scene, mesh: RenderableKey) -> Result<RenderableKey> {
        if let Some(existing) = self.overlay_for(mesh) {
            return Ok(existing);
        }
        let overlay = SelectionOverlay::for_mesh(scene, mesh)?;
        self.insert(scene, overlay)
    }

    /// Replace the highlight set. Nothing changes if any overlay fails to build.
    pub fn set_highlight(&mut self, scene: &mut Scene, meshes: &[RenderableKey]) -> Result<usize> {
        let mut built = Vec::with_capacity(meshes.len());
        for mesh in meshes {
            if built.iter().any(|o: &SelectionOverlay| o.source_mesh() == *mesh) {
                continue;
            }
            built.push(SelectionOverlay::for_mesh(scene, *mesh)?);
        }

        self.clear(scene);
        for overlay in built {
            self.insert(scene, overlay)?;
        }
        Ok(self.overlays.len())
    }

    /// Highlight every source mesh whose name contains `query` (case-insensitive).
    ///
    /// An empty query clears the highlight.
    pub fn highlight_search(&mut self, scene: &mut Scene, query: &str) -> Result<usize> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            self.clear(scene);
            return Ok(0);
        }

        let matches: Vec<RenderableKey> = scene.model_keys()
            .filter_map(|model| scene.model(model))
            .flat_map(|model| model.meshes().iter().copied())
            .filter(|key| {
                scene.renderable(*key)
                    .map_or(false, |r| r.name().to_lowercase().contains(&query))
            })
            .collect();

        let count = self.set_highlight(scene, &matches)?;
        engine_debug!("galaxy3d::HighlightEngine", "Search '{}' highlighted {} meshes", query, count);
        Ok(count)
    }

    /// Dispose every overlay
    pub fn clear(&mut self, scene: &mut Scene) {
        for (_, overlay) in self.overlays.drain(..) {
            scene.remove_overlay(overlay);
        }
    }

    pub fn highlighted_count(&self) -> usize {
        self.overlays.len()
    }

    /// Highlighted source meshes, in highlight order
    pub fn highlighted_meshes(&self) -> impl Iterator<Item = RenderableKey> + '_ {
        self.overlays.iter().map(|(mesh, _)| *mesh)
    }

    pub fn overlay_for(&self, mesh: RenderableKey) -> Option<RenderableKey> {
        self.overlays.iter().find(|(m, _)| *m == mesh).map(|(_, overlay)| *overlay)
    }

    fn insert(&mut self, scene: &mut Scene, overlay: SelectionOverlay) -> Result<RenderableKey> {
        let mesh = overlay.source_mesh();
        let name = scene.renderable(mesh)
            .map(|r| format!("{}_highlight", r.name()))
            .unwrap_or_else(|| "highlight".to_string());
        let key = scene.insert_overlay(name, overlay)?;
        self.overlays.push((mesh, key));
        Ok(key)
    }
}

#[cfg(test)]
#[path = "highlight_engine_tests.rs"]
mod tests;
