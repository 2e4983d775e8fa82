/// MeshCollector: scans a model for batching-eligible meshes.

use std::fmt;
use crate::engine_trace;
use crate::scene::{ModelKey, Renderable, RenderableClass, RenderableKey, Scene};

/// Why a renderable was left out of batching
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IneligibleReason {
    /// Merged batch or overlay
    NotAMesh,
    NonIndexed,
    MultiMaterial,
    Skinned,
    Morphed,
    /// World bounding diagonal below the configured minimum
    TooSmall { diagonal: f32, minimum: f32 },
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IneligibleReason::NotAMesh => write!(f, "not a source mesh"),
            IneligibleReason::NonIndexed => write!(f, "non-indexed geometry"),
            IneligibleReason::MultiMaterial => write!(f, "multiple materials"),
            IneligibleReason::Skinned => write!(f, "skinned"),
            IneligibleReason::Morphed => write!(f, "has morph targets"),
            IneligibleReason::TooSmall { diagonal, minimum } => {
                write!(f, "bounding diagonal {} below minimum {}", diagonal, minimum)
            }
        }
    }
}

/// Read-only filter over a model's meshes
#[derive(Debug, Clone, Copy)]
pub struct MeshCollector {
    min_bounding_diagonal: f32,
}

impl MeshCollector {
    pub fn new(min_bounding_diagonal: f32) -> Self {
        Self { min_bounding_diagonal }
    }

    pub fn min_bounding_diagonal(&self) -> f32 {
        self.min_bounding_diagonal
    }

    /// Check a single renderable.
    ///
    /// Meshes currently hidden behind a batch stay eligible so a new batch
    /// set can be built before the old one is detached.
    pub fn eligibility(&self, renderable: &Renderable) -> Result<(), IneligibleReason> {
        if !matches!(renderable.class(), RenderableClass::Unbatched | RenderableClass::BatchedOriginalHidden) {
            return Err(IneligibleReason::NotAMesh);
        }
        let mesh = renderable.as_mesh().ok_or(IneligibleReason::NotAMesh)?;
        let geometry = mesh.geometry();

        if !geometry.is_indexed() {
            return Err(IneligibleReason::NonIndexed);
        }
        if mesh.material().single().is_none() {
            return Err(IneligibleReason::MultiMaterial);
        }
        if geometry.is_skinned() {
            return Err(IneligibleReason::Skinned);
        }
        if geometry.morph_target_count() > 0 {
            return Err(IneligibleReason::Morphed);
        }
        let diagonal = mesh.world_bounding_box().diagonal();
        if diagonal < self.min_bounding_diagonal {
            return Err(IneligibleReason::TooSmall { diagonal, minimum: self.min_bounding_diagonal });
        }
        Ok(())
    }

    /// Eligible meshes of `model`, in load order
    pub fn collect(&self, scene: &Scene, model: ModelKey) -> Vec<RenderableKey> {
        let Some(model) = scene.model(model) else {
            return Vec::new();
        };

        model.meshes().iter().copied()
            .filter(|key| {
                let Some(renderable) = scene.renderable(*key) else {
                    return false;
                };
                match self.eligibility(renderable) {
                    Ok(()) => true,
                    Err(reason) => {
                        engine_trace!("galaxy3d::MeshCollector",
                            "Skipping '{}': {}", renderable.name(), reason);
                        false
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "collector_tests.rs"]
mod tests;
