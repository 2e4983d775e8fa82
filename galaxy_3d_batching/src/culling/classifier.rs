/// Visibility classifiers.
///
/// A `CullClassifier` answers one question per entry and frame: should it
/// be visible? The incremental driver turns those answers into committed
/// flips through hysteresis, so classifiers stay stateless.

use glam::Vec3;
use crate::camera::ViewCamera;
use crate::picking::{PickResolver, Ray};
use crate::scene::{RenderableKey, Scene};
use super::projection::projected_radius_px;

/// Culling input derived from one attached renderable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEntry {
    /// Renderable drawn for this entry (a source mesh or its merged batch)
    pub target: RenderableKey,
    pub world_center: Vec3,
    pub world_radius: f32,
}

impl VisibilityEntry {
    /// Entry for `target`, from its world bounding sphere
    pub fn for_renderable(scene: &Scene, target: RenderableKey) -> Option<Self> {
        let sphere = scene.renderable(target)?.world_bounding_sphere()?;
        Some(Self { target, world_center: sphere.center, world_radius: sphere.radius })
    }
}

/// Strategy deciding whether an entry should be visible this frame.
pub trait CullClassifier {
    /// Short name for logs
    fn name(&self) -> &'static str;

    fn wants_visible(&self, scene: &Scene, camera: &ViewCamera, entry: &VisibilityEntry) -> bool;
}

/// Hides entries whose projected radius falls below a pixel threshold
#[derive(Debug, Clone, Copy)]
pub struct ScreenSizeClassifier {
    threshold_px: f32,
}

impl ScreenSizeClassifier {
    pub fn new(threshold_px: f32) -> Self {
        Self { threshold_px }
    }

    pub fn threshold_px(&self) -> f32 {
        self.threshold_px
    }
}

impl CullClassifier for ScreenSizeClassifier {
    fn name(&self) -> &'static str {
        "screen-size"
    }

    /// `radius_px >= threshold` stays visible
    fn wants_visible(&self, _scene: &Scene, camera: &ViewCamera, entry: &VisibilityEntry) -> bool {
        projected_radius_px(camera, entry.world_center, entry.world_radius) >= self.threshold_px
    }
}

/// Hides entries whose center is blocked by another pick target
#[derive(Debug, Clone, Copy, Default)]
pub struct OcclusionClassifier;

impl OcclusionClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl CullClassifier for OcclusionClassifier {
    fn name(&self) -> &'static str {
        "occlusion"
    }

    /// Occluded if anything other than the entry is hit before `distance - radius`
    fn wants_visible(&self, scene: &Scene, camera: &ViewCamera, entry: &VisibilityEntry) -> bool {
        let eye = camera.position();
        let distance = eye.distance(entry.world_center);
        if distance <= entry.world_radius {
            return true;
        }
        let ray = Ray::new(eye, entry.world_center - eye);
        match PickResolver::raycast_excluding(scene, &ray, Some(entry.target)) {
            Some(hit) => hit.distance >= distance - entry.world_radius,
            None => true,
        }
    }
}
