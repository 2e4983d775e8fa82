/// Screen-space size of a bounding sphere.
///
/// Perspective: `radius / (2 * distance * tan(fov_y / 2)) * viewport_height`.
/// Orthographic: `radius / (top - bottom) * viewport_height`.
/// A sphere at (or behind) the eye projects to infinity.

use glam::Vec3;
use crate::camera::{Projection, ViewCamera};

pub fn projected_radius_px(camera: &ViewCamera, center: Vec3, radius: f32) -> f32 {
    let height = camera.viewport_height();
    match *camera.projection() {
        Projection::Perspective { fov_y, .. } => {
            let distance = camera.position().distance(center);
            let denominator = 2.0 * distance * (fov_y * 0.5).tan();
            if denominator <= f32::EPSILON {
                f32::INFINITY
            } else {
                radius / denominator * height
            }
        }
        Projection::Orthographic { top, bottom, .. } => {
            let extent = top - bottom;
            if extent.abs() <= f32::EPSILON {
                f32::INFINITY
            } else {
                radius / extent * height
            }
        }
    }
}

#[cfg(test)]
#[path = "projection_tests.rs"]
mod tests;
