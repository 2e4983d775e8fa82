/// ViewCamera - passive description of the viewer.
///
/// The host's camera controls own and drive the camera; this type only
/// carries what culling and picking read: eye position, view matrix,
/// projection parameters and viewport size in pixels.

use glam::{Mat4, Vec2, Vec3};
use crate::picking::Ray;

/// Projection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view, radians
        fov_y: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCamera {
    position: Vec3,
    view_matrix: Mat4,
    projection: Projection,
    viewport_width: f32,
    viewport_height: f32,
}

impl ViewCamera {
    /// Create a camera from a view matrix (world -> view).
    pub fn new(view_matrix: Mat4, projection: Projection, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: view_matrix.inverse().transform_point3(Vec3::ZERO),
            view_matrix,
            projection,
            viewport_width,
            viewport_height,
        }
    }

    /// Right-handed look-at camera
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3, projection: Projection, viewport_width: f32, viewport_height: f32) -> Self {
        Self::new(Mat4::look_at_rh(eye, target, up), projection, viewport_width, viewport_height)
    }

    // ===== GETTERS =====

    /// Eye position in world space
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.viewport_height > 0.0 {
            self.viewport_width / self.viewport_height
        } else {
            1.0
        }
    }

    /// Projection matrix (depth range 0..1)
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective { fov_y, near, far } => {
                Mat4::perspective_rh(fov_y, self.aspect_ratio(), near, far)
            }
            Projection::Orthographic { left, right, bottom, top, near, far } => {
                Mat4::orthographic_rh(left, right, bottom, top, near, far)
            }
        }
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix
    }

    // ===== SETTERS =====

    pub fn set_view(&mut self, view_matrix: Mat4) {
        self.view_matrix = view_matrix;
        self.position = view_matrix.inverse().transform_point3(Vec3::ZERO);
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    // ===== RAYS =====

    /// World-space ray through a pixel (origin top-left), starting on the near plane
    pub fn ray_through(&self, screen: Vec2) -> Ray {
        let ndc_x = 2.0 * screen.x / self.viewport_width.max(1.0) - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / self.viewport_height.max(1.0);
        let inverse = self.view_projection_matrix().inverse();
        let near = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        Ray::new(near, far - near)
    }
}

#[cfg(test)]
#[path = "view_camera_tests.rs"]
mod tests;
