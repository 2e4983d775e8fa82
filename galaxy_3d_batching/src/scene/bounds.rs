/// Bounding volumes: axis-aligned boxes and spheres.
///
/// Boxes are kept in whatever space the owner documents (local for source
/// geometry, world for ranges and batches). An empty box has `min > max`
/// and absorbs nothing when transformed.

use glam::{Mat4, Vec3};

// ===== AABB =====

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl AABB {
    /// Box from explicit corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box containing nothing; the identity for `union`
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Tight box around a set of points (empty if there are none)
    pub fn from_points<'a, I: IntoIterator<Item = &'a Vec3>>(points: I) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.min = aabb.min.min(*p);
            aabb.max = aabb.max.max(*p);
        }
        aabb
    }

    /// True if the box contains no point
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &AABB) -> AABB {
        AABB {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Center point (meaningless for an empty box)
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths
    pub fn size(&self) -> Vec3 {
        if self.is_empty() { Vec3::ZERO } else { self.max - self.min }
    }

    /// Length of the min→max diagonal (0 for an empty box)
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

    /// Transform this AABB by a matrix, returning a new AABB.
    ///
    /// Uses the Arvo method: projects each matrix axis onto the AABB extents
    /// for an exact (tight) result without transforming all 8 corners.
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        if self.is_empty() {
            return *self;
        }

        let translation = matrix.col(3).truncate();
        let mut new_min = translation;
        let mut new_max = translation;

        for i in 0..3 {
            let axis = matrix.col(i).truncate();
            let a = axis * self.min[i];
            let b = axis * self.max[i];
            new_min += a.min(b);
            new_max += a.max(b);
        }

        AABB { min: new_min, max: new_max }
    }
}

// ===== BOUNDING SPHERE =====

/// Bounding sphere used for culling and ray rejection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere centered on the box center, radius = farthest point.
    ///
    /// Tighter than the box's circumscribed sphere for most meshes.
    pub fn from_points(points: &[Vec3], aabb: &AABB) -> Self {
        if points.is_empty() || aabb.is_empty() {
            return Self::new(Vec3::ZERO, 0.0);
        }
        let center = aabb.center();
        let radius_sq = points.iter()
            .map(|p| p.distance_squared(center))
            .fold(0.0f32, f32::max);
        Self::new(center, radius_sq.sqrt())
    }

    /// Transform by a matrix; the radius scales by the largest axis scale.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let max_scale = (0..3)
            .map(|i| matrix.col(i).truncate().length())
            .fold(0.0f32, f32::max);
        Self::new(matrix.transform_point3(self.center), self.radius * max_scale)
    }
}

#[cfg(test)]
#[path = "bounds_tests.rs"]
mod tests;
