/// Ray primitives for picking and occlusion tests.

use glam::{Mat4, Vec3};
use crate::scene::BoundingSphere;

/// Ray with a normalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction: direction.normalize_or_zero() }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Ray moved into the space of `world`'s inverse.
    ///
    /// The direction is left unnormalized so distances along the local ray
    /// match world distances.
    pub fn to_local(&self, world: &Mat4) -> Ray {
        let inverse = world.inverse();
        Ray {
            origin: inverse.transform_point3(self.origin),
            direction: inverse.transform_vector3(self.direction),
        }
    }

    /// True if the ray starts inside or hits the sphere in front of its origin
    pub fn intersects_sphere(&self, sphere: &BoundingSphere) -> bool {
        let oc = self.origin - sphere.center;
        let c = oc.length_squared() - sphere.radius * sphere.radius;
        if c <= 0.0 {
            return true;
        }
        let b = oc.dot(self.direction);
        if b > 0.0 {
            return false;
        }
        b * b - self.direction.length_squared() * c >= 0.0
    }
}

/// Triangle in the ray's space
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { v0, v1, v2 }
    }

    /// Möller–Trumbore intersection, double sided. Returns the ray parameter `t >= 0`.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        const EPSILON: f32 = 1e-7;

        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        let h = ray.direction.cross(edge2);
        let a = edge1.dot(h);
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        (t >= 0.0).then_some(t)
    }
}

#[cfg(test)]
#[path = "ray_tests.rs"]
mod tests;
