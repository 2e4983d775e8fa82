//! Resource-level geometry: indexed triangle lists with optional attributes.
//!
//! The same type backs source meshes and merged batches. Positions are
//! shared behind an `Arc` so selection overlays can draw the parent's
//! vertices with their own index buffer.
//!
//! # Attributes
//!
//! | attribute | type | required |
//! |-----------|------|----------|
//! | position  | Vec3 | yes |
//! | normal    | Vec3 | no |
//! | tangent   | Vec3 or Vec4 (w = handedness) | no |
//! | uv, uv2   | Vec2 | no |
//! | color     | Vec4 | no |

use std::sync::Arc;
use bitflags::bitflags;
use glam::{Vec2, Vec3, Vec4};
use crate::error::Result;
use crate::engine_bail;
use crate::scene::AABB;
use super::index_buffer::IndexBuffer;

// ============================================================================
// ATTRIBUTE SET
// ============================================================================

bitflags! {
    /// Set of vertex attributes present on a geometry.
    ///
    /// Part of the batching group key: only geometries with identical sets
    /// share a batch.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct AttributeSet: u8 {
        const POSITION = 1 << 0;
        const NORMAL   = 1 << 1;
        const TANGENT  = 1 << 2;
        const UV       = 1 << 3;
        const UV2      = 1 << 4;
        const COLOR    = 1 << 5;
    }
}

/// Attribute names in sorted order, paired with their flag
const SORTED_ATTRIBUTE_NAMES: [(&str, AttributeSet); 6] = [
    ("color", AttributeSet::COLOR),
    ("normal", AttributeSet::NORMAL),
    ("position", AttributeSet::POSITION),
    ("tangent", AttributeSet::TANGENT),
    ("uv", AttributeSet::UV),
    ("uv2", AttributeSet::UV2),
];

impl AttributeSet {
    /// Sorted attribute names present in the set
    pub fn names(&self) -> Vec<&'static str> {
        SORTED_ATTRIBUTE_NAMES.iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }
}

// ============================================================================
// TANGENTS
// ============================================================================

/// Tangent data with or without the handedness component
#[derive(Debug, Clone, PartialEq)]
pub enum Tangents {
    Xyz(Vec<Vec3>),
    Xyzw(Vec<Vec4>),
}

impl Tangents {
    pub fn len(&self) -> usize {
        match self {
            Tangents::Xyz(v) => v.len(),
            Tangents::Xyzw(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tangent `i` as xyzw; w defaults to 1 when absent
    pub fn get4(&self, i: usize) -> Vec4 {
        match self {
            Tangents::Xyz(v) => v[i].extend(1.0),
            Tangents::Xyzw(v) => v[i],
        }
    }
}

// ============================================================================
// GEOMETRY
// ============================================================================

/// Triangle-list geometry
#[derive(Debug, Clone)]
pub struct Geometry {
    positions: Arc<Vec<Vec3>>,
    normals: Option<Vec<Vec3>>,
    tangents: Option<Tangents>,
    uvs: Option<Vec<Vec2>>,
    uv2s: Option<Vec<Vec2>>,
    colors: Option<Vec<Vec4>>,
    /// None for non-indexed geometry (never batched)
    indices: Option<IndexBuffer>,
    skinned: bool,
    morph_target_count: u32,
    /// Local-space bounds of `positions`
    bounding_box: AABB,
}

impl Geometry {
    /// Create a Geometry from a descriptor
    ///
    /// Validates attribute lengths against the position count and, for
    /// indexed geometry, index count (multiple of 3) and index range.
    pub fn from_desc(desc: GeometryDesc) -> Result<Self> {
        let vertex_count = desc.positions.len();

        if vertex_count == 0 {
            engine_bail!("galaxy3d::Geometry", InvalidGeometry => "Geometry has no positions");
        }

        let check = |name: &str, len: Option<usize>| -> Result<()> {
            if let Some(len) = len {
                if len != vertex_count {
                    engine_bail!("galaxy3d::Geometry", InvalidGeometry =>
                        "{} length {} != position count {}", name, len, vertex_count);
                }
            }
            Ok(())
        };
        check("normal", desc.normals.as_ref().map(|v| v.len()))?;
        check("tangent", desc.tangents.as_ref().map(|v| v.len()))?;
        check("uv", desc.uvs.as_ref().map(|v| v.len()))?;
        check("uv2", desc.uv2s.as_ref().map(|v| v.len()))?;
        check("color", desc.colors.as_ref().map(|v| v.len()))?;

        if let Some(ref indices) = desc.indices {
            if indices.len() % 3 != 0 {
                engine_bail!("galaxy3d::Geometry", InvalidGeometry =>
                    "Index count {} is not a multiple of 3", indices.len());
            }
            if let Some(max) = indices.max_index() {
                if max as usize >= vertex_count {
                    engine_bail!("galaxy3d::Geometry", InvalidGeometry =>
                        "Index {} out of range for {} vertices", max, vertex_count);
                }
            }
        }

        let bounding_box = AABB::from_points(desc.positions.iter());

        Ok(Self {
            positions: Arc::new(desc.positions),
            normals: desc.normals,
            tangents: desc.tangents,
            uvs: desc.uvs,
            uv2s: desc.uv2s,
            colors: desc.colors,
            indices: desc.indices,
            skinned: desc.skinned,
            morph_target_count: desc.morph_target_count,
            bounding_box,
        })
    }

    /// Geometry drawing an existing position buffer with its own indices.
    ///
    /// Used by selection overlays; `indices` must address `positions`.
    pub(crate) fn with_shared_positions(
        positions: Arc<Vec<Vec3>>,
        indices: IndexBuffer,
        bounding_box: AABB,
    ) -> Self {
        debug_assert!(indices.max_index().map_or(true, |max| (max as usize) < positions.len()));
        Self {
            positions,
            normals: None,
            tangents: None,
            uvs: None,
            uv2s: None,
            colors: None,
            indices: Some(indices),
            skinned: false,
            morph_target_count: 0,
            bounding_box,
        }
    }

    // ===== ACCESSORS =====

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Shared handle to the position buffer
    pub fn shared_positions(&self) -> &Arc<Vec<Vec3>> {
        &self.positions
    }

    pub fn normals(&self) -> Option<&[Vec3]> {
        self.normals.as_deref()
    }

    pub fn tangents(&self) -> Option<&Tangents> {
        self.tangents.as_ref()
    }

    pub fn uvs(&self) -> Option<&[Vec2]> {
        self.uvs.as_deref()
    }

    pub fn uv2s(&self) -> Option<&[Vec2]> {
        self.uv2s.as_deref()
    }

    pub fn colors(&self) -> Option<&[Vec4]> {
        self.colors.as_deref()
    }

    pub fn indices(&self) -> Option<&IndexBuffer> {
        self.indices.as_ref()
    }

    pub fn is_indexed(&self) -> bool {
        self.indices.is_some()
    }

    pub fn is_skinned(&self) -> bool {
        self.skinned
    }

    pub fn morph_target_count(&self) -> u32 {
        self.morph_target_count
    }

    /// Local-space bounding box
    pub fn bounding_box(&self) -> &AABB {
        &self.bounding_box
    }

    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    /// Index count, or vertex count for non-indexed geometry
    pub fn index_count(&self) -> u32 {
        match &self.indices {
            Some(indices) => indices.len() as u32,
            None => self.vertex_count(),
        }
    }

    pub fn triangle_count(&self) -> u32 {
        self.index_count() / 3
    }

    /// Vertex indices of triangle `face`
    pub fn triangle(&self, face: u32) -> Option<[u32; 3]> {
        let base = face as usize * 3;
        match &self.indices {
            Some(indices) => Some([
                indices.get(base)?,
                indices.get(base + 1)?,
                indices.get(base + 2)?,
            ]),
            None if base + 2 < self.positions.len() => {
                Some([base as u32, base as u32 + 1, base as u32 + 2])
            }
            None => None,
        }
    }

    /// Iterate `(face, vertex indices)` over every triangle
    pub fn triangles(&self) -> impl Iterator<Item = (u32, [u32; 3])> + '_ {
        (0..self.triangle_count()).filter_map(move |face| self.triangle(face).map(|t| (face, t)))
    }

    /// Attributes present on this geometry
    pub fn attribute_set(&self) -> AttributeSet {
        let mut set = AttributeSet::POSITION;
        set.set(AttributeSet::NORMAL, self.normals.is_some());
        set.set(AttributeSet::TANGENT, self.tangents.is_some());
        set.set(AttributeSet::UV, self.uvs.is_some());
        set.set(AttributeSet::UV2, self.uv2s.is_some());
        set.set(AttributeSet::COLOR, self.colors.is_some());
        set
    }
}

// ============================================================================
// DESCRIPTOR
// ============================================================================

/// Descriptor for creating a Geometry
#[derive(Debug, Clone, Default)]
pub struct GeometryDesc {
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub tangents: Option<Tangents>,
    pub uvs: Option<Vec<Vec2>>,
    pub uv2s: Option<Vec<Vec2>>,
    pub colors: Option<Vec<Vec4>>,
    pub indices: Option<IndexBuffer>,
    pub skinned: bool,
    pub morph_target_count: u32,
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
