/// Merged batches and their identity-preserving range model.
///
/// A `MergedBatch` owns one geometry built from several source meshes. Each
/// source keeps a `Range` describing where its indices and vertices landed,
/// and a dense `FaceLookup` maps every merged triangle back to its range in
/// O(1).

use crate::resource::{Geometry, IndexType};
use crate::scene::{AABB, BoundingSphere, MaterialKey, RenderableKey};
use super::group_key::GroupKey;

// ===== RANGE =====

/// Slot of one source mesh inside a merged batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Source mesh this range was copied from
    pub source: RenderableKey,
    /// First index (not face) of the range in the merged index buffer
    pub index_start: u32,
    pub index_count: u32,
    /// First vertex of the range in the merged attribute buffers
    pub vertex_start: u32,
    pub vertex_count: u32,
    /// World bounds of the source mesh
    pub world_bounding_box: AABB,
}

impl Range {
    /// One past the last index position
    pub fn index_end(&self) -> u32 {
        self.index_start + self.index_count
    }

    /// True if index position `index` lies inside `[index_start, index_end)`
    pub fn contains_index(&self, index: u32) -> bool {
        index >= self.index_start && index < self.index_end()
    }

    pub fn first_face(&self) -> u32 {
        self.index_start / 3
    }

    pub fn face_count(&self) -> u32 {
        self.index_count / 3
    }
}

// ===== FACE LOOKUP =====

/// Dense triangle -> range ordinal table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceLookup {
    entries: Vec<u32>,
}

impl FaceLookup {
    /// Build from ranges ordered by `index_start`, one pass over all faces
    pub fn from_ranges(ranges: &[Range]) -> Self {
        let face_total: u32 = ranges.iter().map(Range::face_count).sum();
        let mut entries = Vec::with_capacity(face_total as usize);
        for (ordinal, range) in ranges.iter().enumerate() {
            entries.extend(std::iter::repeat(ordinal as u32).take(range.face_count() as usize));
        }
        Self { entries }
    }

    pub fn get(&self, face: u32) -> Option<usize> {
        self.entries.get(face as usize).map(|ordinal| *ordinal as usize)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ===== MERGED BATCH =====

#[derive(Debug, Clone)]
pub struct MergedBatch {
    geometry: Geometry,
    group_key: GroupKey,
    ranges: Vec<Range>,
    face_lookup: FaceLookup,
    bounding_box: AABB,
    bounding_sphere: BoundingSphere,
}

impl MergedBatch {
    pub(crate) fn new(geometry: Geometry, group_key: GroupKey, ranges: Vec<Range>) -> Self {
        let face_lookup = FaceLookup::from_ranges(&ranges);
        let bounding_box = ranges.iter()
            .fold(AABB::empty(), |acc, range| acc.union(&range.world_bounding_box));
        let bounding_sphere = BoundingSphere::from_points(geometry.positions(), &bounding_box);
        Self { geometry, group_key, ranges, face_lookup, bounding_box, bounding_sphere }
    }

    /// Merged geometry, already in world space
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn material(&self) -> MaterialKey {
        self.group_key.material
    }

    pub fn group_key(&self) -> &GroupKey {
        &self.group_key
    }

    /// Ranges ordered by `index_start`
    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn face_lookup(&self) -> &FaceLookup {
        &self.face_lookup
    }

    /// Union of the members' world bounding boxes
    pub fn bounding_box(&self) -> &AABB {
        &self.bounding_box
    }

    pub fn bounding_sphere(&self) -> &BoundingSphere {
        &self.bounding_sphere
    }

    pub fn vertex_count(&self) -> u32 {
        self.geometry.vertex_count()
    }

    pub fn index_count(&self) -> u32 {
        self.geometry.index_count()
    }

    pub fn index_type(&self) -> Option<IndexType> {
        self.geometry.indices().map(|indices| indices.index_type())
    }

    /// Range ordinal owning merged triangle `face`
    pub fn range_index_for_face(&self, face: u32) -> Option<usize> {
        self.face_lookup.get(face)
    }

    /// Range owning merged triangle `face`, via the face lookup
    pub fn range_for_face(&self, face: u32) -> Option<&Range> {
        self.range_index_for_face(face).and_then(|ordinal| self.ranges.get(ordinal))
    }

    /// Linear-scan resolution of `face`, used to verify the face lookup
    pub fn scan_range_for_face(&self, face: u32) -> Option<&Range> {
        let index = face.checked_mul(3)?;
        self.ranges.iter().find(|range| range.contains_index(index))
    }

    /// Source mesh owning merged triangle `face`
    pub fn source_for_face(&self, face: u32) -> Option<RenderableKey> {
        self.range_for_face(face).map(|range| range.source)
    }

    /// Range of a given source mesh
    pub fn range_of(&self, source: RenderableKey) -> Option<(usize, &Range)> {
        self.ranges.iter().enumerate().find(|(_, range)| range.source == source)
    }

    /// True if ranges are contiguous from 0, non-overlapping, and cover every index
    pub fn ranges_are_contiguous(&self) -> bool {
        let mut expected_index = 0;
        let mut expected_vertex = 0;
        for range in &self.ranges {
            if range.index_start != expected_index || range.vertex_start != expected_vertex {
                return false;
            }
            expected_index = range.index_end();
            expected_vertex += range.vertex_count;
        }
        expected_index == self.index_count() && expected_vertex == self.vertex_count()
    }
}

#[cfg(test)]
#[path = "merged_batch_tests.rs"]
mod tests;
