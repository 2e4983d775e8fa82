/// BatchBuilder: partitions eligible meshes by group key, packs them under
/// a vertex cap and merges each pack into one world-space geometry.
///
/// The builder is a pure function of the scene and its settings. It never
/// mutates the scene; the caller attaches the returned batches once the
/// whole set has been built.

use std::time::Instant;
use glam::{Mat3, Vec2, Vec3, Vec4};
use rdst::RadixSort;
use rustc_hash::FxHashMap;
use crate::config::{DeviceCapabilities, U16_VERTEX_LIMIT};
use crate::error::Result;
use crate::resource::{AttributeSet, Geometry, GeometryDesc, IndexBuffer, IndexType, Tangents};
use crate::scene::{RenderableKey, Scene, SourceMesh};
use crate::{engine_bail, engine_err, engine_info, engine_warn};
use super::group_key::{GroupKey, GroupKeyer};
use super::merged_batch::{MergedBatch, Range};

// ===== REPORT =====

/// Summary of one build
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BatchBuildReport {
    pub batch_count: usize,
    pub merged_mesh_count: usize,
    pub vertex_count: u64,
    pub index_count: u64,
    pub duration_ms: f64,
}

// ===== BUILDER =====

#[derive(Debug, Clone, Copy)]
pub struct BatchBuilder {
    max_vertices_per_batch: u32,
    capabilities: DeviceCapabilities,
}

impl BatchBuilder {
    pub fn new(max_vertices_per_batch: u32, capabilities: DeviceCapabilities) -> Self {
        Self { max_vertices_per_batch, capabilities }
    }

    pub fn max_vertices_per_batch(&self) -> u32 {
        self.max_vertices_per_batch
    }

    /// Soft cap actually used for packing on this runtime
    pub fn effective_cap(&self) -> u32 {
        self.capabilities.effective_vertex_cap(self.max_vertices_per_batch)
    }

    /// Build batches from eligible meshes (load order).
    ///
    /// Returns batches in group-key order, then ascending member size.
    pub fn build(&self, scene: &Scene, eligible: &[RenderableKey]) -> Result<(Vec<MergedBatch>, BatchBuildReport)> {
        let start = Instant::now();
        let mut batches = Vec::new();
        let mut report = BatchBuildReport::default();

        for (group_key, members) in self.partition(scene, eligible)? {
            for pack in self.pack(scene, &members) {
                let batch = self.merge(scene, group_key, &pack)?;
                report.merged_mesh_count += pack.len();
                report.vertex_count += batch.vertex_count() as u64;
                report.index_count += batch.index_count() as u64;
                batches.push(batch);
            }
        }

        report.batch_count = batches.len();
        report.duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        if !batches.is_empty() {
            engine_info!("galaxy3d::BatchBuilder",
                "Built {} batches from {} meshes ({} vertices, {} indices) in {:.2} ms",
                report.batch_count, report.merged_mesh_count,
                report.vertex_count, report.index_count, report.duration_ms);
        }

        Ok((batches, report))
    }

    /// Group by key, keeping load order inside each group; groups sorted by key
    fn partition(&self, scene: &Scene, eligible: &[RenderableKey]) -> Result<Vec<(GroupKey, Vec<RenderableKey>)>> {
        let mut groups: FxHashMap<GroupKey, Vec<RenderableKey>> = FxHashMap::default();
        for key in eligible {
            let mesh = Self::source_mesh(scene, *key)?;
            let group_key = GroupKeyer::key(mesh)
                .ok_or_else(|| engine_err!("galaxy3d::BatchBuilder", "Mesh {:?} has no single material", key))?;
            groups.entry(group_key).or_default().push(*key);
        }

        let mut groups: Vec<_> = groups.into_iter().collect();
        groups.sort_unstable_by_key(|(group_key, _)| *group_key);
        Ok(groups)
    }

    /// Greedy packing in ascending vertex count under the effective cap
    fn pack(&self, scene: &Scene, members: &[RenderableKey]) -> Vec<Vec<RenderableKey>> {
        let cap = self.effective_cap();

        // (vertex_count << 32 | ordinal) keeps load order among equal sizes
        let mut order: Vec<u64> = members.iter().enumerate()
            .map(|(ordinal, key)| {
                let vertex_count = scene.mesh(*key).map_or(0, |m| m.geometry().vertex_count());
                ((vertex_count as u64) << 32) | ordinal as u64
            })
            .collect();
        order.radix_sort_unstable();

        let mut packs = Vec::new();
        let mut current: Vec<RenderableKey> = Vec::new();
        let mut current_vertices = 0u64;

        for packed in order {
            let vertex_count = (packed >> 32) as u32;
            let key = members[(packed & 0xFFFF_FFFF) as usize];

            if !self.capabilities.supports_u32_indices && vertex_count > U16_VERTEX_LIMIT {
                engine_warn!("galaxy3d::BatchBuilder",
                    "Mesh {:?} has {} vertices but 32-bit indices are unsupported, left unbatched",
                    key, vertex_count);
                continue;
            }

            if !current.is_empty() && current_vertices + vertex_count as u64 > cap as u64 {
                packs.push(std::mem::take(&mut current));
                current_vertices = 0;
            }
            current.push(key);
            current_vertices += vertex_count as u64;
        }
        if !current.is_empty() {
            packs.push(current);
        }
        packs
    }

    /// Merge one pack into a world-space geometry
    fn merge(&self, scene: &Scene, group_key: GroupKey, pack: &[RenderableKey]) -> Result<MergedBatch> {
        let mut meshes = Vec::with_capacity(pack.len());
        for key in pack {
            meshes.push((*key, Self::source_mesh(scene, *key)?));
        }

        let attributes = meshes.iter()
            .fold(AttributeSet::all(), |set, (_, mesh)| set & mesh.geometry().attribute_set());
        let total_vertices: u32 = meshes.iter().map(|(_, m)| m.geometry().vertex_count()).sum();
        let total_indices: u32 = meshes.iter().map(|(_, m)| m.geometry().index_count()).sum();

        let Some(index_type) = IndexType::for_vertex_count(total_vertices, self.capabilities.supports_u32_indices) else {
            engine_bail!("galaxy3d::BatchBuilder", IndexOverflow =>
                "Batch of {} vertices needs 32-bit indices, which are unsupported", total_vertices);
        };
        if pack.len() == 1 && total_vertices > self.effective_cap() {
            engine_warn!("galaxy3d::BatchBuilder",
                "Mesh {:?} alone exceeds the batch cap ({} > {})", pack[0], total_vertices, self.max_vertices_per_batch);
        }

        let mut streams = AttributeStreams::with_capacity(attributes, total_vertices as usize);
        let mut indices = Vec::with_capacity(total_indices as usize);
        let mut ranges = Vec::with_capacity(pack.len());

        for (key, mesh) in &meshes {
            let vertex_start = streams.positions.len() as u32;
            let index_start = indices.len() as u32;

            streams.append(mesh);
            if let Some(source) = mesh.geometry().indices() {
                indices.extend(source.iter().map(|i| i + vertex_start));
            }

            ranges.push(Range {
                source: *key,
                index_start,
                index_count: indices.len() as u32 - index_start,
                vertex_start,
                vertex_count: mesh.geometry().vertex_count(),
                world_bounding_box: *mesh.world_bounding_box(),
            });
        }

        let index_buffer = IndexBuffer::from_u32(indices, index_type)?;
        let geometry = Geometry::from_desc(streams.into_desc(index_buffer))?;

        Ok(MergedBatch::new(geometry, group_key, ranges))
    }

    fn source_mesh(scene: &Scene, key: RenderableKey) -> Result<&SourceMesh> {
        scene.mesh(key)
            .ok_or_else(|| engine_err!("galaxy3d::BatchBuilder", "Renderable {:?} is not a source mesh", key))
    }
}

// ===== ATTRIBUTE STREAMS =====

/// Growing world-space attribute buffers of a batch under construction
struct AttributeStreams {
    positions: Vec<Vec3>,
    normals: Option<Vec<Vec3>>,
    tangents: Option<Vec<Vec4>>,
    uvs: Option<Vec<Vec2>>,
    uv2s: Option<Vec<Vec2>>,
    colors: Option<Vec<Vec4>>,
}

impl AttributeStreams {
    fn with_capacity(attributes: AttributeSet, capacity: usize) -> Self {
        fn stream<T>(attributes: AttributeSet, flag: AttributeSet, capacity: usize) -> Option<Vec<T>> {
            attributes.contains(flag).then(|| Vec::with_capacity(capacity))
        }
        Self {
            positions: Vec::with_capacity(capacity),
            normals: stream(attributes, AttributeSet::NORMAL, capacity),
            tangents: stream(attributes, AttributeSet::TANGENT, capacity),
            uvs: stream(attributes, AttributeSet::UV, capacity),
            uv2s: stream(attributes, AttributeSet::UV2, capacity),
            colors: stream(attributes, AttributeSet::COLOR, capacity),
        }
    }

    /// Append one mesh: positions by the world matrix, normals and tangents by its normal matrix
    fn append(&mut self, mesh: &SourceMesh) {
        let geometry = mesh.geometry();
        let world = *mesh.world_matrix();
        let normal_matrix = Mat3::from_mat4(world).inverse().transpose();

        self.positions.extend(geometry.positions().iter().map(|p| world.transform_point3(*p)));

        if let (Some(dst), Some(src)) = (self.normals.as_mut(), geometry.normals()) {
            dst.extend(src.iter().map(|n| (normal_matrix * *n).normalize_or_zero()));
        }
        if let (Some(dst), Some(src)) = (self.tangents.as_mut(), geometry.tangents()) {
            dst.extend((0..src.len()).map(|i| {
                let t = src.get4(i);
                (normal_matrix * t.truncate()).normalize_or_zero().extend(t.w)
            }));
        }
        if let (Some(dst), Some(src)) = (self.uvs.as_mut(), geometry.uvs()) {
            dst.extend_from_slice(src);
        }
        if let (Some(dst), Some(src)) = (self.uv2s.as_mut(), geometry.uv2s()) {
            dst.extend_from_slice(src);
        }
        if let (Some(dst), Some(src)) = (self.colors.as_mut(), geometry.colors()) {
            dst.extend_from_slice(src);
        }
    }

    fn into_desc(self, indices: IndexBuffer) -> GeometryDesc {
        GeometryDesc {
            positions: self.positions,
            normals: self.normals,
            tangents: self.tangents.map(Tangents::Xyzw),
            uvs: self.uvs,
            uv2s: self.uv2s,
            colors: self.colors,
            indices: Some(indices),
            skinned: false,
            morph_target_count: 0,
        }
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
