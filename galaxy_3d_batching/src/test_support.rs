//! Geometry and scene builders shared by unit tests

use glam::{Mat4, Vec3};
use crate::resource::{GeometryDesc, IndexBuffer, IndexType};
use crate::scene::{MaterialKey, MaterialSlot, MeshDesc, ModelDesc, ModelKey, Scene};

fn index_buffer(indices: Vec<u32>, vertex_count: usize) -> IndexBuffer {
    let index_type = if vertex_count <= 65_535 { IndexType::U16 } else { IndexType::U32 };
    IndexBuffer::from_u32(indices, index_type).unwrap()
}

/// `triangles` disjoint unit triangles laid out along +X (3 vertices each)
pub fn soup_desc(triangles: u32) -> GeometryDesc {
    let mut positions = Vec::with_capacity(triangles as usize * 3);
    for k in 0..triangles {
        let x = k as f32;
        positions.push(Vec3::new(x, 0.0, 0.0));
        positions.push(Vec3::new(x + 1.0, 0.0, 0.0));
        positions.push(Vec3::new(x, 1.0, 0.0));
    }
    let indices: Vec<u32> = (0..triangles * 3).collect();
    let vertex_count = positions.len();
    GeometryDesc {
        positions,
        indices: Some(index_buffer(indices, vertex_count)),
        ..Default::default()
    }
}

/// Triangle strip of `vertex_count` vertices (`vertex_count - 2` triangles)
pub fn strip_desc(vertex_count: u32) -> GeometryDesc {
    let positions: Vec<Vec3> = (0..vertex_count)
        .map(|i| Vec3::new((i / 2) as f32, (i % 2) as f32, 0.0))
        .collect();
    let mut indices = Vec::with_capacity(vertex_count.saturating_sub(2) as usize * 3);
    for i in 0..vertex_count.saturating_sub(2) {
        indices.extend_from_slice(&[i, i + 1, i + 2]);
    }
    GeometryDesc {
        positions,
        indices: Some(index_buffer(indices, vertex_count as usize)),
        ..Default::default()
    }
}

pub fn mesh_desc(name: &str, geometry: GeometryDesc, material: MaterialKey, world_matrix: Mat4) -> MeshDesc {
    MeshDesc {
        name: name.to_string(),
        geometry,
        material: MaterialSlot::Single(material),
        world_matrix,
    }
}

/// Model of `count` strip meshes sharing one material, spread along +Z
pub fn strip_model(scene: &mut Scene, name: &str, count: usize, vertex_count: u32) -> ModelKey {
    let material = scene.add_material("shared");
    let meshes = (0..count)
        .map(|i| mesh_desc(
            &format!("{}_{}", name, i),
            strip_desc(vertex_count),
            material,
            Mat4::from_translation(Vec3::new(0.0, 0.0, i as f32 * 2.0)),
        ))
        .collect();
    scene.add_model(ModelDesc { name: name.to_string(), meshes }).unwrap()
}
