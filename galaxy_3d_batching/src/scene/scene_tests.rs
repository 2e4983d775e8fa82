/// Tests for Scene
///
/// Model lifecycle, batch attach/detach bookkeeping, overlays and
/// class-based queries.

use super::*;
use crate::batch::{BatchBuilder, MeshCollector};
use crate::config::DeviceCapabilities;
use crate::scene::RenderableClass;
use crate::test_support::{mesh_desc, soup_desc, strip_desc, strip_model};
use glam::{Mat4, Vec3};

// ============================================================================
// Helper Functions
// ============================================================================

fn build_batches(scene: &Scene, model: ModelKey, max_vertices: u32) -> Vec<MergedBatch> {
    let eligible = MeshCollector::new(0.0).collect(scene, model);
    let builder = BatchBuilder::new(max_vertices, DeviceCapabilities::default());
    builder.build(scene, &eligible).unwrap().0
}

// ============================================================================
// Models
// ============================================================================

#[test]
fn test_add_model_creates_unbatched_meshes() {
    let mut scene = Scene::new();
    let model = strip_model(&mut scene, "m", 3, 10);

    let meshes = scene.model(model).unwrap().meshes().to_vec();
    assert_eq!(meshes.len(), 3);
    for key in &meshes {
        let r = scene.renderable(*key).unwrap();
        assert_eq!(r.class(), RenderableClass::Unbatched);
        assert!(r.is_visible());
        assert_eq!(r.model(), Some(model));
    }
    assert_eq!(scene.draw_call_count(), 3);
}

#[test]
fn test_add_model_keeps_load_order() {
    let mut scene = Scene::new();
    let model = strip_model(&mut scene, "ordered", 4, 6);
    let names: Vec<&str> = scene.model(model).unwrap().meshes().iter()
        .map(|k| scene.renderable(*k).unwrap().name())
        .collect();
    assert_eq!(names, vec!["ordered_0", "ordered_1", "ordered_2", "ordered_3"]);
}

#[test]
fn test_add_model_unknown_material_fails_atomically() {
    let mut scene = Scene::new();
    let material = scene.add_material("a");
    // Keys minted by a larger arena are unknown here
    let mut other = Scene::new();
    let _ = other.add_material("x");
    let _ = other.add_material("y");
    let foreign = other.add_material("z");

    let desc = ModelDesc {
        name: "bad".to_string(),
        meshes: vec![
            mesh_desc("ok", soup_desc(1), material, Mat4::IDENTITY),
            mesh_desc("bad", soup_desc(1), foreign, Mat4::IDENTITY),
        ],
    };
    assert!(scene.add_model(desc).is_err());
    assert_eq!(scene.model_count(), 0);
    assert_eq!(scene.renderable_count(), 0);
}

#[test]
fn test_add_model_invalid_geometry() {
    let mut scene = Scene::new();
    let material = scene.add_material("a");
    let mut geometry = soup_desc(1);
    geometry.normals = Some(vec![Vec3::Z]);
    let desc = ModelDesc {
        name: "bad".to_string(),
        meshes: vec![mesh_desc("broken", geometry, material, Mat4::IDENTITY)],
    };
    let err = scene.add_model(desc).unwrap_err();
    assert!(matches!(err, crate::error::Error::InvalidGeometry(_)));
}

#[test]
fn test_remove_model() {
    let mut scene = Scene::new();
    let a = strip_model(&mut scene, "a", 2, 8);
    let b = strip_model(&mut scene, "b", 3, 8);

    assert!(scene.remove_model(a));
    assert!(!scene.remove_model(a));
    assert!(scene.model(a).is_none());
    assert!(scene.model(b).is_some());
    assert_eq!(scene.renderable_count(), 3);
}

#[test]
fn test_world_bounds_follow_transform() {
    let mut scene = Scene::new();
    let material = scene.add_material("a");
    let desc = ModelDesc {
        name: "moved".to_string(),
        meshes: vec![mesh_desc("tri", soup_desc(1), material,
            Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)))],
    };
    let model = scene.add_model(desc).unwrap();
    let key = scene.model(model).unwrap().meshes()[0];
    let mesh = scene.mesh(key).unwrap();
    assert_eq!(mesh.world_bounding_box().min, Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(mesh.world_bounding_box().max, Vec3::new(11.0, 1.0, 0.0));
    assert_eq!(scene.world_matrix(key), Some(Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0))));
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn test_attach_hides_sources_and_sets_membership() {
    let mut scene = Scene::new();
    let model = strip_model(&mut scene, "m", 4, 10);
    let batches = build_batches(&scene, model, 65_535);
    let keys = scene.attach_batches(model, batches).unwrap();

    assert_eq!(keys.len(), 1);
    assert!(scene.model(model).unwrap().is_batched());
    for (i, key) in scene.model(model).unwrap().meshes().iter().enumerate() {
        let r = scene.renderable(*key).unwrap();
        assert_eq!(r.class(), RenderableClass::BatchedOriginalHidden);
        assert!(!r.is_visible());
        let membership = r.as_mesh().unwrap().membership().unwrap();
        assert_eq!(membership.batch, keys[0]);
        assert_eq!(membership.range_index, i);
    }
    assert_eq!(scene.renderable(keys[0]).unwrap().class(), RenderableClass::MergedBatch);
    assert_eq!(scene.draw_call_count(), 1);
    assert_eq!(scene.world_matrix(keys[0]), Some(Mat4::IDENTITY));
}

#[test]
fn test_pick_targets_exclude_hidden_originals() {
    let mut scene = Scene::new();
    let model = strip_model(&mut scene, "m", 3, 10);
    let batches = build_batches(&scene, model, 65_535);
    scene.attach_batches(model, batches).unwrap();

    let classes: Vec<RenderableClass> = scene.pick_targets().map(|(_, r)| r.class()).collect();
    assert_eq!(classes, vec![RenderableClass::MergedBatch]);
    assert_eq!(scene.attached_renderables(model).len(), 1);
}

#[test]
fn test_detach_restores_sources() {
    let mut scene = Scene::new();
    let model = strip_model(&mut scene, "m", 3, 10);
    let batches = build_batches(&scene, model, 65_535);
    scene.attach_batches(model, batches).unwrap();

    assert_eq!(scene.detach_batches(model), 1);
    assert_eq!(scene.detach_batches(model), 0);
    assert_eq!(scene.renderable_count(), 3);
    for key in scene.model(model).unwrap().meshes() {
        let r = scene.renderable(*key).unwrap();
        assert_eq!(r.class(), RenderableClass::Unbatched);
        assert!(r.is_visible());
        assert!(r.as_mesh().unwrap().membership().is_none());
    }
    assert_eq!(scene.draw_call_count(), 3);
}

#[test]
fn test_attach_rejects_already_batched_sources() {
    let mut scene = Scene::new();
    let model = strip_model(&mut scene, "m", 2, 10);
    let first = build_batches(&scene, model, 65_535);
    let second = first.clone();
    scene.attach_batches(model, first).unwrap();
    assert!(scene.attach_batches(model, second).is_err());
    assert_eq!(scene.model(model).unwrap().batches().len(), 1);
}

#[test]
fn test_attach_rejects_foreign_model() {
    let mut scene = Scene::new();
    let a = strip_model(&mut scene, "a", 2, 10);
    let b = strip_model(&mut scene, "b", 2, 10);
    let batches = build_batches(&scene, a, 65_535);
    assert!(scene.attach_batches(b, batches).is_err());
}

#[test]
fn test_unbatched_meshes_stay_attached() {
    let mut scene = Scene::new();
    let material = scene.add_material("a");
    let mut small = strip_desc(4);
    small.indices = None;
    let desc = ModelDesc {
        name: "mixed".to_string(),
        meshes: vec![
            mesh_desc("indexed_0", strip_desc(10), material, Mat4::IDENTITY),
            mesh_desc("indexed_1", strip_desc(10), material, Mat4::IDENTITY),
            mesh_desc("flat", small, material, Mat4::IDENTITY),
        ],
    };
    let model = scene.add_model(desc).unwrap();
    let batches = build_batches(&scene, model, 65_535);
    scene.attach_batches(model, batches).unwrap();

    let attached = scene.attached_renderables(model);
    assert_eq!(attached.len(), 2);
    assert_eq!(scene.draw_call_count(), 2);
}

// ============================================================================
// Visibility
// ============================================================================

#[test]
fn test_set_visible() {
    let mut scene = Scene::new();
    let model = strip_model(&mut scene, "m", 1, 10);
    let key = scene.model(model).unwrap().meshes()[0];

    assert!(scene.set_visible(key, false));
    assert!(!scene.renderable(key).unwrap().is_visible());
    assert_eq!(scene.draw_call_count(), 0);

    scene.remove_model(model);
    assert!(!scene.set_visible(key, true));
}

#[test]
fn test_overlays_follow_parent_visibility() {
    let mut scene = Scene::new();
    let model = strip_model(&mut scene, "m", 4, 10);
    let batches = build_batches(&scene, model, 65_535);
    let batch = scene.attach_batches(model, batches).unwrap()[0];
    let mesh = scene.model(model).unwrap().meshes()[2];

    let overlay = SelectionOverlay::for_mesh(&scene, mesh).unwrap();
    let overlay = scene.insert_overlay("m_2_highlight".to_string(), overlay).unwrap();
    assert_eq!(scene.draw_call_count(), 2);

    scene.set_visible(batch, false);
    assert!(!scene.renderable(overlay).unwrap().is_visible());
    assert_eq!(scene.draw_call_count(), 0);

    scene.set_visible(batch, true);
    assert!(scene.renderable(overlay).unwrap().is_visible());
    assert_eq!(scene.draw_call_count(), 2);
}

#[test]
fn test_overlay_starts_hidden_under_hidden_parent() {
    let mut scene = Scene::new();
    let model = strip_model(&mut scene, "m", 1, 10);
    let mesh = scene.model(model).unwrap().meshes()[0];
    scene.set_visible(mesh, false);

    let overlay = SelectionOverlay::for_mesh(&scene, mesh).unwrap();
    let overlay = scene.insert_overlay("m_0_highlight".to_string(), overlay).unwrap();
    assert!(!scene.renderable(overlay).unwrap().is_visible());
}

#[test]
fn test_clear() {
    let mut scene = Scene::new();
    strip_model(&mut scene, "m", 3, 10);
    scene.clear();
    assert_eq!(scene.model_count(), 0);
    assert_eq!(scene.renderable_count(), 0);
    assert!(scene.overlays().is_empty());
}
