use super::*;
use crate::batch::{BatchBuilder, MeshCollector};
use crate::config::DeviceCapabilities;
use crate::resource::IndexType;
use crate::scene::{ModelKey, RenderableClass};
use crate::test_support::strip_model;
use std::sync::Arc;

fn batch_model(scene: &mut Scene, model: ModelKey) {
    let eligible = MeshCollector::new(0.0).collect(scene, model);
    let (batches, _) = BatchBuilder::new(65_535, DeviceCapabilities::default())
        .build(scene, &eligible)
        .unwrap();
    scene.attach_batches(model, batches).unwrap();
}

fn meshes(scene: &Scene, model: ModelKey) -> Vec<RenderableKey> {
    scene.model(model).unwrap().meshes().to_vec()
}

#[test]
fn test_overlay_on_batched_mesh_slices_range() {
    let mut scene = Scene::new();
    let model = strip_model(&mut scene, "m", 3, 10);
    batch_model(&mut scene, model);
    let keys = meshes(&scene, model);
    let batch_key = scene.model(model).unwrap().batches()[0];

    let mut engine = HighlightEngine::new();
    let overlay_key = engine.add_highlight(&mut scene, keys[1]).unwrap();

    let overlay = scene.renderable(overlay_key).unwrap();
    assert_eq!(overlay.class(), RenderableClass::Overlay);
    let overlay = overlay.as_overlay().unwrap();
    assert_eq!(overlay.parent(), batch_key);
    assert_eq!(overlay.source_mesh(), keys[1]);
    assert_eq!(overlay.triangle_count(), 8);

    let batch = scene.batch(batch_key).unwrap();
    let range = batch.ranges()[1];
    let batch_indices = batch.geometry().indices().unwrap();
    let overlay_indices = overlay.geometry().indices().unwrap();
    assert_eq!(overlay_indices.index_type(), IndexType::U16);
    for i in 0..range.index_count as usize {
        assert_eq!(overlay_indices.get(i), batch_indices.get(range.index_start as usize + i));
    }
    assert!(Arc::ptr_eq(overlay.geometry().shared_positions(), batch.geometry().shared_positions()));
    assert_eq!(scene.world_matrix(overlay_key), Some(glam::Mat4::IDENTITY));
}

#[test]
fn test_overlay_on_unbatched_mesh_uses_full_range() {
    let mut scene = Scene::new();
    let model = strip_model(&mut scene, "m", 2, 10);
    let keys = meshes(&scene, model);

    let mut engine = HighlightEngine::new();
    let overlay_key = engine.add_highlight(&mut scene, keys[1]).unwrap();
    let overlay = scene.renderable(overlay_key).unwrap().as_overlay().unwrap();
    assert_eq!(overlay.parent(), keys[1]);
    assert_eq!(overlay.geometry().index_count(), 24);
    assert_eq!(scene.world_matrix(overlay_key), scene.world_matrix(keys[1]));
}

#[test]
fn test_add_highlight_is_idempotent() {
    let mut scene = Scene::new();
    let model = strip_model(&mut scene, "m", 2, 10);
    let keys = meshes(&scene, model);
    let mut engine = HighlightEngine::new();

    let first = engine.add_highlight(&mut scene, keys[0]).unwrap();
    let second = engine.add_highlight(&mut scene, keys[0]).unwrap();
    assert_eq!(first, second);
    assert_eq!(engine.highlighted_count(), 1);
    assert_eq!(scene.overlays().len(), 1);
}

#[test]
fn test_set_highlight_replaces_and_clear_disposes() {
    let mut scene = Scene::new();
    let model = strip_model(&mut scene, "m", 4, 10);
    batch_model(&mut scene, model);
    let keys = meshes(&scene, model);
    let before = scene.renderable_count();
    let mut engine = HighlightEngine::new();

    assert_eq!(engine.set_highlight(&mut scene, &[keys[0], keys[2]]).unwrap(), 2);
    assert_eq!(engine.set_highlight(&mut scene, &[keys[3], keys[3]]).unwrap(), 1);
    assert_eq!(engine.highlighted_meshes().collect::<Vec<_>>(), vec![keys[3]]);
    assert_eq!(scene.renderable_count(), before + 1);

    engine.clear(&mut scene);
    assert_eq!(engine.highlighted_count(), 0);
    assert_eq!(scene.renderable_count(), before);
    assert!(scene.overlays().is_empty());
}

#[test]
fn test_set_highlight_failure_keeps_previous() {
    let mut scene = Scene::new();
    let model = strip_model(&mut scene, "m", 2, 10);
    let keys = meshes(&scene, model);
    let batch_like = {
        let other = strip_model(&mut scene, "gone", 1, 10);
        let key = meshes(&scene, other)[0];
        scene.remove_model(other);
        key
    };
    let mut engine = HighlightEngine::new();
    engine.set_highlight(&mut scene, &[keys[0]]).unwrap();

    assert!(engine.set_highlight(&mut scene, &[keys[1], batch_like]).is_err());
    assert_eq!(engine.highlighted_meshes().collect::<Vec<_>>(), vec![keys[0]]);
}

#[test]
fn test_overlays_are_not_pick_targets() {
    let mut scene = Scene::new();
    let model = strip_model(&mut scene, "m", 2, 10);
    let keys = meshes(&scene, model);
    let mut engine = HighlightEngine::new();
    engine.add_highlight(&mut scene, keys[0]).unwrap();
    assert_eq!(scene.pick_targets().count(), 2);
}

#[test]
fn test_search_is_case_insensitive_substring() {
    let mut scene = Scene::new();
    strip_model(&mut scene, "Pipe", 3, 10);
    strip_model(&mut scene, "Valve", 2, 10);
    let mut engine = HighlightEngine::new();

    assert_eq!(engine.highlight_search(&mut scene, "pipe").unwrap(), 3);
    assert_eq!(engine.highlight_search(&mut scene, "ALVE_1").unwrap(), 1);
    assert_eq!(engine.highlight_search(&mut scene, "nothing").unwrap(), 0);
    assert_eq!(engine.highlight_search(&mut scene, "_").unwrap(), 5);
    assert_eq!(engine.highlight_search(&mut scene, "  ").unwrap(), 0);
    assert_eq!(engine.highlighted_count(), 0);
}
