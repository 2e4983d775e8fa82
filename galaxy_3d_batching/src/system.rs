/// BatchingSystem - the single owner of the scene and every subsystem.
///
/// The host drives it from its frame callback: pointer events go through
/// `handle_pointer_event`, and `tick` runs deferred picks and interaction
/// culling once per frame. Every batch or overlay is created and disposed
/// here, on load, removal, batching toggles, setting changes and dispose.
///
/// Batch rebuilds are atomic: the new batch set for every model is built
/// against the current scene before the old set is detached.

use std::time::Instant;
use glam::Vec2;
use winit::event::MouseButton;
use crate::batch::{BatchBuilder, BatchBuildReport, MergedBatch, MeshCollector};
use crate::camera::ViewCamera;
use crate::config::{self, BatchingConfig, SystemConfig};
use crate::culling::{OcclusionClassifier, OcclusionCuller, ScreenSizeClassifier, ScreenSizeCuller};
use crate::error::Result;
use crate::highlight::HighlightEngine;
use crate::input::{InteractionEdge, InteractionTracker, PointerEvent};
use crate::picking::{ClickDetector, PickResolver, PickScheduler, SelectionInfo};
use crate::scene::{ModelDesc, ModelKey, RenderableClass, RenderableKey, Scene};
use crate::{engine_debug, engine_info, engine_warn};

// ===== REPORTS =====

/// Result of a deferred pick
#[derive(Debug, Clone, PartialEq)]
pub enum PickOutcome {
    Selected(SelectionInfo),
    /// The click hit nothing; the previous selection was cleared
    Cleared,
}

/// What one `tick` did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    pub pick: Option<PickOutcome>,
    pub hidden: usize,
    pub shown: usize,
    /// Entries made visible again because interaction ended
    pub restored: usize,
}

/// Snapshot of the system for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SystemStats {
    pub model_count: usize,
    pub renderable_count: usize,
    pub draw_calls: usize,
    pub batch_count: usize,
    pub merged_mesh_count: usize,
    pub highlighted_count: usize,
    pub culled_count: usize,
    /// Duration of the first batch build, in milliseconds
    pub first_build_ms: Option<f64>,
}

// ===== SYSTEM =====

pub struct BatchingSystem {
    config: SystemConfig,
    scene: Scene,
    highlight: HighlightEngine,
    screen_culler: ScreenSizeCuller,
    occlusion_culler: Option<OcclusionCuller>,
    interaction: InteractionTracker,
    clicks: ClickDetector,
    picks: PickScheduler,
    selection: Option<SelectionInfo>,
    frame: u64,
    first_build_ms: Option<f64>,
    last_build: BatchBuildReport,
}

impl BatchingSystem {
    pub fn new(config: SystemConfig) -> Result<Self> {
        config.validate()?;
        engine_info!("galaxy3d::BatchingSystem",
            "Created (batching {}, cap {} vertices, u32 indices {})",
            if config.batching.enabled { "on" } else { "off" },
            config.batching.max_vertices_per_batch,
            config.capabilities.supports_u32_indices);

        let screen = config.screen_culling;
        let occlusion = config.occlusion_culling;
        Ok(Self {
            config,
            scene: Scene::new(),
            highlight: HighlightEngine::new(),
            screen_culler: ScreenSizeCuller::new(ScreenSizeClassifier::new(screen.threshold_px), screen),
            occlusion_culler: occlusion.enabled
                .then(|| OcclusionCuller::new(OcclusionClassifier::new(), occlusion.culling)),
            interaction: InteractionTracker::new(config.interaction.idle_window),
            clicks: ClickDetector::new(config.interaction.click_threshold_px),
            picks: PickScheduler::new(),
            selection: None,
            frame: 0,
            first_build_ms: None,
            last_build: BatchBuildReport::default(),
        })
    }

    // ===== ACCESSORS =====

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access for materials
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn selection(&self) -> Option<&SelectionInfo> {
        self.selection.as_ref()
    }

    pub fn highlight(&self) -> &HighlightEngine {
        &self.highlight
    }

    pub fn screen_culler(&self) -> &ScreenSizeCuller {
        &self.screen_culler
    }

    pub fn occlusion_culler(&self) -> Option<&OcclusionCuller> {
        self.occlusion_culler.as_ref()
    }

    pub fn interaction(&self) -> &InteractionTracker {
        &self.interaction
    }

    pub fn is_pick_pending(&self) -> bool {
        self.picks.is_pending()
    }

    /// Report of the most recent batch rebuild
    pub fn last_build_report(&self) -> &BatchBuildReport {
        &self.last_build
    }

    pub fn first_build_duration_ms(&self) -> Option<f64> {
        self.first_build_ms
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    // ===== MODELS =====

    /// Add a model and batch it according to the current settings
    pub fn load_model(&mut self, desc: ModelDesc) -> Result<ModelKey> {
        let key = self.scene.add_model(desc)?;
        if let Err(e) = self.rebuild(&[key], self.config.batching) {
            self.scene.remove_model(key);
            self.rebuild_visibility();
            return Err(e);
        }
        Ok(key)
    }

    /// Remove a model with its batches; returns false for unknown keys
    pub fn remove_model(&mut self, key: ModelKey) -> bool {
        if self.scene.model(key).is_none() {
            return false;
        }
        self.release_transient_state();
        self.scene.remove_model(key);
        self.rebuild_visibility();
        engine_info!("galaxy3d::BatchingSystem", "Model {:?} removed", key);
        true
    }

    // ===== SETTINGS =====

    pub fn set_batching_enabled(&mut self, enabled: bool) -> Result<()> {
        if self.config.batching.enabled == enabled {
            return Ok(());
        }
        engine_debug!("galaxy3d::BatchingSystem", "Batching {}", if enabled { "enabled" } else { "disabled" });
        self.apply_batching(BatchingConfig { enabled, ..self.config.batching })
    }

    pub fn set_max_vertices_per_batch(&mut self, max_vertices: u32) -> Result<()> {
        config::validate_max_vertices(max_vertices)?;
        if self.config.batching.max_vertices_per_batch == max_vertices {
            return Ok(());
        }
        self.apply_batching(BatchingConfig { max_vertices_per_batch: max_vertices, ..self.config.batching })
    }

    pub fn set_min_bounding_diagonal(&mut self, min_diagonal: f32) -> Result<()> {
        config::validate_min_diagonal(min_diagonal)?;
        if self.config.batching.min_bounding_diagonal == min_diagonal {
            return Ok(());
        }
        self.apply_batching(BatchingConfig { min_bounding_diagonal: min_diagonal, ..self.config.batching })
    }

    pub fn set_occlusion_culling_enabled(&mut self, enabled: bool) {
        if self.occlusion_culler.is_some() == enabled {
            return;
        }
        self.config.occlusion_culling.enabled = enabled;
        if enabled {
            let mut culler = OcclusionCuller::new(OcclusionClassifier::new(), self.config.occlusion_culling.culling);
            culler.rebuild_entries(&self.scene);
            self.occlusion_culler = Some(culler);
        } else if let Some(mut culler) = self.occlusion_culler.take() {
            for key in culler.restore_all() {
                let visible = !self.screen_culler.is_hidden(key);
                self.scene.set_visible(key, visible);
            }
        }
        engine_debug!("galaxy3d::BatchingSystem", "Occlusion culling {}", if enabled { "enabled" } else { "disabled" });
    }

    // ===== INPUT =====

    /// Feed one pointer event observed at `now`.
    ///
    /// Any event other than a plain move cancels a pending pick.
    pub fn handle_pointer_event(&mut self, event: PointerEvent, now: Instant) {
        self.interaction.observe(&event, now);

        if !matches!(event, PointerEvent::Moved { .. }) && self.picks.cancel() {
            engine_debug!("galaxy3d::BatchingSystem", "Pending pick superseded");
        }

        match event {
            PointerEvent::Pressed { position, button: MouseButton::Left } => self.clicks.press(position),
            PointerEvent::Released { position, button: MouseButton::Left } => {
                if self.clicks.release(position) {
                    self.picks.schedule(position, self.frame);
                }
            }
            PointerEvent::Left => self.clicks.cancel(),
            _ => {}
        }
    }

    // ===== FRAME =====

    /// Advance one frame: run a due pick, then interaction culling
    pub fn tick(&mut self, camera: &ViewCamera, now: Instant) -> Result<FrameOutcome> {
        self.frame += 1;
        let mut outcome = FrameOutcome::default();

        if let Some(position) = self.picks.poll(self.frame) {
            outcome.pick = Some(self.pick_at(camera, position)?);
        }

        match self.interaction.update(now) {
            InteractionEdge::Ended => outcome.restored = self.restore_culling(),
            InteractionEdge::Started | InteractionEdge::Unchanged if self.interaction.is_interacting(now) => {
                self.run_culling(camera, &mut outcome);
            }
            _ => {}
        }

        Ok(outcome)
    }

    // ===== SELECTION & HIGHLIGHT =====

    /// Select one source mesh (highlighting it), or clear the selection with `None`
    pub fn select(&mut self, mesh: Option<RenderableKey>) -> Result<Option<SelectionInfo>> {
        let Some(mesh) = mesh else {
            self.clear_highlight();
            return Ok(None);
        };
        let info = PickResolver::selection_info(&self.scene, mesh);
        if info.is_none() {
            engine_warn!("galaxy3d::BatchingSystem", "Cannot select {:?}: not a source mesh", mesh);
            return Ok(None);
        }
        self.highlight.set_highlight(&mut self.scene, &[mesh])?;
        self.selection = info.clone();
        Ok(info)
    }

    /// Highlight every mesh whose name contains `query`; returns the highlighted count
    pub fn highlight_search(&mut self, query: &str) -> Result<usize> {
        self.selection = None;
        self.highlight.highlight_search(&mut self.scene, query)
    }

    pub fn clear_highlight(&mut self) {
        self.highlight.clear(&mut self.scene);
        self.selection = None;
    }

    pub fn highlighted_count(&self) -> usize {
        self.highlight.highlighted_count()
    }

    // ===== STATS & TEARDOWN =====

    pub fn stats(&self) -> SystemStats {
        let batches: Vec<&MergedBatch> = self.scene.model_keys()
            .filter_map(|key| self.scene.model(key))
            .flat_map(|model| model.batches().iter())
            .filter_map(|key| self.scene.batch(*key))
            .collect();

        let culled_count = self.scene.render_instances()
            .filter(|(_, r)| !r.is_visible() && r.class() != RenderableClass::BatchedOriginalHidden)
            .count();

        SystemStats {
            model_count: self.scene.model_count(),
            renderable_count: self.scene.renderable_count(),
            draw_calls: self.scene.draw_call_count(),
            batch_count: batches.len(),
            merged_mesh_count: batches.iter().map(|b| b.ranges().len()).sum(),
            highlighted_count: self.highlight.highlighted_count(),
            culled_count,
            first_build_ms: self.first_build_ms,
        }
    }

    /// Release every model, batch and overlay
    pub fn dispose(&mut self) {
        self.highlight.clear(&mut self.scene);
        self.screen_culler.clear();
        if let Some(culler) = self.occlusion_culler.as_mut() {
            culler.clear();
        }
        self.scene.clear();
        self.interaction.reset();
        self.clicks.cancel();
        self.picks.cancel();
        self.selection = None;
        self.last_build = BatchBuildReport::default();
        engine_info!("galaxy3d::BatchingSystem", "Disposed");
    }

    // ===== INTERNALS =====

    /// Rebuild every model under `batching`; the settings stick only if the build succeeds
    fn apply_batching(&mut self, batching: BatchingConfig) -> Result<()> {
        if !batching.enabled && !self.config.batching.enabled {
            self.config.batching = batching;
            return Ok(());
        }
        let models: Vec<ModelKey> = self.scene.model_keys().collect();
        self.rebuild(&models, batching)
    }

    /// Rebuild batches of `models`: build everything, then swap.
    ///
    /// Nothing is touched (settings included) when building fails.
    fn rebuild(&mut self, models: &[ModelKey], batching: BatchingConfig) -> Result<()> {
        let mut built: Vec<(ModelKey, Vec<MergedBatch>)> = Vec::with_capacity(models.len());
        let mut report = BatchBuildReport::default();

        if batching.enabled {
            let collector = MeshCollector::new(batching.min_bounding_diagonal);
            let builder = BatchBuilder::new(batching.max_vertices_per_batch, self.config.capabilities);
            for model in models {
                let eligible = collector.collect(&self.scene, *model);
                let (batches, model_report) = builder.build(&self.scene, &eligible)?;
                report.batch_count += model_report.batch_count;
                report.merged_mesh_count += model_report.merged_mesh_count;
                report.vertex_count += model_report.vertex_count;
                report.index_count += model_report.index_count;
                report.duration_ms += model_report.duration_ms;
                built.push((*model, batches));
            }
        }
        self.config.batching = batching;

        self.release_transient_state();
        for model in models {
            self.scene.detach_batches(*model);
        }
        for (model, batches) in built {
            if !batches.is_empty() {
                self.scene.attach_batches(model, batches)?;
            }
        }
        self.rebuild_visibility();

        if report.batch_count > 0 && self.first_build_ms.is_none() {
            self.first_build_ms = Some(report.duration_ms);
            engine_info!("galaxy3d::BatchingSystem", "First batch build took {:.2} ms", report.duration_ms);
        }
        self.last_build = report;
        Ok(())
    }

    /// Drop overlays, selection and culling state tied to current batches
    fn release_transient_state(&mut self) {
        self.highlight.clear(&mut self.scene);
        self.selection = None;
        self.restore_culling();
    }

    fn rebuild_visibility(&mut self) {
        self.screen_culler.rebuild_entries(&self.scene);
        if let Some(culler) = self.occlusion_culler.as_mut() {
            culler.rebuild_entries(&self.scene);
        }
    }

    fn pick_at(&mut self, camera: &ViewCamera, position: Vec2) -> Result<PickOutcome> {
        let ray = camera.ray_through(position);
        match PickResolver::pick(&self.scene, &ray) {
            Some(hit) => match self.select(Some(hit.mesh))? {
                Some(info) => Ok(PickOutcome::Selected(info)),
                None => Ok(PickOutcome::Cleared),
            },
            None => {
                self.clear_highlight();
                Ok(PickOutcome::Cleared)
            }
        }
    }

    fn run_culling(&mut self, camera: &ViewCamera, outcome: &mut FrameOutcome) {
        let mut changed = Vec::new();

        let flips = self.screen_culler.tick(&self.scene, camera);
        changed.extend(flips.hidden);
        changed.extend(flips.shown);

        if let Some(culler) = self.occlusion_culler.as_mut() {
            let flips = culler.tick(&self.scene, camera);
            changed.extend(flips.hidden);
            changed.extend(flips.shown);
        }

        for key in changed {
            let visible = self.combined_visibility(key);
            let was_visible = self.scene.renderable(key).map_or(visible, |r| r.is_visible());
            if visible != was_visible {
                self.scene.set_visible(key, visible);
                if visible {
                    outcome.shown += 1;
                } else {
                    outcome.hidden += 1;
                }
            }
        }
    }

    /// Make every culled entry visible again; returns how many changed
    fn restore_culling(&mut self) -> usize {
        let mut restored = self.screen_culler.restore_all();
        if let Some(culler) = self.occlusion_culler.as_mut() {
            restored.extend(culler.restore_all());
        }
        let mut count = 0;
        for key in restored {
            if self.scene.renderable(key).map_or(false, |r| !r.is_visible()) {
                self.scene.set_visible(key, true);
                count += 1;
            }
        }
        count
    }

    fn combined_visibility(&self, key: RenderableKey) -> bool {
        !self.screen_culler.is_hidden(key)
            && !self.occlusion_culler.as_ref().map_or(false, |c| c.is_hidden(key))
    }
}

#[cfg(test)]
#[path = "system_tests.rs"]
mod tests;
