/// Budgeted, round-robin visibility culling.
///
/// Each tick evaluates at most `budget_per_frame` entries starting where
/// the previous tick stopped, so the per-frame cost is bounded whatever
/// the scene size. The culler never writes visibility itself: it reports
/// committed flips and the owner combines them with other cullers.

use rustc_hash::FxHashMap;
use crate::camera::ViewCamera;
use crate::config::CullingConfig;
use crate::scene::{RenderableKey, Scene};
use crate::engine_trace;
use super::classifier::{CullClassifier, VisibilityEntry};
use super::hysteresis::CullState;

/// Flips committed by one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CullFlips {
    pub hidden: Vec<RenderableKey>,
    pub shown: Vec<RenderableKey>,
    pub evaluated: usize,
}

impl CullFlips {
    pub fn is_empty(&self) -> bool {
        self.hidden.is_empty() && self.shown.is_empty()
    }
}

pub struct IncrementalCuller<C: CullClassifier> {
    classifier: C,
    config: CullingConfig,
    entries: Vec<VisibilityEntry>,
    states: Vec<CullState>,
    index: FxHashMap<RenderableKey, usize>,
    cursor: usize,
}

impl<C: CullClassifier> IncrementalCuller<C> {
    pub fn new(classifier: C, config: CullingConfig) -> Self {
        Self {
            classifier,
            config,
            entries: Vec::new(),
            states: Vec::new(),
            index: FxHashMap::default(),
            cursor: 0,
        }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn config(&self) -> &CullingConfig {
        &self.config
    }

    /// Replace the entry list; every state restarts at Visible
    pub fn set_entries(&mut self, entries: Vec<VisibilityEntry>) {
        self.index = entries.iter().enumerate().map(|(i, e)| (e.target, i)).collect();
        self.states = vec![CullState::Visible; entries.len()];
        self.entries = entries;
        self.cursor = 0;
    }

    /// Derive entries from every renderable currently attached for each model
    pub fn rebuild_entries(&mut self, scene: &Scene) {
        let entries = scene.model_keys()
            .flat_map(|model| scene.attached_renderables(model))
            .filter_map(|target| VisibilityEntry::for_renderable(scene, target))
            .collect();
        self.set_entries(entries);
    }

    pub fn entries(&self) -> &[VisibilityEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state_of(&self, target: RenderableKey) -> Option<CullState> {
        self.index.get(&target).map(|i| self.states[*i])
    }

    /// True if this culler currently hides `target`
    pub fn is_hidden(&self, target: RenderableKey) -> bool {
        self.state_of(target).map_or(false, |state| !state.is_visible())
    }

    pub fn hidden_count(&self) -> usize {
        self.states.iter().filter(|s| !s.is_visible()).count()
    }

    /// Evaluate the next window of entries
    pub fn tick(&mut self, scene: &Scene, camera: &ViewCamera) -> CullFlips {
        let mut flips = CullFlips::default();
        let len = self.entries.len();
        if len == 0 {
            return flips;
        }

        let window = self.config.budget_per_frame.min(len);
        for step in 0..window {
            let i = (self.cursor + step) % len;
            let entry = &self.entries[i];
            let before = self.states[i];
            let wants_visible = self.classifier.wants_visible(scene, camera, entry);
            let after = before.step(wants_visible, self.config.hysteresis_frames);

            match (before.is_visible(), after.is_visible()) {
                (true, false) => flips.hidden.push(entry.target),
                (false, true) => flips.shown.push(entry.target),
                _ => {}
            }
            self.states[i] = after;
        }
        self.cursor = (self.cursor + window) % len;
        flips.evaluated = window;

        if !flips.is_empty() {
            engine_trace!("galaxy3d::VisibilityCuller", "{}: {} hidden, {} shown",
                self.classifier.name(), flips.hidden.len(), flips.shown.len());
        }
        flips
    }

    /// Reset every entry to Visible; returns the entries that were hidden
    pub fn restore_all(&mut self) -> Vec<RenderableKey> {
        let mut restored = Vec::new();
        for (state, entry) in self.states.iter_mut().zip(&self.entries) {
            if !state.is_visible() {
                restored.push(entry.target);
            }
            *state = CullState::Visible;
        }
        self.cursor = 0;
        restored
    }

    /// Drop all entries and state
    pub fn clear(&mut self) {
        self.entries.clear();
        self.states.clear();
        self.index.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
#[path = "incremental_tests.rs"]
mod tests;
