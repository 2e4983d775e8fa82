//! Configuration for batching, culling and interaction.
//!
//! Every struct has a `Default` matching the viewer defaults and a
//! `validate()` that rejects out-of-range values. `BatchingSystem`
//! setters validate before applying anything.

use std::time::Duration;
use crate::error::Result;
use crate::engine_bail;

/// Lower bound of `max_vertices_per_batch`
pub const MIN_VERTICES_PER_BATCH: u32 = 100;
/// Upper bound of `max_vertices_per_batch`
pub const MAX_VERTICES_PER_BATCH: u32 = 100_000;
/// Largest vertex count addressable by a 16-bit index buffer
pub const U16_VERTEX_LIMIT: u32 = 65_535;

// ===== BATCHING =====

/// Geometry merging settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchingConfig {
    /// Merge eligible meshes into batches
    pub enabled: bool,
    /// Soft vertex cap per merged batch, in [100, 100000]
    pub max_vertices_per_batch: u32,
    /// Meshes with a world bounding diagonal below this stay unmerged (world units, >= 0)
    pub min_bounding_diagonal: f32,
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_vertices_per_batch: U16_VERTEX_LIMIT,
            min_bounding_diagonal: 0.0,
        }
    }
}

impl BatchingConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        validate_max_vertices(self.max_vertices_per_batch)?;
        validate_min_diagonal(self.min_bounding_diagonal)
    }
}

pub(crate) fn validate_max_vertices(value: u32) -> Result<()> {
    if !(MIN_VERTICES_PER_BATCH..=MAX_VERTICES_PER_BATCH).contains(&value) {
        engine_bail!("galaxy3d::Config", InvalidConfig =>
            "max_vertices_per_batch {} outside [{}, {}]",
            value, MIN_VERTICES_PER_BATCH, MAX_VERTICES_PER_BATCH);
    }
    Ok(())
}

pub(crate) fn validate_min_diagonal(value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        engine_bail!("galaxy3d::Config", InvalidConfig =>
            "min_bounding_diagonal must be finite and >= 0, got {}", value);
    }
    Ok(())
}

// ===== CAPABILITIES =====

/// Result of the runtime capability probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCapabilities {
    /// 32-bit index buffers are supported
    pub supports_u32_indices: bool,
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self { supports_u32_indices: true }
    }
}

impl DeviceCapabilities {
    /// Largest vertex count a single batch may reach on this runtime
    /// given the configured soft cap.
    pub fn effective_vertex_cap(&self, max_vertices_per_batch: u32) -> u32 {
        if self.supports_u32_indices {
            max_vertices_per_batch
        } else {
            max_vertices_per_batch.min(U16_VERTEX_LIMIT)
        }
    }
}

// ===== CULLING =====

/// Interaction culling settings (screen-size or occlusion variant)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CullingConfig {
    /// Projected radius (pixels) below which an entry becomes a hide candidate
    pub threshold_px: f32,
    /// Consecutive agreeing evaluations required to commit a flip
    pub hysteresis_frames: u32,
    /// Entries evaluated per tick
    pub budget_per_frame: usize,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            threshold_px: 50.0,
            hysteresis_frames: 2,
            budget_per_frame: 256,
        }
    }
}

impl CullingConfig {
    /// Defaults for the raycast-based occlusion variant
    pub fn occlusion() -> Self {
        Self {
            threshold_px: 0.0,
            hysteresis_frames: 3,
            budget_per_frame: 32,
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_px.is_finite() || self.threshold_px < 0.0 {
            engine_bail!("galaxy3d::Config", InvalidConfig =>
                "threshold_px must be finite and >= 0, got {}", self.threshold_px);
        }
        if self.hysteresis_frames == 0 {
            engine_bail!("galaxy3d::Config", InvalidConfig => "hysteresis_frames must be >= 1");
        }
        if self.budget_per_frame == 0 {
            engine_bail!("galaxy3d::Config", InvalidConfig => "budget_per_frame must be >= 1");
        }
        Ok(())
    }
}

// ===== INTERACTION =====

/// Pointer interpretation settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionConfig {
    /// Culling stays active this long after the last wheel event
    pub idle_window: Duration,
    /// Pointer travel (pixels) above which a press/release is a drag, not a click
    pub click_threshold_px: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            idle_window: Duration::from_millis(180),
            click_threshold_px: 5.0,
        }
    }
}

impl InteractionConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !self.click_threshold_px.is_finite() || self.click_threshold_px < 0.0 {
            engine_bail!("galaxy3d::Config", InvalidConfig =>
                "click_threshold_px must be finite and >= 0, got {}", self.click_threshold_px);
        }
        Ok(())
    }
}

// ===== SYSTEM =====

/// Full configuration surface of `BatchingSystem`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SystemConfig {
    pub batching: BatchingConfig,
    pub capabilities: DeviceCapabilities,
    pub screen_culling: CullingConfig,
    pub occlusion_culling: OcclusionSettings,
    pub interaction: InteractionConfig,
}

/// Occlusion variant toggle plus its culling parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OcclusionSettings {
    pub enabled: bool,
    pub culling: CullingConfig,
}

impl Default for OcclusionSettings {
    fn default() -> Self {
        Self { enabled: false, culling: CullingConfig::occlusion() }
    }
}

impl SystemConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.batching.validate()?;
        self.screen_culling.validate()?;
        self.occlusion_culling.culling.validate()?;
        self.interaction.validate()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
