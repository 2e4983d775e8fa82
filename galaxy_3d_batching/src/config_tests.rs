use super::*;
use crate::error::Error;

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_defaults_are_valid() {
    SystemConfig::default().validate().unwrap();
}

#[test]
fn test_default_values() {
    let config = SystemConfig::default();
    assert!(config.batching.enabled);
    assert_eq!(config.screen_culling.threshold_px, 50.0);
    assert_eq!(config.screen_culling.hysteresis_frames, 2);
    assert_eq!(config.occlusion_culling.culling.hysteresis_frames, 3);
    assert!(config.occlusion_culling.culling.budget_per_frame < config.screen_culling.budget_per_frame);
    assert!(!config.occlusion_culling.enabled);
    assert_eq!(config.interaction.idle_window, Duration::from_millis(180));
    assert_eq!(config.interaction.click_threshold_px, 5.0);
}

// ============================================================================
// Range validation
// ============================================================================

#[test]
fn test_max_vertices_bounds() {
    assert!(validate_max_vertices(100).is_ok());
    assert!(validate_max_vertices(100_000).is_ok());
    assert!(matches!(validate_max_vertices(99), Err(Error::InvalidConfig(_))));
    assert!(matches!(validate_max_vertices(100_001), Err(Error::InvalidConfig(_))));
}

#[test]
fn test_min_diagonal_rejects_negative_and_nan() {
    assert!(validate_min_diagonal(0.0).is_ok());
    assert!(validate_min_diagonal(-0.01).is_err());
    assert!(validate_min_diagonal(f32::NAN).is_err());
}

#[test]
fn test_culling_validation() {
    let mut config = CullingConfig::default();
    config.hysteresis_frames = 0;
    assert!(config.validate().is_err());

    let mut config = CullingConfig::default();
    config.budget_per_frame = 0;
    assert!(config.validate().is_err());

    let mut config = CullingConfig::default();
    config.threshold_px = -1.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_interaction_validation() {
    let mut config = InteractionConfig::default();
    config.click_threshold_px = -2.0;
    assert!(config.validate().is_err());
}

// ============================================================================
// Capabilities
// ============================================================================

#[test]
fn test_effective_vertex_cap() {
    let caps = DeviceCapabilities { supports_u32_indices: true };
    assert_eq!(caps.effective_vertex_cap(100_000), 100_000);

    let caps = DeviceCapabilities { supports_u32_indices: false };
    assert_eq!(caps.effective_vertex_cap(100_000), U16_VERTEX_LIMIT);
    assert_eq!(caps.effective_vertex_cap(20_000), 20_000);
}
