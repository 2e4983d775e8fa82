//! Integration tests for engine logging during batching
//!
//! The logger is global: every test is #[serial].
//!
//! Run with: cargo test --test logging_integration_tests


use galaxy_3d_batching::galaxy3d::{BatchingConfig, BatchingSystem, DeviceCapabilities, Engine, SystemConfig};
use galaxy_3d_batching::galaxy3d::log::{Logger, LogEntry, LogSeverity};
use galaxy_3d_batching::galaxy3d::scene::ModelDesc;
use galaxy_3d_batching::glam::Mat4;
use scene_test_utils::{mesh, strip_desc, strip_model};
use serial_test::serial;
use std::sync::{Arc, Mutex};

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn from_source(entries: &Arc<Mutex<Vec<LogEntry>>>, source: &str) -> Vec<LogEntry> {
    entries.lock().unwrap().iter().filter(|e| e.source == source).cloned().collect()
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_build_logs_duration() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);
    Engine::set_min_severity(LogSeverity::Info);

    let mut system = BatchingSystem::new(SystemConfig::default()).unwrap();
    let desc = strip_model(&mut system, "m", 10, 20);
    system.load_model(desc).unwrap();

    let builds = from_source(&entries, "galaxy3d::BatchBuilder");
    assert_eq!(builds.len(), 1);
    assert_eq!(builds[0].severity, LogSeverity::Info);
    assert!(builds[0].message.contains("1 batches from 10 meshes"));
    assert!(builds[0].message.contains(" ms"));

    let first = from_source(&entries, "galaxy3d::BatchingSystem");
    assert!(first.iter().any(|e| e.message.starts_with("First batch build took")));

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_oversized_mesh_warns_without_u32() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);
    Engine::set_min_severity(LogSeverity::Info);

    let mut system = BatchingSystem::new(SystemConfig {
        batching: BatchingConfig { max_vertices_per_batch: 100_000, ..Default::default() },
        capabilities: DeviceCapabilities { supports_u32_indices: false },
        ..Default::default()
    })
    .unwrap();
    let material = system.scene_mut().add_material("m");
    system.load_model(ModelDesc {
        name: "huge".to_string(),
        meshes: vec![
            mesh("huge", strip_desc(70_000), material, Mat4::IDENTITY),
            mesh("small_0", strip_desc(10), material, Mat4::IDENTITY),
            mesh("small_1", strip_desc(10), material, Mat4::IDENTITY),
        ],
    })
    .unwrap();

    let warnings: Vec<LogEntry> = from_source(&entries, "galaxy3d::BatchBuilder")
        .into_iter()
        .filter(|e| e.severity == LogSeverity::Warn)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("left unbatched"));
    assert_eq!(system.stats().merged_mesh_count, 2);
    assert_eq!(system.stats().draw_calls, 2);

    Engine::reset_logger();
}

#[test]
#[serial]
fn test_integration_invalid_setting_logs_error() {
    let (logger, entries) = TestLogger::new();
    Engine::set_logger(logger);

    let mut system = BatchingSystem::new(SystemConfig::default()).unwrap();
    assert!(system.set_max_vertices_per_batch(50).is_err());

    let errors = from_source(&entries, "galaxy3d::Config");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].severity, LogSeverity::Error);
    assert!(errors[0].file.is_some());
    assert!(errors[0].line.is_some());

    Engine::reset_logger();
}
