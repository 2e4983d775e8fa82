/*!
# Galaxy 3D Batching

Draw-call batching engine for large interactive scenes.

Thousands of discrete meshes are merged into a few capped batches while
every source mesh stays individually addressable for picking,
highlighting and visibility. The host owns asset loading, the render loop
and camera controls; it feeds models, pointer events and a camera snapshot
into a [`galaxy3d::BatchingSystem`].

## Architecture

- **Scene**: arena of renderables (source meshes, merged batches, overlays)
- **MeshCollector / GroupKeyer / BatchBuilder**: eligibility, grouping, packing and merging
- **MergedBatch / Range / FaceLookup**: per-source ranges and O(1) face resolution
- **PickResolver**: nearest ray hit resolved back to its source mesh
- **HighlightEngine**: selection and search overlays sliced from batch ranges
- **IncrementalCuller**: budgeted, hysteresis-gated screen-size and occlusion culling
*/

// Internal modules
mod error;
mod engine;
mod system;
pub mod log;
pub mod config;
pub mod resource;
pub mod scene;
pub mod batch;
pub mod picking;
pub mod highlight;
pub mod camera;
pub mod culling;
pub mod input;

#[cfg(test)]
mod test_support;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton (logging)
    pub use crate::engine::Engine;

    // System facade
    pub use crate::system::{BatchingSystem, FrameOutcome, PickOutcome, SystemStats};

    // Configuration
    pub use crate::config::{
        BatchingConfig, CullingConfig, DeviceCapabilities, InteractionConfig,
        OcclusionSettings, SystemConfig,
    };

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        // Note: engine_* macros are NOT re-exported here - they are internal only
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Batching sub-module
    pub mod batch {
        pub use crate::batch::*;
    }

    // Picking sub-module
    pub mod picking {
        pub use crate::picking::*;
    }

    // Highlight sub-module
    pub mod highlight {
        pub use crate::highlight::*;
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }

    // Culling sub-module
    pub mod culling {
        pub use crate::culling::*;
    }

    // Input sub-module
    pub mod input {
        pub use crate::input::*;
    }
}

// Re-export math library at crate root
pub use glam;
