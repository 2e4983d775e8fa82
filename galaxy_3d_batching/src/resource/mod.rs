//! Resource module
//!
//! CPU-side geometry and index buffers consumed by the batching core.

pub mod geometry;
pub mod index_buffer;

pub use geometry::{AttributeSet, Geometry, GeometryDesc, Tangents};
pub use index_buffer::{IndexBuffer, IndexIter, IndexType};
