//! Error types for the Galaxy3D batching engine
//!
//! Ineligible meshes are never errors: the collector filters them out.
//! Errors are reserved for invalid configuration, malformed descriptors
//! and index buffer misuse.

use std::fmt;

/// Result type for Galaxy3D batching operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D batching errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A configuration value is outside its validated range
    InvalidConfig(String),

    /// A geometry descriptor is malformed (attribute length mismatch, index out of range, ...)
    InvalidGeometry(String),

    /// A key does not refer to a live resource, or refers to the wrong kind of resource
    InvalidResource(String),

    /// Index values do not fit the requested index width
    IndexOverflow(String),

    /// Source and destination index buffers have different element types
    IndexTypeMismatch(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Error::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::IndexOverflow(msg) => write!(f, "Index overflow: {}", msg),
            Error::IndexTypeMismatch(msg) => write!(f, "Index type mismatch: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Build an `Error`, logging it at ERROR severity first.
///
/// The variant defaults to `InvalidResource`; pass `Variant =>` before the
/// format string to pick another one.
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("galaxy3d::Scene", "Renderable {:?} not found", key);
/// let err = engine_err!("galaxy3d::Config", InvalidConfig => "budget must be > 0");
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $variant:ident => $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::$variant(message)
    }};
    ($source:expr, $($arg:tt)*) => {
        $crate::engine_err!($source, InvalidResource => $($arg)*)
    };
}

/// Log and return an `Error` from the enclosing function.
///
/// Same arguments as [`engine_err!`].
#[macro_export]
macro_rules! engine_bail {
    ($($arg:tt)*) => {
        return Err($crate::engine_err!($($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
