/// Batching group keys.
///
/// A merged buffer can only carry one material and one vertex layout, so
/// meshes are grouped by material identity plus the set of attributes they
/// provide. Ordering is total so groups are visited deterministically.

use crate::resource::AttributeSet;
use crate::scene::{MaterialKey, SourceMesh};

/// Material identity combined with the attribute layout signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub material: MaterialKey,
    pub attributes: AttributeSet,
}

impl GroupKey {
    /// Sorted attribute names of the layout half of the key
    pub fn attribute_names(&self) -> Vec<&'static str> {
        self.attributes.names()
    }
}

/// Computes group keys from source meshes
pub struct GroupKeyer;

impl GroupKeyer {
    /// Group key of `mesh`, or None for multi-material meshes
    pub fn key(mesh: &SourceMesh) -> Option<GroupKey> {
        Some(GroupKey {
            material: mesh.material().single()?,
            attributes: mesh.geometry().attribute_set(),
        })
    }
}
