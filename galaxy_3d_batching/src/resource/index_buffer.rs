//! CPU-side index buffers of either width.
//!
//! Merged batches and overlays are built from these. Copies between
//! buffers never convert element types: a `U16` destination only accepts
//! a `U16` source.

use std::ops::Range;
use crate::error::Result;
use crate::config::U16_VERTEX_LIMIT;
use crate::{engine_bail, engine_err};

/// Index element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    /// 16-bit indices (max 65535 vertices)
    U16,
    /// 32-bit indices (max ~4 billion vertices)
    U32,
}

impl IndexType {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }

    /// Width needed to address `vertex_count` vertices.
    ///
    /// Returns `None` when 32-bit indices are required but unsupported;
    /// the caller must split or skip instead of truncating.
    pub fn for_vertex_count(vertex_count: u32, supports_u32: bool) -> Option<IndexType> {
        if vertex_count <= U16_VERTEX_LIMIT {
            Some(IndexType::U16)
        } else if supports_u32 {
            Some(IndexType::U32)
        } else {
            None
        }
    }
}

/// Index data stored at its native width
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBuffer {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexBuffer {
    /// Narrow (or keep) 32-bit values into the requested width.
    ///
    /// Fails with `IndexOverflow` if a value does not fit `U16`.
    pub fn from_u32(indices: Vec<u32>, index_type: IndexType) -> Result<Self> {
        match index_type {
            IndexType::U32 => Ok(IndexBuffer::U32(indices)),
            IndexType::U16 => {
                let mut narrowed = Vec::with_capacity(indices.len());
                for (i, &value) in indices.iter().enumerate() {
                    let v = u16::try_from(value).map_err(|_| engine_err!("galaxy3d::IndexBuffer",
                        IndexOverflow => "index {} at position {} does not fit U16", value, i))?;
                    narrowed.push(v);
                }
                Ok(IndexBuffer::U16(narrowed))
            }
        }
    }

    /// Zero-filled buffer of the given type and length
    pub fn zeroed(index_type: IndexType, len: usize) -> Self {
        match index_type {
            IndexType::U16 => IndexBuffer::U16(vec![0; len]),
            IndexType::U32 => IndexBuffer::U32(vec![0; len]),
        }
    }

    pub fn index_type(&self) -> IndexType {
        match self {
            IndexBuffer::U16(_) => IndexType::U16,
            IndexBuffer::U32(_) => IndexType::U32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            IndexBuffer::U16(v) => v.len(),
            IndexBuffer::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index value at `position`, widened to u32
    pub fn get(&self, position: usize) -> Option<u32> {
        match self {
            IndexBuffer::U16(v) => v.get(position).map(|&i| i as u32),
            IndexBuffer::U32(v) => v.get(position).copied(),
        }
    }

    /// Iterate index values widened to u32
    pub fn iter(&self) -> IndexIter<'_> {
        match self {
            IndexBuffer::U16(v) => IndexIter::U16(v.iter()),
            IndexBuffer::U32(v) => IndexIter::U32(v.iter()),
        }
    }

    /// Largest index value, `None` if empty
    pub fn max_index(&self) -> Option<u32> {
        self.iter().max()
    }

    /// Copy `src[src_range]` into `self` starting at `dst_offset`.
    ///
    /// Both buffers must have the same element type.
    pub fn copy_from(&mut self, dst_offset: usize, src: &IndexBuffer, src_range: Range<usize>) -> Result<()> {
        if src_range.start > src_range.end || src_range.end > src.len() {
            engine_bail!("galaxy3d::IndexBuffer", InvalidGeometry =>
                "source range {:?} out of bounds (len {})", src_range, src.len());
        }
        let count = src_range.end - src_range.start;
        if dst_offset + count > self.len() {
            engine_bail!("galaxy3d::IndexBuffer", InvalidGeometry =>
                "destination range {}..{} out of bounds (len {})", dst_offset, dst_offset + count, self.len());
        }

        match (self, src) {
            (IndexBuffer::U16(dst), IndexBuffer::U16(s)) => {
                dst[dst_offset..dst_offset + count].copy_from_slice(&s[src_range]);
            }
            (IndexBuffer::U32(dst), IndexBuffer::U32(s)) => {
                dst[dst_offset..dst_offset + count].copy_from_slice(&s[src_range]);
            }
            (dst, s) => {
                engine_bail!("galaxy3d::IndexBuffer", IndexTypeMismatch =>
                    "cannot copy {:?} indices into a {:?} buffer", s.index_type(), dst.index_type());
            }
        }
        Ok(())
    }

    /// New buffer of the same type holding `[start, start + count)`
    pub fn slice(&self, start: usize, count: usize) -> Result<IndexBuffer> {
        let mut out = IndexBuffer::zeroed(self.index_type(), count);
        out.copy_from(0, self, start..start + count)?;
        Ok(out)
    }
}

/// Iterator over widened index values
pub enum IndexIter<'a> {
    U16(std::slice::Iter<'a, u16>),
    U32(std::slice::Iter<'a, u32>),
}

impl Iterator for IndexIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        match self {
            IndexIter::U16(it) => it.next().map(|&i| i as u32),
            IndexIter::U32(it) => it.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            IndexIter::U16(it) => it.size_hint(),
            IndexIter::U32(it) => it.size_hint(),
        }
    }
}

impl ExactSizeIterator for IndexIter<'_> {}

#[cfg(test)]
#[path = "index_buffer_tests.rs"]
mod tests;
