use super::*;
use crate::error::Error;

// ============================================================================
// IndexType
// ============================================================================

#[test]
fn test_index_type_size() {
    assert_eq!(IndexType::U16.size_bytes(), 2);
    assert_eq!(IndexType::U32.size_bytes(), 4);
}

#[test]
fn test_index_type_for_vertex_count() {
    assert_eq!(IndexType::for_vertex_count(65_535, true), Some(IndexType::U16));
    assert_eq!(IndexType::for_vertex_count(65_535, false), Some(IndexType::U16));
    assert_eq!(IndexType::for_vertex_count(65_536, true), Some(IndexType::U32));
    assert_eq!(IndexType::for_vertex_count(65_536, false), None);
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_from_u32_narrows() {
    let buffer = IndexBuffer::from_u32(vec![0, 1, 65_535], IndexType::U16).unwrap();
    assert_eq!(buffer, IndexBuffer::U16(vec![0, 1, 65_535]));
}

#[test]
fn test_from_u32_overflow_fails_loudly() {
    let result = IndexBuffer::from_u32(vec![0, 65_536], IndexType::U16);
    assert!(matches!(result, Err(Error::IndexOverflow(_))));
}

#[test]
fn test_accessors() {
    let buffer = IndexBuffer::U32(vec![4, 9, 2]);
    assert_eq!(buffer.len(), 3);
    assert_eq!(buffer.get(1), Some(9));
    assert_eq!(buffer.get(3), None);
    assert_eq!(buffer.max_index(), Some(9));
    assert_eq!(buffer.iter().collect::<Vec<_>>(), vec![4, 9, 2]);
}

// ============================================================================
// Subrange copy
// ============================================================================

#[test]
fn test_slice_keeps_element_type() {
    let buffer = IndexBuffer::U16(vec![0, 1, 2, 3, 4, 5, 6, 7, 8]);
    let slice = buffer.slice(3, 3).unwrap();
    assert_eq!(slice, IndexBuffer::U16(vec![3, 4, 5]));
    assert_eq!(slice.index_type(), IndexType::U16);
}

#[test]
fn test_copy_type_mismatch_is_error() {
    let src = IndexBuffer::U32(vec![0, 1, 2]);
    let mut dst = IndexBuffer::zeroed(IndexType::U16, 3);
    let result = dst.copy_from(0, &src, 0..3);
    assert!(matches!(result, Err(Error::IndexTypeMismatch(_))));
}

#[test]
fn test_copy_out_of_bounds_is_error() {
    let src = IndexBuffer::U16(vec![0, 1, 2]);
    let mut dst = IndexBuffer::zeroed(IndexType::U16, 2);
    assert!(dst.copy_from(0, &src, 0..3).is_err());
    assert!(dst.copy_from(0, &src, 2..5).is_err());
}
