//! Triangle helpers: rotations, index validation, deduplication.

use std::collections::HashSet;

use crate::error::{Result, VcacheError};

/// Three vertex indices, in winding order.
pub type Triangle = [u32; 3];

/// Rotate left by `k` (mod 3): `[t[k], t[k+1], t[k+2]]`. Winding is preserved.
#[inline]
pub fn rotate_left(tri: Triangle, k: usize) -> Triangle {
    let k = k % 3;
    [tri[k], tri[(k + 1) % 3], tri[(k + 2) % 3]]
}

/// Left shift that yields the lexicographically smallest rotation.
pub fn canonical_shift(tri: Triangle) -> usize {
    (0..3)
        .min_by_key(|&k| rotate_left(tri, k))
        .unwrap_or(0)
}

/// Lowest-index-first rotation (lexicographic minimum among the three cyclic
/// rotations). `[4, 1, 5]` becomes `[1, 5, 4]`.
#[inline]
pub fn canonical_rotation(tri: Triangle) -> Triangle {
    rotate_left(tri, canonical_shift(tri))
}

/// Two or three equal indices.
#[inline]
pub fn is_degenerate(tri: Triangle) -> bool {
    tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2]
}

/// One plus the largest index referenced; 0 for an empty list.
pub fn infer_vertex_count(faces: &[Triangle]) -> usize {
    faces
        .iter()
        .flat_map(|t| t.iter())
        .max()
        .map_or(0, |&m| (m as usize).saturating_add(1))
}

/// Reject the first triangle that references a vertex `>= vertex_count`.
pub fn validate_indices(faces: &[Triangle], vertex_count: usize) -> Result<()> {
    for (triangle, tri) in faces.iter().enumerate() {
        if let Some(&vertex) = tri.iter().find(|&&v| v as usize >= vertex_count) {
            return Err(VcacheError::InvalidIndex {
                triangle,
                vertex,
                vertex_count,
            });
        }
    }
    Ok(())
}

/// Drop degenerate triangles and repeats (same triangle up to rotation).
///
/// Survivors come out in canonical rotation, first occurrence order. Opposite
/// windings are distinct triangles.
pub fn unique_triangles(faces: &[Triangle]) -> Vec<Triangle> {
    let mut seen = HashSet::with_capacity(faces.len());
    faces
        .iter()
        .copied()
        .filter(|&t| !is_degenerate(t))
        .map(canonical_rotation)
        .filter(|t| seen.insert(*t))
        .collect()
}
