//! Small reproducible meshes for tests, benches and demos.
//!
//! Determinism: `shuffled` draws from `StdRng::seed_from_u64(seed)`, so the
//! same `(faces, seed)` always yields the same order.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::triangles::Triangle;

/// Regular grid of `rows x cols` vertices (`i = row * cols + col`), two
/// triangles per quad, quads in row-major order.
///
/// Fewer than two rows or columns yields no triangles.
pub fn grid(rows: usize, cols: usize) -> Vec<Triangle> {
    if rows < 2 || cols < 2 {
        return Vec::new();
    }
    let mut faces = Vec::with_capacity(2 * (rows - 1) * (cols - 1));
    for r in 0..rows - 1 {
        for c in 0..cols - 1 {
            let i = (r * cols + c) as u32;
            let below = i + cols as u32;
            faces.push([i, below, i + 1]);
            faces.push([below, i + 1, below + 1]);
        }
    }
    faces
}

/// Same triangles in a seeded random order.
pub fn shuffled(faces: &[Triangle], seed: u64) -> Vec<Triangle> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut out = faces.to_vec();
    out.shuffle(&mut rng);
    out
}
