//! Greedy triangle reordering for post-transform vertex cache reuse.
//!
//! Purpose
//! - Reorder a triangle list so that consecutive triangles share vertices that
//!   are still resident in a small simulated cache (Forsyth, "Linear-Speed
//!   Vertex Cache Optimisation", 2006).
//!
//! Model
//! - Each step scores the live triangles reachable from the cache contents
//!   (sum of their vertex scores) and emits the best one; ties go to the
//!   earliest input position. An empty pool restarts from the best live
//!   triangle of the whole mesh, kept in a lazily refreshed priority queue:
//!   outside the cache only valences change, so only the neighbors of an
//!   emitted triangle are requeued.
//! - Emitting updates valences, touches the cache with the triangle's vertices
//!   in input order, and rescores every resident or just-evicted vertex.
//! - Triangles taken from the pool are written lowest-index-first (winding
//!   kept); restart triangles are written as given.
//! - Vertices are renumbered densely before the run, so memory follows the
//!   number of referenced vertices, not the largest index.
//!
//! Code cross-refs: `cache::VertexCache`, `score::VertexScore`,
//! `adjacency::Adjacency`, `triangles::canonical_shift`.

mod runner;

use crate::cfg::OptimizeCfg;
use crate::error::Result;
use crate::score::VertexScore;
use crate::triangles::{infer_vertex_count, rotate_left, validate_indices, Triangle};

use runner::Optimizer;

/// One output triangle and where it came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Emitted {
    /// Position of the triangle in the input list.
    pub source: usize,
    /// Left rotation (0..=2) applied to the input vertex order.
    pub rotation: usize,
    /// Output vertices: `rotate_left(faces[source], rotation)`.
    pub triangle: Triangle,
}

/// Reorder `faces` with the default tuning.
///
/// `vertex_count` defaults to one plus the largest referenced index.
pub fn reorder(faces: &[Triangle], vertex_count: Option<usize>) -> Result<Vec<Triangle>> {
    reorder_with(faces, vertex_count, &OptimizeCfg::default())
}

/// Reorder `faces` with an explicit configuration.
pub fn reorder_with(
    faces: &[Triangle],
    vertex_count: Option<usize>,
    cfg: &OptimizeCfg,
) -> Result<Vec<Triangle>> {
    Ok(reorder_tracked(faces, vertex_count, cfg)?
        .into_iter()
        .map(|e| e.triangle)
        .collect())
}

/// Reorder and report, per output triangle, its input position and rotation.
pub fn reorder_tracked(
    faces: &[Triangle],
    vertex_count: Option<usize>,
    cfg: &OptimizeCfg,
) -> Result<Vec<Emitted>> {
    let scorer = VertexScore::new(cfg.score)?;
    let vertex_count = vertex_count.unwrap_or_else(|| infer_vertex_count(faces));
    validate_indices(faces, vertex_count)?;
    if faces.is_empty() {
        return Ok(Vec::new());
    }
    let (local, referenced) = compact(faces);
    let mut opt = Optimizer::new(&local, referenced, scorer);
    let mut out = opt.run();
    for e in &mut out {
        e.triangle = rotate_left(faces[e.source], e.rotation);
    }
    tracing::debug!(
        triangles = faces.len(),
        vertices = vertex_count,
        referenced,
        cache_size = cfg.score.cache_size,
        restarts = opt.restarts(),
        "reorder"
    );
    Ok(out)
}

/// Renumber the referenced vertices onto `0..n`, keeping their relative order.
///
/// Per-vertex tables are then sized by the vertices actually used, whatever
/// `vertex_count` or the largest index is. Order preservation keeps the
/// lowest-index-first rotation unchanged.
fn compact(faces: &[Triangle]) -> (Vec<Triangle>, usize) {
    let mut ids: Vec<u32> = faces.iter().flatten().copied().collect();
    ids.sort_unstable();
    ids.dedup();
    let local = faces
        .iter()
        .map(|tri| tri.map(|v| ids.binary_search(&v).unwrap_or_else(|i| i) as u32))
        .collect();
    (local, ids.len())
}
