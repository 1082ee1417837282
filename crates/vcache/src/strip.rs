//! Triangle strips from an already ordered triangle list.
//!
//! Strip `s` encodes triangle `k` as `(s[k], s[k+1], s[k+2])` for even `k` and
//! `(s[k+1], s[k], s[k+2])` for odd `k`, so every triangle keeps its winding.

use crate::cfg::OptimizeCfg;
use crate::error::Result;
use crate::optimize::reorder_with;
use crate::triangles::Triangle;

/// Orientation-preserving vertex permutations of a triangle.
const ROTATIONS: [[usize; 3]; 3] = [[0, 1, 2], [1, 2, 0], [2, 0, 1]];

/// Join consecutive triangles into strips without reordering them.
///
/// The second triangle of a strip may rotate the first; later triangles must
/// continue through the last edge with the right parity, otherwise a new strip
/// starts. No stitching between strips.
pub fn stable_stripify(triangles: &[Triangle]) -> Vec<Vec<u32>> {
    let mut strips = Vec::new();
    let mut strip: Vec<u32> = Vec::new();
    for &tri in triangles {
        let joined = match strip.len() {
            0 => {
                strip.extend_from_slice(&tri);
                true
            }
            3 => join_pair(&mut strip, tri),
            _ => extend_strip(&mut strip, tri),
        };
        if !joined {
            strips.push(std::mem::replace(&mut strip, tri.to_vec()));
        }
    }
    if !strip.is_empty() {
        strips.push(strip);
    }
    strips
}

/// Cache-optimize, then stripify.
pub fn stripify(triangles: &[Triangle], vertex_count: Option<usize>) -> Result<Vec<Vec<u32>>> {
    stripify_with(triangles, vertex_count, &OptimizeCfg::default())
}

pub fn stripify_with(
    triangles: &[Triangle],
    vertex_count: Option<usize>,
    cfg: &OptimizeCfg,
) -> Result<Vec<Vec<u32>>> {
    let ordered = reorder_with(triangles, vertex_count, cfg)?;
    Ok(stable_stripify(&ordered))
}

/// Triangles encoded by a strip, in strip order.
pub fn strip_triangles(strip: &[u32]) -> Vec<Triangle> {
    strip
        .windows(3)
        .enumerate()
        .map(|(k, w)| {
            if k % 2 == 0 {
                [w[0], w[1], w[2]]
            } else {
                [w[1], w[0], w[2]]
            }
        })
        .collect()
}

fn join_pair(strip: &mut Vec<u32>, tri: Triangle) -> bool {
    for [v0, v1, v2] in ROTATIONS {
        for [o0, o1, o2] in ROTATIONS {
            if strip[v1] == tri[o1] && strip[v2] == tri[o0] {
                let joined = [strip[v0], strip[v1], strip[v2], tri[o2]];
                *strip = joined.to_vec();
                return true;
            }
        }
    }
    false
}

fn extend_strip(strip: &mut Vec<u32>, tri: Triangle) -> bool {
    let n = strip.len();
    let (a, b) = (strip[n - 2], strip[n - 1]);
    for [o0, o1, o2] in ROTATIONS {
        let shares_edge = if n % 2 == 1 {
            a == tri[o1] && b == tri[o0]
        } else {
            a == tri[o0] && b == tri[o1]
        };
        if shares_edge {
            strip.push(tri[o2]);
            return true;
        }
    }
    false
}
