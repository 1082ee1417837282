//! Transform-to-vertex ratio: replay an index order through a fresh simulated
//! cache and count misses.
//!
//! Read-only and independent of the optimizer, so it can score both the input
//! and the optimized order.

use std::collections::HashSet;

use crate::cache::VertexCache;
use crate::cfg::check_cache_size;
use crate::error::Result;
use crate::triangles::Triangle;

/// Cache misses (`transforms`) and distinct vertices referenced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TransformRatio {
    pub transforms: usize,
    pub vertex_count: usize,
}

impl TransformRatio {
    #[inline]
    pub fn as_tuple(&self) -> (usize, usize) {
        (self.transforms, self.vertex_count)
    }

    /// Average transforms per vertex (1.0 is optimal); 1.0 when no vertices.
    pub fn atvr(&self) -> f64 {
        if self.vertex_count == 0 {
            return 1.0;
        }
        self.transforms as f64 / self.vertex_count as f64
    }

    /// Average cache misses per triangle; 0.0 for no triangles.
    pub fn acmr(&self, triangles: usize) -> f64 {
        if triangles == 0 {
            return 0.0;
        }
        self.transforms as f64 / triangles as f64
    }
}

impl From<TransformRatio> for (usize, usize) {
    fn from(r: TransformRatio) -> Self {
        r.as_tuple()
    }
}

/// Count transforms for `faces` drawn in order through a cache of `cache_size`.
pub fn estimate_ratio(faces: &[Triangle], cache_size: usize) -> Result<TransformRatio> {
    let ratio = estimate_ratio_strips(faces.iter(), cache_size)?;
    tracing::debug!(
        triangles = faces.len(),
        cache_size,
        transforms = ratio.transforms,
        vertices = ratio.vertex_count,
        "estimate_ratio"
    );
    Ok(ratio)
}

/// Same simulation over arbitrary vertex sequences (e.g. triangle strips).
pub fn estimate_ratio_strips<I, S>(strips: I, cache_size: usize) -> Result<TransformRatio>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u32]>,
{
    check_cache_size(cache_size)?;
    let mut cache = VertexCache::new(cache_size);
    let mut vertices = HashSet::new();
    let mut transforms = 0;
    for strip in strips {
        for &v in strip.as_ref() {
            vertices.insert(v);
            if !cache.touch(v).hit {
                transforms += 1;
            }
        }
    }
    Ok(TransformRatio {
        transforms,
        vertex_count: vertices.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VcacheError;

    #[test]
    fn single_triangle_and_empty() {
        let r = estimate_ratio(&[[4, 9, 2]], 3).unwrap();
        assert_eq!(r.as_tuple(), (3, 3));
        assert_eq!(r.atvr(), 1.0);
        assert_eq!(r.acmr(1), 3.0);
        let empty = estimate_ratio(&[], 8).unwrap();
        assert_eq!(empty.as_tuple(), (0, 0));
        assert_eq!(empty.atvr(), 1.0);
        assert_eq!(empty.acmr(0), 0.0);
    }

    #[test]
    fn rejects_caches_smaller_than_a_triangle() {
        assert_eq!(
            estimate_ratio(&[[0, 1, 2]], 2),
            Err(VcacheError::InvalidCacheSize { cache_size: 2 })
        );
        assert!(estimate_ratio(&[], 0).is_err());
    }

    #[test]
    fn hits_refresh_recency() {
        // 0 is refreshed by the second triangle, so 1 is evicted before it is
        // used again.
        let r = estimate_ratio(&[[0, 1, 2], [0, 3, 1]], 3).unwrap();
        assert_eq!(r.as_tuple(), (5, 4));
    }

    #[test]
    fn strips_match_triangle_replay() {
        let faces = [[0, 1, 2], [2, 1, 3], [2, 3, 4]];
        let strips: Vec<Vec<u32>> = faces.iter().map(|t| t.to_vec()).collect();
        assert_eq!(
            estimate_ratio(&faces, 4).unwrap(),
            estimate_ratio_strips(&strips, 4).unwrap()
        );
        let strip = estimate_ratio_strips([[0u32, 1, 2, 3, 4]], 3).unwrap();
        assert_eq!(strip.as_tuple(), (5, 5));
    }

    #[test]
    fn tuple_conversion() {
        let r = TransformRatio {
            transforms: 24,
            vertex_count: 16,
        };
        let t: (usize, usize) = r.into();
        assert_eq!(t, (24, 16));
        assert_eq!(r.atvr(), 1.5);
    }
}
