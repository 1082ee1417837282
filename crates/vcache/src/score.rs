//! Vertex score: the priority that drives triangle selection.
//!
//! score(p, n) = -1                      if n == 0 (vertex has no live triangle)
//!             = cache(p) + valence(n)   otherwise
//!
//! cache(p)   = 0                                   not resident
//!            = last_tri_score                      p in 0..3
//!            = ((C - p) / (C - 3))^decay_power     p >= 3, C = cache size
//! valence(n) = boost_scale * n^(-boost_power)
//!
//! Both terms are tabulated once per run; valences beyond the table fall back
//! to the closed form.

use crate::cfg::ScoreCfg;
use crate::error::Result;

const VALENCE_TABLE_SIZE: usize = 32;

/// Score of a vertex with no remaining triangles.
pub const DEAD_VERTEX_SCORE: f64 = -1.0;

#[derive(Clone, Debug)]
pub struct VertexScore {
    cfg: ScoreCfg,
    cache: Vec<f64>,
    valence: Vec<f64>,
}

impl Default for VertexScore {
    fn default() -> Self {
        Self::tabulate(ScoreCfg::default())
    }
}

impl VertexScore {
    pub fn new(cfg: ScoreCfg) -> Result<Self> {
        cfg.validate()?;
        Ok(Self::tabulate(cfg))
    }

    fn tabulate(cfg: ScoreCfg) -> Self {
        let cache = (0..cfg.cache_size)
            .map(|pos| cache_term(&cfg, pos))
            .collect();
        let valence = (0..VALENCE_TABLE_SIZE)
            .map(|n| valence_term(&cfg, n))
            .collect();
        Self {
            cfg,
            cache,
            valence,
        }
    }

    #[inline]
    pub fn cfg(&self) -> &ScoreCfg {
        &self.cfg
    }

    /// Cache term for a slot; `None` (not resident) scores 0.
    #[inline]
    pub fn cache_score(&self, cache_position: Option<usize>) -> f64 {
        cache_position
            .and_then(|pos| self.cache.get(pos).copied())
            .unwrap_or(0.0)
    }

    /// Valence term for the current live-triangle count.
    #[inline]
    pub fn valence_score(&self, live_triangles: usize) -> f64 {
        match self.valence.get(live_triangles) {
            Some(&v) => v,
            None => valence_term(&self.cfg, live_triangles),
        }
    }

    #[inline]
    pub fn score(&self, cache_position: Option<usize>, live_triangles: usize) -> f64 {
        if live_triangles == 0 {
            return DEAD_VERTEX_SCORE;
        }
        self.cache_score(cache_position) + self.valence_score(live_triangles)
    }
}

fn cache_term(cfg: &ScoreCfg, pos: usize) -> f64 {
    if pos < 3 {
        // vertices of the triangle just emitted
        return cfg.last_tri_score;
    }
    let c = cfg.cache_size as f64;
    ((c - pos as f64) / (c - 3.0)).powf(cfg.cache_decay_power)
}

fn valence_term(cfg: &ScoreCfg, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    cfg.valence_boost_scale * (n as f64).powf(-cfg.valence_boost_power)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VcacheError;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn published_values() {
        let s = VertexScore::default();
        // (cache position, valence, expected)
        let table = [
            (None, 1, 2.0),
            (None, 2, 1.414),
            (None, 3, 1.155),
            (Some(0), 1, 2.75),
            (Some(1), 2, 2.164),
            (Some(2), 3, 1.905),
            (Some(3), 1, 3.0),
            (Some(3), 2, 2.414),
            (Some(4), 1, 2.949),
            (Some(4), 3, 2.104),
            (Some(5), 2, 2.312),
        ];
        for (pos, n, want) in table {
            let got = s.score(pos, n);
            assert!(close(got, want), "score({pos:?}, {n}) = {got}, want {want}");
        }
    }

    #[test]
    fn dead_vertex_scores_minus_one_anywhere() {
        let s = VertexScore::default();
        for pos in [None, Some(0), Some(3), Some(31)] {
            assert_eq!(s.score(pos, 0), DEAD_VERTEX_SCORE);
        }
    }

    #[test]
    fn decays_along_the_cache_and_with_valence() {
        let s = VertexScore::default();
        let top = s.cache_score(Some(0));
        assert_eq!(top, s.cache_score(Some(2)));
        for pos in 3..31 {
            assert!(s.cache_score(Some(pos)) > s.cache_score(Some(pos + 1)));
        }
        assert!(s.cache_score(Some(31)) > 0.0);
        assert_eq!(s.cache_score(None), 0.0);
        assert_eq!(s.cache_score(Some(32)), 0.0);
        for n in 1..100 {
            assert!(s.valence_score(n) > s.valence_score(n + 1));
        }
        assert!(s.valence_score(1) <= 2.0);
    }

    #[test]
    fn table_and_closed_form_agree() {
        let s = VertexScore::default();
        let cfg = *s.cfg();
        for n in 0..64 {
            assert_eq!(s.valence_score(n), valence_term(&cfg, n));
        }
    }

    #[test]
    fn small_caches_only_have_top_slots() {
        let cfg = ScoreCfg {
            cache_size: 3,
            ..ScoreCfg::default()
        };
        let s = VertexScore::new(cfg).unwrap();
        assert_eq!(s.cache_score(Some(2)), 0.75);
        assert_eq!(s.cache_score(Some(3)), 0.0);
        let err = VertexScore::new(ScoreCfg {
            cache_size: 1,
            ..ScoreCfg::default()
        })
        .unwrap_err();
        assert_eq!(err, VcacheError::InvalidCacheSize { cache_size: 1 });
    }
}
