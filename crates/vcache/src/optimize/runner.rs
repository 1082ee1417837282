//! Optimizer state for a single run.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::adjacency::{distinct_vertices, Adjacency};
use crate::cache::VertexCache;
use crate::score::VertexScore;
use crate::triangles::{canonical_shift, rotate_left, Triangle};

use super::Emitted;

#[derive(Clone, Copy, Debug)]
pub(super) struct VertexState {
    pub cache_position: Option<usize>,
    /// Always `scorer.score(cache_position, live_count)`.
    pub score: f64,
}

/// Mutable tables owned by one `reorder` call; nothing outlives it.
pub(super) struct Optimizer<'a> {
    faces: &'a [Triangle],
    scorer: VertexScore,
    adjacency: Adjacency,
    cache: VertexCache,
    vertices: Vec<VertexState>,
    emitted: Vec<bool>,
    remaining: usize,
    restarts: usize,
    /// Live triangles by restart score. Entries go stale when a vertex loses a
    /// triangle; the current entry of every live triangle is always queued.
    restart_queue: BinaryHeap<RestartEntry>,
}

/// Restart candidate: max-heap on score, then on earlier input position.
#[derive(Clone, Copy, Debug)]
struct RestartEntry {
    score: f64,
    t: usize,
}

impl PartialEq for RestartEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RestartEntry {}

impl PartialOrd for RestartEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RestartEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.t.cmp(&self.t))
    }
}

/// Score of `tri` with none of its vertices resident.
///
/// When the candidate pool is empty no live triangle touches the cache, so this
/// equals the regular triangle score for every live triangle.
fn restart_score(scorer: &VertexScore, adjacency: &Adjacency, tri: Triangle) -> f64 {
    tri.iter()
        .map(|&v| scorer.score(None, adjacency.live_count(v)))
        .sum()
}

/// Total order on candidates: higher score first, then earlier input.
#[inline]
fn beats(score: f64, t: usize, best: Option<(f64, usize)>) -> bool {
    match best {
        None => true,
        Some((best_score, best_t)) => score > best_score || (score == best_score && t < best_t),
    }
}

impl<'a> Optimizer<'a> {
    pub fn new(faces: &'a [Triangle], vertex_count: usize, scorer: VertexScore) -> Self {
        let adjacency = Adjacency::build(faces, vertex_count);
        let vertices = (0..vertex_count)
            .map(|v| VertexState {
                cache_position: None,
                score: scorer.score(None, adjacency.live_count(v as u32)),
            })
            .collect();
        let cache = VertexCache::new(scorer.cfg().cache_size);
        let restart_queue = faces
            .iter()
            .enumerate()
            .map(|(t, &tri)| RestartEntry {
                score: restart_score(&scorer, &adjacency, tri),
                t,
            })
            .collect();
        Self {
            faces,
            scorer,
            adjacency,
            cache,
            vertices,
            emitted: vec![false; faces.len()],
            remaining: faces.len(),
            restarts: 0,
            restart_queue,
        }
    }

    /// Number of steps that found no candidate in the cache.
    pub fn restarts(&self) -> usize {
        self.restarts
    }

    pub fn run(&mut self) -> Vec<Emitted> {
        let mut out = Vec::with_capacity(self.remaining);
        while let Some(e) = self.step() {
            out.push(e);
        }
        out
    }

    /// Select, emit and account one triangle; `None` once all are emitted.
    pub fn step(&mut self) -> Option<Emitted> {
        if self.remaining == 0 {
            return None;
        }
        let (t, rotation) = match self.best_in_cache() {
            Some(t) => (t, canonical_shift(self.faces[t])),
            None => {
                self.restarts += 1;
                tracing::trace!(remaining = self.remaining, "candidate pool empty; restarting");
                (self.best_overall()?, 0)
            }
        };
        self.emit(t);
        Some(Emitted {
            source: t,
            rotation,
            triangle: rotate_left(self.faces[t], rotation),
        })
    }

    fn triangle_score(&self, t: usize) -> f64 {
        self.faces[t]
            .iter()
            .map(|&v| self.vertices[v as usize].score)
            .sum()
    }

    /// Best live triangle touching a resident vertex.
    fn best_in_cache(&self) -> Option<usize> {
        let mut best: Option<(f64, usize)> = None;
        for &v in self.cache.as_slice() {
            for &t in self.adjacency.pending(v) {
                let s = self.triangle_score(t);
                if beats(s, t, best) {
                    best = Some((s, t));
                }
            }
        }
        best.map(|(_, t)| t)
    }

    /// Best live triangle of the whole mesh. Only valid while the candidate
    /// pool is empty; stale queue entries are dropped on the way.
    fn best_overall(&mut self) -> Option<usize> {
        while let Some(entry) = self.restart_queue.pop() {
            if self.emitted[entry.t] {
                continue;
            }
            let current = restart_score(&self.scorer, &self.adjacency, self.faces[entry.t]);
            if entry.score == current {
                return Some(entry.t);
            }
        }
        None
    }

    /// Requeue the live triangles around `tri` after their valences dropped.
    fn requeue_neighbors(&mut self, tri: Triangle) {
        for v in distinct_vertices(tri) {
            for &u in self.adjacency.pending(v) {
                let score = restart_score(&self.scorer, &self.adjacency, self.faces[u]);
                self.restart_queue.push(RestartEntry { score, t: u });
            }
        }
        if self.restart_queue.len() > 2 * self.faces.len() {
            self.restart_queue = (0..self.faces.len())
                .filter(|&t| !self.emitted[t])
                .map(|t| RestartEntry {
                    score: restart_score(&self.scorer, &self.adjacency, self.faces[t]),
                    t,
                })
                .collect();
        }
    }

    fn emit(&mut self, t: usize) {
        let tri = self.faces[t];
        self.emitted[t] = true;
        self.remaining -= 1;
        self.adjacency.remove(t, tri);
        self.requeue_neighbors(tri);

        let mut evicted: Vec<u32> = Vec::with_capacity(3);
        for v in tri {
            if let Some(e) = self.cache.touch(v).evicted {
                evicted.push(e);
            }
        }
        for e in evicted {
            // a later corner of the same triangle may have brought it back
            if !self.cache.contains(e) {
                let live = self.adjacency.live_count(e);
                let state = &mut self.vertices[e as usize];
                state.cache_position = None;
                state.score = self.scorer.score(None, live);
            }
        }
        // every resident slot may have shifted; the emitted corners are resident
        for (pos, &v) in self.cache.as_slice().iter().enumerate() {
            let live = self.adjacency.live_count(v);
            let state = &mut self.vertices[v as usize];
            state.cache_position = Some(pos);
            state.score = self.scorer.score(Some(pos), live);
        }
    }

    #[cfg(test)]
    pub fn check_invariants(&self) {
        let live_slots: usize = (0..self.faces.len())
            .filter(|&t| !self.emitted[t])
            .map(|t| distinct_vertices(self.faces[t]).count())
            .sum();
        assert_eq!(self.adjacency.total_live(), live_slots);
        assert_eq!(self.emitted.iter().filter(|&&e| !e).count(), self.remaining);
        for (v, state) in self.vertices.iter().enumerate() {
            let v = v as u32;
            assert_eq!(state.cache_position, self.cache.position_of(v));
            let want = self
                .scorer
                .score(state.cache_position, self.adjacency.live_count(v));
            assert_eq!(state.score, want, "stale score for vertex {v}");
            for &t in self.adjacency.pending(v) {
                assert!(!self.emitted[t]);
            }
        }
        let queued: std::collections::HashSet<(usize, u64)> = self
            .restart_queue
            .iter()
            .map(|e| (e.t, e.score.to_bits()))
            .collect();
        for t in (0..self.faces.len()).filter(|&t| !self.emitted[t]) {
            let score = restart_score(&self.scorer, &self.adjacency, self.faces[t]);
            assert!(queued.contains(&(t, score.to_bits())), "triangle {t} not queued");
        }
    }

    /// Full scan of the live triangles, for checking `best_overall`.
    #[cfg(test)]
    pub fn best_overall_scan(&self) -> Option<usize> {
        let mut best: Option<(f64, usize)> = None;
        for t in (0..self.faces.len()).filter(|&t| !self.emitted[t]) {
            let s = self.triangle_score(t);
            if beats(s, t, best) {
                best = Some((s, t));
            }
        }
        best.map(|(_, t)| t)
    }

    /// Whether the next step will restart.
    #[cfg(test)]
    pub fn pool_is_empty(&self) -> bool {
        self.best_in_cache().is_none()
    }
}
