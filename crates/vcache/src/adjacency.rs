//! Per-vertex lists of live (not yet emitted) triangles.
//!
//! Built once per optimizer run; emitting a triangle removes it from the lists
//! of its vertices. Invariant: every live triangle appears exactly once in the
//! list of each of its distinct vertices, so a degenerate triangle registers
//! with fewer than three vertices.

use crate::triangles::Triangle;

#[derive(Clone, Debug)]
pub struct Adjacency {
    pending: Vec<Vec<usize>>,
}

/// Distinct indices of `tri`, in triangle order.
pub(crate) fn distinct_vertices(tri: Triangle) -> impl Iterator<Item = u32> {
    tri.into_iter()
        .enumerate()
        .filter(move |&(i, v)| !tri[..i].contains(&v))
        .map(|(_, v)| v)
}

impl Adjacency {
    /// Index `faces` over `vertex_count` vertices. Indices must already be
    /// validated against `vertex_count`, which sizes the table; the optimizer
    /// passes densely renumbered faces so sparse indices cost nothing.
    pub fn build(faces: &[Triangle], vertex_count: usize) -> Self {
        let mut pending = vec![Vec::new(); vertex_count];
        for (t, &tri) in faces.iter().enumerate() {
            for v in distinct_vertices(tri) {
                pending[v as usize].push(t);
            }
        }
        Self { pending }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pending.len()
    }

    /// Live triangles referencing `vertex` (unordered).
    #[inline]
    pub fn pending(&self, vertex: u32) -> &[usize] {
        &self.pending[vertex as usize]
    }

    /// Valence: number of live triangles referencing `vertex`.
    #[inline]
    pub fn live_count(&self, vertex: u32) -> usize {
        self.pending[vertex as usize].len()
    }

    /// Sum of valences over all vertices.
    pub fn total_live(&self) -> usize {
        self.pending.iter().map(Vec::len).sum()
    }

    /// Retire triangle `t` (with vertices `tri`) from its vertices' lists.
    pub fn remove(&mut self, t: usize, tri: Triangle) {
        for v in distinct_vertices(tri) {
            let list = &mut self.pending[v as usize];
            if let Some(pos) = list.iter().position(|&x| x == t) {
                list.swap_remove(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fan_of_three() {
        // 0->-1
        //  \ / \
        //   2-<-3
        //    \ /
        //     4
        let faces = [[0, 1, 2], [1, 3, 2], [2, 3, 4]];
        let adj = Adjacency::build(&faces, 5);
        let sorted = |v: u32| {
            let mut p = adj.pending(v).to_vec();
            p.sort_unstable();
            p
        };
        assert_eq!(sorted(0), vec![0]);
        assert_eq!(sorted(1), vec![0, 1]);
        assert_eq!(sorted(2), vec![0, 1, 2]);
        assert_eq!(sorted(3), vec![1, 2]);
        assert_eq!(sorted(4), vec![2]);
        assert_eq!(adj.total_live(), 9);
    }

    #[test]
    fn remove_updates_counts() {
        let faces = [[0, 1, 2], [2, 1, 3]];
        let mut adj = Adjacency::build(&faces, 4);
        assert_eq!(adj.live_count(1), 2);
        adj.remove(0, faces[0]);
        assert_eq!(adj.live_count(0), 0);
        assert_eq!(adj.live_count(1), 1);
        assert_eq!(adj.live_count(2), 1);
        assert_eq!(adj.pending(3), &[1]);
        assert_eq!(adj.total_live(), 3);
        adj.remove(1, faces[1]);
        assert_eq!(adj.total_live(), 0);
    }

    #[test]
    fn degenerate_triangles_register_once_per_vertex() {
        let faces = [[0, 0, 1], [3, 3, 3]];
        let mut adj = Adjacency::build(&faces, 4);
        assert_eq!(adj.live_count(0), 1);
        assert_eq!(adj.live_count(1), 1);
        assert_eq!(adj.live_count(2), 0);
        assert_eq!(adj.live_count(3), 1);
        adj.remove(1, faces[1]);
        assert_eq!(adj.live_count(3), 0);
        assert_eq!(adj.vertex_count(), 4);
    }

    #[test]
    fn distinct_vertices_keeps_order() {
        assert_eq!(distinct_vertices([5, 2, 5]).collect::<Vec<_>>(), vec![5, 2]);
        assert_eq!(distinct_vertices([1, 2, 3]).collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
