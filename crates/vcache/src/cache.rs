//! Simulated post-transform vertex cache.
//!
//! A fixed-capacity recency list, most recent vertex first. Operations are a
//! linear scan over at most `capacity` slots; capacities are small (8..=32), so
//! no auxiliary index is kept.

/// Outcome of a single [`VertexCache::touch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Touch {
    /// The vertex was already resident (no transform needed).
    pub hit: bool,
    /// Vertex pushed out of the tail by this touch, if any.
    pub evicted: Option<u32>,
}

#[derive(Clone, Debug)]
pub struct VertexCache {
    slots: Vec<u32>,
    capacity: usize,
}

impl VertexCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Capacity in vertices.
    #[inline]
    pub fn size(&self) -> usize {
        self.capacity
    }

    /// Number of resident vertices (`<= size()`).
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot of `vertex` (0 = most recent), `None` if not resident.
    #[inline]
    pub fn position_of(&self, vertex: u32) -> Option<usize> {
        self.slots.iter().position(|&v| v == vertex)
    }

    #[inline]
    pub fn contains(&self, vertex: u32) -> bool {
        self.position_of(vertex).is_some()
    }

    /// Resident vertices, most recent first.
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.slots
    }

    /// Use `vertex`: a resident vertex moves to the front, a new one is
    /// inserted at the front and may evict the tail.
    pub fn touch(&mut self, vertex: u32) -> Touch {
        match self.position_of(vertex) {
            Some(0) => Touch {
                hit: true,
                evicted: None,
            },
            Some(pos) => {
                self.slots.remove(pos);
                self.slots.insert(0, vertex);
                Touch {
                    hit: true,
                    evicted: None,
                }
            }
            None => {
                self.slots.insert(0, vertex);
                let evicted = if self.slots.len() > self.capacity {
                    self.slots.pop()
                } else {
                    None
                };
                Touch {
                    hit: false,
                    evicted,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_vertices_enter_at_front() {
        let mut cache = VertexCache::new(4);
        for v in [7, 8, 9] {
            assert!(!cache.touch(v).hit);
        }
        assert_eq!(cache.as_slice(), &[9, 8, 7]);
        assert_eq!(cache.position_of(9), Some(0));
        assert_eq!(cache.position_of(7), Some(2));
        assert_eq!(cache.position_of(1), None);
        assert_eq!(cache.size(), 4);
    }

    #[test]
    fn hit_moves_to_front_without_eviction() {
        let mut cache = VertexCache::new(3);
        for v in [1, 2, 3] {
            cache.touch(v);
        }
        let t = cache.touch(1);
        assert_eq!(
            t,
            Touch {
                hit: true,
                evicted: None
            }
        );
        assert_eq!(cache.as_slice(), &[1, 3, 2]);
    }

    #[test]
    fn overflow_evicts_tail_only() {
        let mut cache = VertexCache::new(3);
        for v in [1, 2, 3] {
            cache.touch(v);
        }
        let t = cache.touch(4);
        assert!(!t.hit);
        assert_eq!(t.evicted, Some(1));
        assert_eq!(cache.as_slice(), &[4, 3, 2]);
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(1));
    }

    #[test]
    fn never_holds_duplicates() {
        let mut cache = VertexCache::new(8);
        for v in [0, 1, 0, 2, 1, 0, 3, 3, 2] {
            cache.touch(v);
            let mut seen = cache.as_slice().to_vec();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), cache.len());
        }
        assert_eq!(cache.as_slice(), &[2, 3, 0, 1]);
    }
}
