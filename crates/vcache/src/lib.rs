//! Vertex cache optimization for indexed triangle lists.
//!
//! Two operations carry the crate:
//! - [`reorder`]: greedy, score-driven triangle reordering that maximizes reuse
//!   of a small simulated post-transform vertex cache.
//! - [`estimate_ratio`]: replay a triangle order through a fresh cache and count
//!   transforms (cache misses) against distinct vertices.
//!
//! Everything is single-threaded and call-local: each call owns its cache,
//! vertex table and adjacency index and drops them before returning.
//!
//! Module map
//! - `cache`: simulated recency cache. `score`: vertex priority curve.
//! - `adjacency`: live triangles per vertex. `optimize`: the greedy loop.
//! - `ratio`: transform counting. `strip`: strips from ordered triangles.
//! - `triangles`: rotation/validation helpers. `meshgen`: seeded test meshes.

pub mod adjacency;
pub mod cache;
pub mod cfg;
pub mod error;
pub mod meshgen;
pub mod optimize;
pub mod ratio;
pub mod score;
pub mod strip;
pub mod triangles;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::{OptimizeCfg, ScoreCfg, DEFAULT_CACHE_SIZE, MIN_CACHE_SIZE};
pub use error::{Result, VcacheError};
pub use optimize::{reorder, reorder_tracked, reorder_with, Emitted};
pub use ratio::{estimate_ratio, estimate_ratio_strips, TransformRatio};
pub use triangles::Triangle;

/// Common exports for callers.
pub mod prelude {
    pub use crate::cfg::{OptimizeCfg, ScoreCfg};
    pub use crate::error::VcacheError;
    pub use crate::optimize::{reorder, reorder_tracked, reorder_with, Emitted};
    pub use crate::ratio::{estimate_ratio, estimate_ratio_strips, TransformRatio};
    pub use crate::strip::{stable_stripify, stripify};
    pub use crate::triangles::{canonical_rotation, unique_triangles, Triangle};
}
