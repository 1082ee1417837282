//! Error type shared by the optimizer, the estimator and the helpers.

use std::fmt;

/// Errors surfaced synchronously for caller/input defects.
///
/// Nothing is retried or recovered internally: a failing call produces no
/// partial output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VcacheError {
    /// A triangle references a vertex outside `[0, vertex_count)`.
    InvalidIndex {
        triangle: usize,
        vertex: u32,
        vertex_count: usize,
    },
    /// Simulated caches must hold at least one triangle's worth of vertices.
    InvalidCacheSize { cache_size: usize },
    /// Score tuning constants must be finite and non-negative.
    InvalidScoreParams { reason: String },
}

impl VcacheError {
    pub(crate) fn score_params(reason: impl Into<String>) -> Self {
        Self::InvalidScoreParams {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for VcacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIndex {
                triangle,
                vertex,
                vertex_count,
            } => write!(
                f,
                "triangle {triangle} references vertex {vertex}, but the mesh has {vertex_count} vertices"
            ),
            Self::InvalidCacheSize { cache_size } => {
                write!(f, "cache size {cache_size} is too small (needs >= 3)")
            }
            Self::InvalidScoreParams { reason } => write!(f, "invalid score params: {reason}"),
        }
    }
}

impl std::error::Error for VcacheError {}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, VcacheError>;
