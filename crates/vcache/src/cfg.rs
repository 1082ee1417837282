//! Tuning constants for the vertex score and the simulated cache.
//!
//! Defaults are the published Forsyth tuning. They are not free parameters in
//! practice: the reference grid fixture is only reproduced with these values.

use crate::error::{Result, VcacheError};

/// Smallest cache that can hold one triangle.
pub const MIN_CACHE_SIZE: usize = 3;
/// Cache size used by the optimizer unless configured otherwise.
pub const DEFAULT_CACHE_SIZE: usize = 32;

/// Vertex score configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreCfg {
    /// Capacity of the cache the optimizer simulates while ordering.
    pub cache_size: usize,
    /// Exponent of the cache-position decay for slots `>= 3`.
    pub cache_decay_power: f64,
    /// Flat cache score for the three most recent slots.
    pub last_tri_score: f64,
    /// Scale of the valence bonus `scale * n^-power`.
    pub valence_boost_scale: f64,
    pub valence_boost_power: f64,
}

impl Default for ScoreCfg {
    fn default() -> Self {
        Self {
            cache_size: DEFAULT_CACHE_SIZE,
            cache_decay_power: 1.5,
            last_tri_score: 0.75,
            valence_boost_scale: 2.0,
            valence_boost_power: 0.5,
        }
    }
}

impl ScoreCfg {
    pub fn validate(&self) -> Result<()> {
        check_cache_size(self.cache_size)?;
        let named = [
            ("cache_decay_power", self.cache_decay_power),
            ("last_tri_score", self.last_tri_score),
            ("valence_boost_scale", self.valence_boost_scale),
            ("valence_boost_power", self.valence_boost_power),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(VcacheError::score_params(format!("{name} must be finite")));
            }
            if value < 0.0 {
                return Err(VcacheError::score_params(format!("{name} must be >= 0")));
            }
        }
        Ok(())
    }
}

/// Optimizer configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OptimizeCfg {
    pub score: ScoreCfg,
}

impl OptimizeCfg {
    /// Default tuning with a different simulated cache size.
    pub fn with_cache_size(cache_size: usize) -> Self {
        Self {
            score: ScoreCfg {
                cache_size,
                ..ScoreCfg::default()
            },
        }
    }
}

pub(crate) fn check_cache_size(cache_size: usize) -> Result<()> {
    if cache_size < MIN_CACHE_SIZE {
        return Err(VcacheError::InvalidCacheSize { cache_size });
    }
    Ok(())
}
