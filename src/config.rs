//! Configuration management for the collaboration network pipeline

use crate::error::NetworkError;

/// Role label used when a record carries none
pub const DEFAULT_ROLE: &str = "기타";

/// Default configuration for the collaboration network pipeline
#[derive(Debug, Clone)]
pub struct Config {
    /// Modularity resolution (higher values favour smaller communities)
    pub resolution: f64,

    /// Maximum number of aggregation levels in community detection
    pub max_levels: usize,

    /// Maximum local-moving passes per level
    pub max_passes: usize,

    /// Minimum modularity gain for a node move to count as an improvement
    pub min_gain: f64,

    /// Only the first N credited participants of a movie generate pairs
    pub max_cast_size: Option<usize>,

    /// Movies embedded per link in the bulk network export
    pub link_movie_sample: usize,

    /// Movies embedded per link in ego exports (None keeps the full list)
    pub ego_movie_cap: Option<usize>,

    /// Size of the top-K lists in statistics and community summaries
    pub top_k: usize,

    /// Role assigned to records without one
    pub default_role: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_levels: 10,
            max_passes: 100,
            min_gain: 1e-7,
            max_cast_size: None,
            link_movie_sample: 5,
            ego_movie_cap: None,
            top_k: 5,
            default_role: DEFAULT_ROLE.to_string(),
        }
    }
}

impl Config {
    /// Create a new configuration with custom detection values
    pub fn new(resolution: f64, max_levels: usize, max_passes: usize) -> Self {
        Self {
            resolution,
            max_levels,
            max_passes,
            ..Self::default()
        }
    }

    /// Cap the number of participants per movie that generate pairs
    pub fn with_max_cast_size(mut self, cap: usize) -> Self {
        self.max_cast_size = Some(cap);
        self
    }

    /// Check that every value is usable by the pipeline
    pub fn validate(&self) -> Result<(), NetworkError> {
        if !self.resolution.is_finite() || self.resolution <= 0.0 {
            return Err(NetworkError::InvalidParameter {
                name: "resolution",
                message: format!("must be a positive finite number, got {}", self.resolution),
            });
        }
        if self.max_levels == 0 {
            return Err(NetworkError::InvalidParameter {
                name: "max_levels",
                message: "must be at least 1".to_string(),
            });
        }
        if self.max_passes == 0 {
            return Err(NetworkError::InvalidParameter {
                name: "max_passes",
                message: "must be at least 1".to_string(),
            });
        }
        if !self.min_gain.is_finite() || self.min_gain < 0.0 {
            return Err(NetworkError::InvalidParameter {
                name: "min_gain",
                message: format!("must be a non-negative finite number, got {}", self.min_gain),
            });
        }
        if self.max_cast_size == Some(0) {
            return Err(NetworkError::InvalidParameter {
                name: "max_cast_size",
                message: "must be at least 1 when set".to_string(),
            });
        }
        Ok(())
    }
}
