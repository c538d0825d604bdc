//! Sampling configuration.

use std::env;

use ctm_common::{CtmError, CtmResult};
use serde::{Deserialize, Serialize};

/// Sample counts used when planning cross-sections and slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Horizontal positions along a cross-section track
    pub track_points: usize,
    /// Depths sampled in a cross-section
    pub depth_points: usize,
    /// Approximate number of nodes in a horizontal slice
    pub slice_target_points: usize,
    /// Largest number of samples one query may plan
    pub max_samples: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            track_points: 121,
            depth_points: 61,
            slice_target_points: 10_000,
            max_samples: 1_000_000,
        }
    }
}

impl QueryConfig {
    /// Defaults overridden by `CTM_TRACK_POINTS`, `CTM_DEPTH_POINTS`,
    /// `CTM_SLICE_TARGET_POINTS` and `CTM_MAX_SAMPLES`.
    pub fn from_env() -> CtmResult<Self> {
        let defaults = Self::default();
        let config = Self {
            track_points: env_usize("CTM_TRACK_POINTS", defaults.track_points)?,
            depth_points: env_usize("CTM_DEPTH_POINTS", defaults.depth_points)?,
            slice_target_points: env_usize("CTM_SLICE_TARGET_POINTS", defaults.slice_target_points)?,
            max_samples: env_usize("CTM_MAX_SAMPLES", defaults.max_samples)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CtmResult<()> {
        if self.track_points < 2 {
            return Err(CtmError::Config(format!(
                "track_points must be at least 2, got {}",
                self.track_points
            )));
        }
        if self.depth_points == 0 {
            return Err(CtmError::Config("depth_points must be positive".to_string()));
        }
        if self.slice_target_points == 0 {
            return Err(CtmError::Config("slice_target_points must be positive".to_string()));
        }
        if self.slice_target_points > self.max_samples {
            return Err(CtmError::Config(format!(
                "slice_target_points {} exceeds max_samples {}",
                self.slice_target_points, self.max_samples
            )));
        }
        let cross_section = self.track_points.saturating_mul(self.depth_points);
        if cross_section > self.max_samples {
            return Err(CtmError::Config(format!(
                "track_points x depth_points = {} exceeds max_samples {}",
                cross_section, self.max_samples
            )));
        }
        Ok(())
    }
}

fn env_usize(name: &str, default: usize) -> CtmResult<usize> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| CtmError::Config(format!("{} must be a non-negative integer, got '{}'", name, value))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QueryConfig::default();
        assert_eq!(config.track_points, 121);
        assert_eq!(config.depth_points, 61);
        assert_eq!(config.slice_target_points, 10_000);
        assert_eq!(config.max_samples, 1_000_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        let config = QueryConfig {
            track_points: 1,
            ..QueryConfig::default()
        };
        assert!(matches!(config.validate(), Err(CtmError::Config(_))));
    }

    #[test]
    fn test_validate_sample_limit() {
        let config = QueryConfig {
            slice_target_points: 2_000_000,
            ..QueryConfig::default()
        };
        assert!(matches!(config.validate(), Err(CtmError::Config(_))));

        let config = QueryConfig {
            track_points: 10_000,
            depth_points: 1_000,
            ..QueryConfig::default()
        };
        assert!(matches!(config.validate(), Err(CtmError::Config(_))));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: QueryConfig = serde_yaml::from_str("track_points: 31\n").unwrap();
        assert_eq!(config.track_points, 31);
        assert_eq!(config.depth_points, 61);
    }

    #[test]
    fn test_env_default_when_unset() {
        assert_eq!(env_usize("CTM_TEST_UNSET_VARIABLE_FOR_CONFIG", 5).unwrap(), 5);
    }
}
