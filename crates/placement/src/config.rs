use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a placement configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid placement config: {0}")]
    Invalid(String),
}

/// Distances are in region units. Each placed world is aimed at
/// `move_distance + n * move_step` from the origin, give or take
/// `move_variance`, where `n` counts worlds already moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Nominal distance of the first moved world from the origin.
    pub move_distance: i32,
    /// Extra distance for every world already moved.
    pub move_step: i32,
    /// Half-width of the uniform distance window.
    pub move_variance: i32,
    /// Candidate offsets tried per world before giving up.
    pub max_attempts: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            move_distance: 30,
            move_step: 5,
            move_variance: 5,
            max_attempts: 10_000,
        }
    }
}

impl PlacementConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.move_variance < 0 || self.move_step < 0 {
            return Err(ConfigError::Invalid(
                "move_step and move_variance must not be negative".into(),
            ));
        }
        if self.move_distance < self.move_variance {
            return Err(ConfigError::Invalid(format!(
                "move_distance ({}) must be at least move_variance ({})",
                self.move_distance, self.move_variance
            )));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts must be positive".into()));
        }
        Ok(())
    }

    /// Nominal distance for a world placed after `moved` others.
    pub fn base_distance(&self, moved: usize) -> i32 {
        let moved = i32::try_from(moved).unwrap_or(i32::MAX);
        self.move_distance
            .saturating_add(moved.saturating_mul(self.move_step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = PlacementConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.move_distance, 30);
        assert_eq!(config.move_step, 5);
        assert_eq!(config.move_variance, 5);
    }

    #[test]
    fn base_distance_ramps_per_moved_world() {
        let config = PlacementConfig::default();
        assert_eq!(config.base_distance(0), 30);
        assert_eq!(config.base_distance(1), 35);
        assert_eq!(config.base_distance(4), 50);
        assert_eq!(config.base_distance(usize::MAX), i32::MAX);
    }

    #[test]
    fn variance_larger_than_distance_is_invalid() {
        let config = PlacementConfig {
            move_distance: 3,
            move_variance: 4,
            ..PlacementConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_attempts_is_invalid() {
        let config = PlacementConfig {
            max_attempts: 0,
            ..PlacementConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_partial_json_fills_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{ "move_step": 12, "max_attempts": 50 }}"#).unwrap();

        let config = PlacementConfig::load(tmp.path()).unwrap();
        assert_eq!(config.move_step, 12);
        assert_eq!(config.max_attempts, 50);
        assert_eq!(config.move_distance, 30);
    }

    #[test]
    fn load_rejects_invalid_values() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, r#"{{ "move_step": -1 }}"#).unwrap();
        assert!(matches!(
            PlacementConfig::load(tmp.path()),
            Err(ConfigError::Invalid(_))
        ));
    }
}
