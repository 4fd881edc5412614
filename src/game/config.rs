use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::error::GameError;

/// Largest side length a field may have
pub const MAX_FIELD_SIZE: usize = 1024;

/// Configuration for the game
///
/// Every field has a default, so a config file only needs to name the
/// values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square field
    pub field_size: usize,
    /// Number of segments the snake starts with
    pub initial_snake_length: usize,

    /// Points for an ordinary fruit
    pub normal_fruit_value: u32,
    /// Points for a special fruit
    pub special_fruit_value: u32,
    /// Every n-th fruit eaten makes the next one special
    pub special_fruit_frequency: u32,

    /// Tick period before any fruit has been eaten
    pub initial_tick_interval_ms: u64,
    /// Playback rate gained per fruit eaten
    pub speed_increment: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_size: 30,
            initial_snake_length: 4,
            normal_fruit_value: 1,
            special_fruit_value: 3,
            special_fruit_frequency: 5,
            initial_tick_interval_ms: 250,
            speed_increment: 0.1,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom field size
    pub fn new(field_size: usize) -> Self {
        Self {
            field_size,
            ..Default::default()
        }
    }

    /// Create a small field for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Load a configuration from a JSON file and validate it
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to parse config file")?;
        config.validate().context("Config file is invalid")?;
        Ok(config)
    }

    /// Check that the values describe a playable game
    pub fn validate(&self) -> Result<(), GameError> {
        if self.field_size < 2 {
            return Err(GameError::InvalidConfig(format!(
                "field_size must be at least 2, got {}",
                self.field_size
            )));
        }
        if self.field_size > MAX_FIELD_SIZE {
            return Err(GameError::InvalidConfig(format!(
                "field_size must be at most {}, got {}",
                MAX_FIELD_SIZE, self.field_size
            )));
        }
        if self.initial_snake_length == 0 {
            return Err(GameError::InvalidConfig(
                "initial_snake_length must be positive".into(),
            ));
        }
        // The body hangs south of the centre cell.
        if self.field_size / 2 + self.initial_snake_length > self.field_size {
            return Err(GameError::InvalidConfig(format!(
                "a snake of length {} does not fit on a {}x{} field",
                self.initial_snake_length, self.field_size, self.field_size
            )));
        }
        if self.normal_fruit_value == 0 || self.special_fruit_value == 0 {
            return Err(GameError::InvalidConfig(
                "fruit values must be positive".into(),
            ));
        }
        if self.special_fruit_frequency == 0 {
            return Err(GameError::InvalidConfig(
                "special_fruit_frequency must be positive".into(),
            ));
        }
        if self.initial_tick_interval_ms == 0 {
            return Err(GameError::InvalidConfig(
                "initial_tick_interval_ms must be positive".into(),
            ));
        }
        if !self.speed_increment.is_finite() || self.speed_increment < 0.0 {
            return Err(GameError::InvalidConfig(format!(
                "speed_increment must be a non-negative number, got {}",
                self.speed_increment
            )));
        }
        Ok(())
    }

    /// Value of the fruit spawned after `fruits_eaten` fruits have been eaten
    pub fn fruit_value_after(&self, fruits_eaten: u32) -> u32 {
        if self.is_special_after(fruits_eaten) {
            self.special_fruit_value
        } else {
            self.normal_fruit_value
        }
    }

    /// True if the fruit spawned after `fruits_eaten` fruits is a special one
    pub fn is_special_after(&self, fruits_eaten: u32) -> bool {
        fruits_eaten != 0 && fruits_eaten % self.special_fruit_frequency == 0
    }

    /// Tick period once `fruits_eaten` fruits have been eaten
    ///
    /// The rate starts at 1.0 and rises by `speed_increment` per fruit;
    /// the period never drops below one millisecond.
    pub fn tick_interval(&self, fruits_eaten: u32) -> Duration {
        let rate = 1.0 + self.speed_increment * f64::from(fruits_eaten);
        let millis = self.initial_tick_interval_ms as f64 / rate;
        Duration::from_secs_f64(millis / 1000.0).max(Duration::from_millis(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.field_size, 30);
        assert_eq!(config.initial_snake_length, 4);
        assert_eq!(config.normal_fruit_value, 1);
        assert_eq!(config.special_fruit_value, 3);
        assert_eq!(config.special_fruit_frequency, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15);
        assert_eq!(config.field_size, 15);
        assert_eq!(config.initial_tick_interval_ms, 250);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let too_small = GameConfig::new(1);
        assert!(matches!(too_small.validate(), Err(GameError::InvalidConfig(_))));

        assert!(GameConfig::new(MAX_FIELD_SIZE).validate().is_ok());
        let too_large = GameConfig::new(MAX_FIELD_SIZE + 1);
        assert!(matches!(too_large.validate(), Err(GameError::InvalidConfig(_))));
        let huge = GameConfig::new(1usize << 33);
        assert!(matches!(huge.validate(), Err(GameError::InvalidConfig(_))));

        let no_fit = GameConfig {
            field_size: 6,
            initial_snake_length: 4,
            ..Default::default()
        };
        assert!(no_fit.validate().is_err());

        let zero_frequency = GameConfig {
            special_fruit_frequency: 0,
            ..Default::default()
        };
        assert!(zero_frequency.validate().is_err());

        let bad_increment = GameConfig {
            speed_increment: f64::NAN,
            ..Default::default()
        };
        assert!(bad_increment.validate().is_err());
    }

    #[test]
    fn test_fruit_value_progression() {
        let config = GameConfig::default();
        assert_eq!(config.fruit_value_after(0), 1);
        assert_eq!(config.fruit_value_after(4), 1);
        assert_eq!(config.fruit_value_after(5), 3);
        assert_eq!(config.fruit_value_after(6), 1);
        assert_eq!(config.fruit_value_after(10), 3);

        assert!(!config.is_special_after(0));
        assert!(config.is_special_after(5));
        assert!(!config.is_special_after(7));
    }

    #[test]
    fn test_tick_interval_shrinks() {
        let config = GameConfig::default();
        assert_eq!(config.tick_interval(0), Duration::from_millis(250));
        assert_eq!(config.tick_interval(10).as_millis(), 125);
        assert!(config.tick_interval(3) < config.tick_interval(2));

        let fast = GameConfig {
            initial_tick_interval_ms: 1,
            speed_increment: 100.0,
            ..Default::default()
        };
        assert_eq!(fast.tick_interval(50), Duration::from_millis(1));
    }

    #[test]
    fn test_partial_json_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "field_size": 20, "special_fruit_value": 7 }}"#).unwrap();

        let config = GameConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.field_size, 20);
        assert_eq!(config.special_fruit_value, 7);
        assert_eq!(config.normal_fruit_value, 1);
        assert_eq!(config.initial_snake_length, 4);
    }

    #[test]
    fn test_invalid_json_file_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "field_size": 1 }}"#).unwrap();
        assert!(GameConfig::from_json_file(file.path()).is_err());

        let mut garbage = NamedTempFile::new().unwrap();
        write!(garbage, "not json").unwrap();
        assert!(GameConfig::from_json_file(garbage.path()).is_err());
    }
}
