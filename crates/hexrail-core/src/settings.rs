//! Game settings and configuration.

use crate::types::GameSpeed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_MAP_SIDE: u32 = 10;
pub const MAX_MAP_SIDE: u32 = 200;
pub const LAST_STARTING_YEAR: i32 = 2100;

/// Configuration for a game session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Map width in hexes.
    pub map_width: u32,
    /// Map height in hexes.
    pub map_height: u32,
    /// Terrain seed. A random one is picked when absent.
    pub seed: Option<u32>,
    /// Cash at the start of the game.
    pub starting_funds: i64,
    /// Calendar year of the first month.
    pub starting_year: i32,
    /// Real seconds per simulated month at normal speed.
    pub month_seconds: f64,
    pub starting_speed: GameSpeed,
}

impl GameSettings {
    /// Create default settings for a new game.
    pub fn new() -> Self {
        Self {
            map_width: 40,
            map_height: 30,
            seed: None,
            starting_funds: 50_000,
            starting_year: 1850,
            month_seconds: 5.0,
            starting_speed: GameSpeed::Normal,
        }
    }

    /// Small map with a generous budget, for quick sessions.
    pub fn sandbox() -> Self {
        Self {
            map_width: 20,
            map_height: 15,
            starting_funds: 250_000,
            month_seconds: 2.0,
            ..Self::new()
        }
    }

    /// Parse settings from JSON and validate them.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: GameSettings =
            serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings and return any errors.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let side = MIN_MAP_SIDE..=MAX_MAP_SIDE;
        if !side.contains(&self.map_width) || !side.contains(&self.map_height) {
            return Err(SettingsError::MapSize {
                width: self.map_width,
                height: self.map_height,
            });
        }
        if !(self.month_seconds > 0.0) {
            return Err(SettingsError::MonthLength);
        }
        if self.starting_year > LAST_STARTING_YEAR {
            return Err(SettingsError::StartingYear(self.starting_year));
        }
        Ok(())
    }

    /// Get the map dimensions.
    pub fn map_dimensions(&self) -> (u32, u32) {
        (self.map_width, self.map_height)
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from invalid game settings.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Map must be between 10 and 200 hexes per side, got {width}x{height}")]
    MapSize { width: u32, height: u32 },
    #[error("Month length must be positive")]
    MonthLength,
    #[error("Starting year {0} is past 2100")]
    StartingYear(i32),
    #[error("Invalid settings: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = GameSettings::default();
        assert_eq!(settings.map_dimensions(), (40, 30));
        assert_eq!(settings.starting_funds, 50_000);
        assert_eq!(settings.starting_year, 1850);
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_validation_valid() {
        assert!(GameSettings::new().validate().is_ok());
        assert!(GameSettings::sandbox().validate().is_ok());
    }

    #[test]
    fn test_validation_map_size() {
        let settings = GameSettings {
            map_width: 5,
            ..Default::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::MapSize { width: 5, height: 30 })
        );

        let settings = GameSettings {
            map_height: 201,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validation_month_length() {
        for bad in [0.0, -1.0, f64::NAN] {
            let settings = GameSettings {
                month_seconds: bad,
                ..Default::default()
            };
            assert_eq!(settings.validate(), Err(SettingsError::MonthLength));
        }
    }

    #[test]
    fn test_validation_year() {
        let settings = GameSettings {
            starting_year: 2101,
            ..Default::default()
        };
        assert_eq!(settings.validate(), Err(SettingsError::StartingYear(2101)));
    }

    #[test]
    fn test_from_json_partial() {
        let settings = GameSettings::from_json_str(r#"{"seed": 42, "starting_speed": "fast"}"#).unwrap();
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.starting_speed, GameSpeed::Fast);
        assert_eq!(settings.map_width, 40);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            GameSettings::from_json_str("{not json"),
            Err(SettingsError::Parse(_))
        ));
        assert!(matches!(
            GameSettings::from_json_str(r#"{"map_width": 3}"#),
            Err(SettingsError::MapSize { .. })
        ));
    }

    #[test]
    fn test_settings_serialization() {
        let settings = GameSettings::sandbox();
        let json = serde_json::to_string(&settings).unwrap();
        let restored: GameSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, settings);
    }
}
