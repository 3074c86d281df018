//! Core type aliases and small enums used throughout the crate.

use serde::{Deserialize, Serialize};

/// Unique identifier for a train.
pub type TrainId = u32;

/// Technology identifier.
pub type TechId = String;

/// Unique identifier for a notification.
pub type NotificationId = u64;

/// Game era progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Era {
    #[default]
    Steam,
    Diesel,
    Electric,
    Maglev,
}

impl Era {
    /// Get the next era in progression.
    pub const fn next(&self) -> Option<Era> {
        match self {
            Era::Steam => Some(Era::Diesel),
            Era::Diesel => Some(Era::Electric),
            Era::Electric => Some(Era::Maglev),
            Era::Maglev => None,
        }
    }

    /// First calendar year of this era.
    pub const fn start_year(&self) -> i32 {
        match self {
            Era::Steam => 1830,
            Era::Diesel => 1900,
            Era::Electric => 1950,
            Era::Maglev => 2000,
        }
    }

    /// Get the era index (0-3).
    pub const fn index(&self) -> usize {
        match self {
            Era::Steam => 0,
            Era::Diesel => 1,
            Era::Electric => 2,
            Era::Maglev => 3,
        }
    }

    /// Maintenance charged per track segment each month.
    pub const fn track_maintenance(&self) -> i64 {
        match self {
            Era::Steam => 10,
            Era::Diesel => 8,
            Era::Electric => 12,
            Era::Maglev => 15,
        }
    }

    /// Get all era variants.
    pub const fn all() -> &'static [Era] {
        &[Era::Steam, Era::Diesel, Era::Electric, Era::Maglev]
    }
}

impl std::fmt::Display for Era {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Era::Steam => write!(f, "Steam Era"),
            Era::Diesel => write!(f, "Diesel Era"),
            Era::Electric => write!(f, "Electric Era"),
            Era::Maglev => write!(f, "Maglev Era"),
        }
    }
}

/// Construction grade of a track segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrackType {
    Narrow,
    #[default]
    Standard,
    Double,
    Electrified,
    Highspeed,
}

/// Kind of station; drives maintenance and platform count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationType {
    Halt,
    Station,
    Junction,
    Terminal,
}

impl StationType {
    /// Flat monthly maintenance fee.
    pub const fn maintenance(&self) -> i64 {
        match self {
            StationType::Terminal => 200,
            StationType::Junction => 150,
            StationType::Station => 100,
            StationType::Halt => 30,
        }
    }

    /// Number of platforms a new station of this kind gets.
    pub const fn platforms(&self) -> u8 {
        match self {
            StationType::Halt => 1,
            StationType::Station => 2,
            StationType::Junction => 3,
            StationType::Terminal => 4,
        }
    }
}

/// Discrete simulation speed chosen by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameSpeed {
    Paused,
    #[default]
    Normal,
    Fast,
    Fastest,
}

impl GameSpeed {
    /// Speed for a numeric level 0-3. Out-of-range levels clamp to the fastest.
    pub const fn from_level(level: u8) -> Self {
        match level {
            0 => GameSpeed::Paused,
            1 => GameSpeed::Normal,
            2 => GameSpeed::Fast,
            _ => GameSpeed::Fastest,
        }
    }

    pub const fn level(&self) -> u8 {
        match self {
            GameSpeed::Paused => 0,
            GameSpeed::Normal => 1,
            GameSpeed::Fast => 2,
            GameSpeed::Fastest => 3,
        }
    }

    /// Time multiplier applied to train movement and the month clock.
    pub const fn multiplier(&self) -> f64 {
        match self {
            GameSpeed::Paused => 0.0,
            GameSpeed::Normal => 1.0,
            GameSpeed::Fast => 3.0,
            GameSpeed::Fastest => 8.0,
        }
    }

    pub const fn is_paused(&self) -> bool {
        matches!(self, GameSpeed::Paused)
    }
}
