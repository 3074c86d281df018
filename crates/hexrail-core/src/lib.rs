//! Hex Rail Core Library
//!
//! This crate contains the simulation engine for Hex Rail, a railway tycoon
//! game played on a hexagonal map.
//!
//! # Design Principles
//!
//! - **No UI dependencies**: The host renders state and forwards input
//! - **Seeded terrain**: The same seed always produces the same landscape
//! - **Recoverable failures**: Every fallible operation returns a reason
//! - **Serializable**: All state can be saved/loaded via serde

// Core modules
pub mod hex;
pub mod map;
pub mod terrain;
pub mod types;

// Map generation
pub mod mapgen;
pub mod noise;

// Game state modules
pub mod game_state;
pub mod notifications;
pub mod settings;

// Rail network and rolling stock
pub mod network;
pub mod pathfinding;
pub mod train;

// Economy and calendar
pub mod economy;

// Technology
pub mod technology;

// Player actions
pub mod actions;

// Display helpers
pub mod format;

// Re-exports for convenience
pub use actions::{ActionOutcome, GameAction};
pub use economy::{MaintenanceBreakdown, MonthlyReport};
pub use format::{era_label, format_money, month_name};
pub use game_state::{GameError, GameState, NetworkStats, Selection, Tool};
pub use hex::{hex_round, line_draw, HexCoord};
pub use map::{CityData, GameMap};
pub use mapgen::{generate_map, MapGenConfig, MapGenerator};
pub use network::{BuildError, Station, TrackKey, TrackRun, TrackSegment};
pub use notifications::{Notification, NotificationIcon, NotificationQueue, Severity};
pub use pathfinding::{find_track_path, resolve_route};
pub use settings::{GameSettings, SettingsError};
pub use technology::{ResearchError, ResearchState, TechEffect, TechTree, Technology};
pub use terrain::{Good, Resource, Terrain};
pub use train::{Train, TrainError, TrainPosition, TrainType};
pub use types::*;
