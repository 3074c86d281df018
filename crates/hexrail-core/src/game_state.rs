//! Root game state containing all game data.

use crate::hex::HexCoord;
use crate::map::GameMap;
use crate::mapgen::generate_map;
use crate::network::{BuildError, Station, TrackKey, TrackSegment};
use crate::notifications::{NotificationIcon, NotificationQueue, Severity};
use crate::settings::{GameSettings, SettingsError};
use crate::technology::{ResearchError, ResearchState, TechTree, Technology};
use crate::train::{Train, TrainError, TrainType};
use crate::types::{Era, GameSpeed, TrainId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::info;

/// The complete state of a running game.
///
/// The state owns its map. Gameplay randomness comes from `rng`, which is
/// not serialized and is freshly seeded when a state is loaded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    /// The game map.
    pub map: GameMap,
    /// Built track, keyed canonically.
    pub tracks: BTreeMap<TrackKey, TrackSegment>,
    /// Stations by hex.
    pub stations: BTreeMap<HexCoord, Station>,
    /// Trains in purchase order.
    pub trains: Vec<Train>,
    /// Next available train ID.
    pub next_train_id: TrainId,
    /// Cash on hand. May go negative.
    pub funds: i64,
    /// Income earned so far this month.
    pub monthly_income: i64,
    /// Expenses charged so far this month.
    pub monthly_expenses: i64,
    pub last_month_income: i64,
    pub last_month_expenses: i64,
    /// Revenue earned since the game began.
    pub total_revenue: i64,
    /// Zero-based month.
    pub month: u32,
    pub year: i32,
    pub era: Era,
    pub speed: GameSpeed,
    /// Research progress.
    pub research: ResearchState,
    /// Research points earned last month.
    pub research_rate: f64,
    pub notifications: NotificationQueue,
    /// In-progress player selection.
    pub selection: Selection,
    #[serde(skip, default = "entropy_rng")]
    pub(crate) rng: ChaCha8Rng,
}

impl GameState {
    /// Create a new game on `map` with default settings.
    pub fn new(map: GameMap) -> Self {
        Self::with_settings(map, &GameSettings::default())
    }

    /// Create a new game on `map`, taking funds, calendar and speed from
    /// `settings`.
    pub fn with_settings(map: GameMap, settings: &GameSettings) -> Self {
        Self {
            map,
            tracks: BTreeMap::new(),
            stations: BTreeMap::new(),
            trains: Vec::new(),
            next_train_id: 1,
            funds: settings.starting_funds,
            monthly_income: 0,
            monthly_expenses: 0,
            last_month_income: 0,
            last_month_expenses: 0,
            total_revenue: 0,
            month: 0,
            year: settings.starting_year,
            era: Era::Steam,
            speed: settings.starting_speed,
            research: ResearchState::new(),
            research_rate: 0.0,
            notifications: NotificationQueue::new(),
            selection: Selection::default(),
            rng: entropy_rng(),
        }
    }

    /// Validate `settings`, generate a map and start a game on it.
    ///
    /// Returns the state and the terrain seed used.
    pub fn generate(settings: &GameSettings) -> Result<(Self, u32), SettingsError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let map = generate_map(settings.map_width, settings.map_height, seed);
        info!(
            width = settings.map_width,
            height = settings.map_height,
            seed,
            cities = map.cities.len(),
            "new game"
        );
        Ok((Self::with_settings(map, settings), seed))
    }

    /// Reseed gameplay randomness.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Get a train by ID.
    pub fn get_train(&self, id: TrainId) -> Option<&Train> {
        self.trains.iter().find(|t| t.id == id)
    }

    /// Check whether a technology can be researched now.
    pub fn can_research(&self, id: &str) -> Result<&'static Technology, ResearchError> {
        TechTree::standard().can_research(&self.research, id)
    }

    /// Unlock a technology, spending research points.
    pub fn unlock_tech(&mut self, id: &str) -> Result<&'static Technology, ResearchError> {
        let tech = TechTree::standard().unlock(&mut self.research, id)?;
        info!(tech = tech.id, points = self.research.points, "technology unlocked");
        self.notifications.push(
            NotificationIcon::Research,
            "Research Complete",
            format!("{} unlocked", tech.name),
            Severity::Success,
        );
        Ok(tech)
    }

    /// Technologies whose prerequisites are met, in catalog order.
    pub fn available_techs(&self) -> Vec<&'static Technology> {
        TechTree::standard().available_techs(&self.research)
    }

    /// Train types that may be bought.
    pub fn unlocked_train_types(&self) -> BTreeSet<TrainType> {
        TechTree::standard().unlocked_train_types(&self.research)
    }

    /// Counts and costs of the current network.
    pub fn network_stats(&self) -> NetworkStats {
        NetworkStats {
            tracks: self.tracks.len(),
            stations: self.stations.len(),
            trains: self.trains.len(),
            connected_cities: self.map.cities.iter().filter(|c| c.has_station).count(),
            monthly_maintenance: self.maintenance().total,
        }
    }
}

fn entropy_rng() -> ChaCha8Rng {
    ChaCha8Rng::from_entropy()
}

/// Summary of the rail network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct NetworkStats {
    pub tracks: usize,
    pub stations: usize,
    pub trains: usize,
    pub connected_cities: usize,
    pub monthly_maintenance: i64,
}

/// Construction tool picked by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    #[default]
    Inspect,
    Track,
    Station,
    Route,
}

/// Scratch state for what the player is pointing at and assembling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub tool: Tool,
    pub hovered: Option<HexCoord>,
    /// First hex of a track being drawn.
    pub track_start: Option<HexCoord>,
    /// Stations picked for a new train, in order.
    pub route_stops: Vec<HexCoord>,
    pub train_type: TrainType,
}

impl Selection {
    /// Switch tool, dropping anything half-built.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.track_start = None;
        self.route_stops.clear();
    }

    /// Append a stop, or remove it if it is already the last one.
    pub fn toggle_stop(&mut self, hex: HexCoord) {
        if self.route_stops.last() == Some(&hex) {
            self.route_stops.pop();
        } else {
            self.route_stops.push(hex);
        }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            tool: Tool::Inspect,
            hovered: None,
            track_start: None,
            route_stops: Vec::new(),
            train_type: TrainType::Freight,
        }
    }
}

/// Any failure surfaced through the action interface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Train(#[from] TrainError),
    #[error(transparent)]
    Research(#[from] ResearchError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
