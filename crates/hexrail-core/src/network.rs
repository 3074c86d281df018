//! Rail network: track segments, stations and their construction rules.

use crate::game_state::GameState;
use crate::hex::{line_draw, HexCoord};
use crate::notifications::{NotificationIcon, Severity};
use crate::terrain::Terrain;
use crate::types::{StationType, TrackType};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Price of a station on a city hex.
pub const CITY_STATION_COST: i64 = 3000;
/// Price of a station anywhere else.
pub const HALT_COST: i64 = 1000;
/// Fog revealed around a newly built track end.
pub const TRACK_REVEAL_RADIUS: u32 = 2;
/// Fog revealed around a newly built station.
pub const STATION_REVEAL_RADIUS: u32 = 3;

/// Canonical key of an undirected track segment.
///
/// The endpoint whose `"q,r"` key sorts first lexicographically is stored
/// first, so `TrackKey::new(a, b) == TrackKey::new(b, a)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackKey {
    a: HexCoord,
    b: HexCoord,
}

impl TrackKey {
    pub fn new(a: HexCoord, b: HexCoord) -> Self {
        if a.key() <= b.key() {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    /// Both endpoints in canonical order.
    pub fn endpoints(&self) -> (HexCoord, HexCoord) {
        (self.a, self.b)
    }

    pub fn touches(&self, hex: &HexCoord) -> bool {
        self.a == *hex || self.b == *hex
    }
}

impl std::fmt::Display for TrackKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.a.key(), self.b.key())
    }
}

impl FromStr for TrackKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once('|')
            .ok_or_else(|| format!("invalid track key: {}", s))?;
        let a = a.parse::<HexCoord>().map_err(|e| e.to_string())?;
        let b = b.parse::<HexCoord>().map_err(|e| e.to_string())?;
        Ok(TrackKey::new(a, b))
    }
}

impl Serialize for TrackKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TrackKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A built track segment between two adjacent hexes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackSegment {
    pub from: HexCoord,
    pub to: HexCoord,
    #[serde(rename = "type")]
    pub track_type: TrackType,
    pub built: bool,
}

/// A station occupying one hex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub hex: HexCoord,
    pub name: String,
    #[serde(rename = "type")]
    pub station_type: StationType,
    pub platforms: u8,
    /// Index into the map's city list when built on a city.
    pub city: Option<usize>,
}

/// Why a track or station cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Hexes are not adjacent")]
    NotAdjacent,
    #[error("Out of bounds")]
    OutOfBounds,
    #[error("Cannot build on water")]
    Water,
    #[error("Cannot build on mountains")]
    Mountains,
    #[error("Track already exists")]
    TrackExists,
    #[error("Station already exists")]
    StationExists,
    #[error("Insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: i64, available: i64 },
    #[error("Must connect to existing track")]
    Disconnected,
}

/// Result of building a straight run of track.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackRun {
    /// Segments newly built.
    pub built: usize,
    /// Total spent.
    pub cost: i64,
    /// Failure that ended the run early.
    pub stopped: Option<BuildError>,
}

impl GameState {
    /// Check whether a track from `from` to `to` can be built. Returns the cost.
    pub fn can_build_track(&self, from: HexCoord, to: HexCoord) -> Result<i64, BuildError> {
        if !from.is_adjacent(&to) {
            return Err(BuildError::NotAdjacent);
        }

        // Both ends must be on land; the destination sets the price.
        let origin = self.map.terrain_at(&from).ok_or(BuildError::OutOfBounds)?;
        let terrain = self.map.terrain_at(&to).ok_or(BuildError::OutOfBounds)?;
        if origin.track_cost().is_none() {
            return Err(BuildError::Water);
        }
        let cost = terrain.track_cost().ok_or(BuildError::Water)?;

        if self.tracks.contains_key(&TrackKey::new(from, to)) {
            return Err(BuildError::TrackExists);
        }

        self.check_funds(cost)?;
        Ok(cost)
    }

    /// Build a standard track segment. Returns the cost paid.
    pub fn build_track(&mut self, from: HexCoord, to: HexCoord) -> Result<i64, BuildError> {
        let cost = self.can_build_track(from, to)?;

        let key = TrackKey::new(from, to);
        self.tracks.insert(
            key,
            TrackSegment {
                from,
                to,
                track_type: TrackType::Standard,
                built: true,
            },
        );
        self.funds -= cost;
        self.map.reveal(&to, TRACK_REVEAL_RADIUS);

        debug!(track = %key, cost, funds = self.funds, "track built");
        Ok(cost)
    }

    /// Build track along the straight hex line from `from` to `to`.
    ///
    /// Existing segments are skipped. The run stops at the first other failure
    /// and keeps what was already built.
    pub fn build_track_run(&mut self, from: HexCoord, to: HexCoord) -> TrackRun {
        let mut run = TrackRun::default();

        for pair in line_draw(from, to).windows(2) {
            if self.tracks.contains_key(&TrackKey::new(pair[0], pair[1])) {
                continue;
            }
            match self.build_track(pair[0], pair[1]) {
                Ok(cost) => {
                    run.built += 1;
                    run.cost += cost;
                }
                Err(e) => {
                    run.stopped = Some(e);
                    break;
                }
            }
        }

        run
    }

    /// Whether any built segment ends at `hex`.
    pub fn has_track_at(&self, hex: &HexCoord) -> bool {
        self.tracks.keys().any(|k| k.touches(hex))
    }

    /// Check whether a station can be built at `hex`. Returns the cost.
    pub fn can_build_station(&self, hex: HexCoord) -> Result<i64, BuildError> {
        if self.stations.contains_key(&hex) {
            return Err(BuildError::StationExists);
        }

        match self.map.terrain_at(&hex) {
            None => return Err(BuildError::OutOfBounds),
            Some(Terrain::Water) => return Err(BuildError::Water),
            Some(Terrain::Mountains) => return Err(BuildError::Mountains),
            Some(_) => {}
        }

        let cost = if self.map.city_at(&hex).is_some() {
            CITY_STATION_COST
        } else {
            HALT_COST
        };
        self.check_funds(cost)?;

        if !self.stations.is_empty() && !self.has_track_at(&hex) {
            return Err(BuildError::Disconnected);
        }

        Ok(cost)
    }

    /// Build a station at `hex`. Returns the cost paid.
    pub fn build_station(&mut self, hex: HexCoord) -> Result<i64, BuildError> {
        let cost = self.can_build_station(hex)?;

        let city = self.map.city_index_at(&hex);
        let station = match city {
            Some(index) => {
                let city = &mut self.map.cities[index];
                let first = !city.has_station;
                city.has_station = true;
                let name = format!("{} Station", city.name);
                if first {
                    let text = format!("{} is now connected to the network", city.name);
                    self.notifications.push(
                        NotificationIcon::Station,
                        "Station Opened",
                        text,
                        Severity::Success,
                    );
                }
                Station {
                    hex,
                    name,
                    station_type: StationType::Station,
                    platforms: StationType::Station.platforms(),
                    city: Some(index),
                }
            }
            None => Station {
                hex,
                name: format!("Halt {}", self.stations.len() + 1),
                station_type: StationType::Halt,
                platforms: StationType::Halt.platforms(),
                city: None,
            },
        };

        debug!(%hex, name = %station.name, cost, "station built");
        self.stations.insert(hex, station);
        self.funds -= cost;
        self.map.reveal(&hex, STATION_REVEAL_RADIUS);

        Ok(cost)
    }

    fn check_funds(&self, cost: i64) -> Result<(), BuildError> {
        if self.funds < cost {
            Err(BuildError::InsufficientFunds {
                required: cost,
                available: self.funds,
            })
        } else {
            Ok(())
        }
    }
}
