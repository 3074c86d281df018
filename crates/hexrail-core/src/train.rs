//! Trains: class profiles, purchase, retirement and movement along routes.

use crate::game_state::GameState;
use crate::hex::HexCoord;
use crate::notifications::{NotificationIcon, Severity};
use crate::pathfinding::resolve_route;
use crate::technology::TechTree;
use crate::terrain::Good;
use crate::types::{Era, TrainId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Share of the legacy purchase price returned when a train is retired.
pub const REFUND_RATE: f64 = 0.25;

/// Refund base used for types missing from the legacy price table.
pub const FALLBACK_REFUND_BASE: i64 = 5000;

/// Revenue per route hex for a completed leg, before multipliers.
pub const LEG_REVENUE_PER_HEX: f64 = 100.0;

/// Class of rolling stock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainType {
    Freight,
    Passenger,
    Mail,
    HeavyFreight,
    Luxury,
    Express,
    Commuter,
    Bullet,
    Hyperloop,
}

/// Base characteristics of a train class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainProfile {
    /// Purchase price.
    pub cost: i64,
    /// Route edges crossed per second at speed multiplier 1.
    pub speed: f64,
    pub capacity: u32,
    /// Monthly upkeep at purchase time.
    pub maintenance: i64,
    /// RGB display color.
    pub color: u32,
}

impl TrainType {
    pub const fn all() -> &'static [TrainType] {
        &[
            TrainType::Freight,
            TrainType::Passenger,
            TrainType::Mail,
            TrainType::HeavyFreight,
            TrainType::Luxury,
            TrainType::Express,
            TrainType::Commuter,
            TrainType::Bullet,
            TrainType::Hyperloop,
        ]
    }

    /// Base profile of this class.
    pub fn profile(&self) -> TrainProfile {
        let (cost, speed, capacity, maintenance, color) = match self {
            TrainType::Freight => (8_000, 0.8, 40, 300, 0x8b5a2b),
            TrainType::Passenger => (10_000, 1.0, 30, 350, 0x2e6fd8),
            TrainType::Mail => (7_000, 1.2, 15, 250, 0xd83a2e),
            TrainType::HeavyFreight => (15_000, 0.6, 80, 500, 0x4a4a4a),
            TrainType::Luxury => (25_000, 1.1, 20, 700, 0x9b30d8),
            TrainType::Express => (18_000, 1.6, 40, 600, 0xe8a317),
            TrainType::Commuter => (12_000, 1.3, 60, 400, 0x2eb85c),
            TrainType::Bullet => (40_000, 2.5, 50, 1_200, 0xf2f2f2),
            TrainType::Hyperloop => (80_000, 4.0, 40, 2_000, 0x17d8e8),
        };
        TrainProfile {
            cost,
            speed,
            capacity,
            maintenance,
            color,
        }
    }

    /// Multiplier applied to leg-completion revenue.
    pub const fn revenue_multiplier(&self) -> f64 {
        match self {
            TrainType::Hyperloop => 5.0,
            TrainType::Bullet => 4.0,
            TrainType::Luxury => 3.0,
            TrainType::Express => 2.5,
            TrainType::Passenger => 2.0,
            TrainType::Commuter => 1.5,
            _ => 1.0,
        }
    }

    /// Price from the original rolling-stock price list.
    ///
    /// The list predates express, commuter, bullet and hyperloop stock.
    pub const fn legacy_cost(&self) -> Option<i64> {
        match self {
            TrainType::Freight => Some(8_000),
            TrainType::Passenger => Some(10_000),
            TrainType::Mail => Some(7_000),
            TrainType::HeavyFreight => Some(15_000),
            TrainType::Luxury => Some(25_000),
            _ => None,
        }
    }

    /// Amount returned when a train of this class is retired.
    pub fn refund(&self) -> i64 {
        let base = self.legacy_cost().unwrap_or(FALLBACK_REFUND_BASE);
        (base as f64 * REFUND_RATE).floor() as i64
    }

    /// Monthly upkeep in a given era, if the era prices this class.
    pub const fn era_maintenance(&self, era: Era) -> Option<i64> {
        use TrainType::*;
        match (era, *self) {
            (Era::Steam, Freight) => Some(300),
            (Era::Steam, Passenger) => Some(350),
            (Era::Steam, Mail) => Some(250),
            (Era::Steam, HeavyFreight) => Some(500),
            (Era::Steam, Luxury) => Some(700),

            (Era::Diesel, Freight) => Some(250),
            (Era::Diesel, Passenger) => Some(300),
            (Era::Diesel, Mail) => Some(200),
            (Era::Diesel, HeavyFreight) => Some(420),
            (Era::Diesel, Luxury) => Some(600),
            (Era::Diesel, Express) => Some(550),
            (Era::Diesel, Commuter) => Some(350),

            (Era::Electric, Freight) => Some(220),
            (Era::Electric, Passenger) => Some(260),
            (Era::Electric, Mail) => Some(180),
            (Era::Electric, HeavyFreight) => Some(380),
            (Era::Electric, Luxury) => Some(520),
            (Era::Electric, Express) => Some(480),
            (Era::Electric, Commuter) => Some(300),
            (Era::Electric, Bullet) => Some(1_100),

            (Era::Maglev, Express) => Some(400),
            (Era::Maglev, Commuter) => Some(260),
            (Era::Maglev, Bullet) => Some(950),
            (Era::Maglev, Hyperloop) => Some(1_800),

            _ => None,
        }
    }

    /// Display name, e.g. "Heavy Freight".
    pub const fn name(&self) -> &'static str {
        match self {
            TrainType::Freight => "Freight",
            TrainType::Passenger => "Passenger",
            TrainType::Mail => "Mail",
            TrainType::HeavyFreight => "Heavy Freight",
            TrainType::Luxury => "Luxury",
            TrainType::Express => "Express",
            TrainType::Commuter => "Commuter",
            TrainType::Bullet => "Bullet",
            TrainType::Hyperloop => "Hyperloop",
        }
    }
}

impl std::fmt::Display for TrainType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A train running back and forth along its route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Train {
    pub id: TrainId,
    pub name: String,
    #[serde(rename = "type")]
    pub train_type: TrainType,
    /// Hex path over built track. Reversed at each end.
    pub route: Vec<HexCoord>,
    /// Station hexes the route was resolved from.
    pub stops: Vec<HexCoord>,
    /// Index of the route edge currently being traversed.
    pub current_segment: usize,
    /// Progress along the current edge, in `[0, 1)`.
    pub progress: f64,
    /// Edges per second, research bonus included.
    pub speed: f64,
    /// Cargo capacity, research bonus included.
    pub capacity: u32,
    /// Carried goods. Not used by movement.
    pub cargo: BTreeMap<Good, u32>,
    /// Cumulative revenue earned.
    pub revenue: i64,
    /// Monthly upkeep recorded at purchase.
    pub maintenance_cost: i64,
}

/// Where a train is between two hexes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainPosition {
    pub from: HexCoord,
    pub to: HexCoord,
    pub progress: f64,
}

impl Train {
    /// Hex the train most recently reached.
    pub fn current_hex(&self) -> Option<HexCoord> {
        self.route.get(self.current_segment).copied()
    }

    /// Current edge and progress along it.
    pub fn position(&self) -> Option<TrainPosition> {
        let from = *self.route.get(self.current_segment)?;
        let to = *self.route.get(self.current_segment + 1)?;
        Some(TrainPosition {
            from,
            to,
            progress: self.progress,
        })
    }

    /// Interpolated pixel position for hexes of the given size.
    pub fn pixel_position(&self, size: f64) -> Option<(f64, f64)> {
        match self.position() {
            Some(pos) => {
                let (x0, y0) = pos.from.to_pixel(size);
                let (x1, y1) = pos.to.to_pixel(size);
                let t = pos.progress;
                Some((x0 + (x1 - x0) * t, y0 + (y1 - y0) * t))
            }
            None => self.current_hex().map(|h| h.to_pixel(size)),
        }
    }

    /// Revenue for completing one leg of the route.
    pub fn leg_revenue(&self, revenue_bonus: u32) -> i64 {
        let base = self.route.len() as f64 * LEG_REVENUE_PER_HEX;
        let bonus = 1.0 + revenue_bonus as f64 / 100.0;
        (base * self.train_type.revenue_multiplier() * bonus).floor() as i64
    }

    /// Upkeep charged this month in `era`.
    pub fn monthly_maintenance(&self, era: Era) -> i64 {
        self.train_type
            .era_maintenance(era)
            .unwrap_or(self.maintenance_cost)
    }

    /// Advance along the route by `distance` edges worth of progress.
    ///
    /// At most one edge is crossed per call. Returns what happened.
    pub fn advance(&mut self, distance: f64) -> MoveEvent {
        if self.route.len() < 2 {
            return MoveEvent::Idle;
        }

        self.progress += distance;
        if self.progress < 1.0 {
            return MoveEvent::Moving;
        }

        self.progress = 0.0;
        self.current_segment += 1;

        if self.current_segment >= self.route.len() - 1 {
            self.route.reverse();
            self.current_segment = 0;
            MoveEvent::LegCompleted
        } else {
            MoveEvent::Arrived
        }
    }
}

/// Outcome of a single movement step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveEvent {
    /// Route too short to move.
    Idle,
    /// Still on the same edge.
    Moving,
    /// Reached the next hex.
    Arrived,
    /// Reached the end of the route and turned around.
    LegCompleted,
}

impl MoveEvent {
    pub fn reached_hex(&self) -> bool {
        matches!(self, MoveEvent::Arrived | MoveEvent::LegCompleted)
    }
}

/// Why a train could not be bought or retired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainError {
    #[error("A route needs at least 2 stations")]
    NotEnoughStations,
    #[error("No station at {0}")]
    NotAStation(HexCoord),
    #[error("Insufficient funds: need {required}, have {available}")]
    InsufficientFunds { required: i64, available: i64 },
    #[error("Research required for {0}")]
    TechRequired(TrainType),
    #[error("No track path between stations")]
    NoTrackPath,
    #[error("Train {0} not found")]
    NotFound(TrainId),
}

/// Random bonus for stopping at a city station, in `[50, 250)`.
pub fn delivery_revenue<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    (rng.gen::<f64>() * 200.0).floor() as i64 + 50
}

impl GameState {
    /// Buy a train running between `stops` in order.
    pub fn buy_train(&mut self, train_type: TrainType, stops: &[HexCoord]) -> Result<TrainId, TrainError> {
        if stops.len() < 2 {
            return Err(TrainError::NotEnoughStations);
        }
        if let Some(stop) = stops.iter().find(|hex| !self.stations.contains_key(*hex)) {
            return Err(TrainError::NotAStation(*stop));
        }

        let profile = train_type.profile();
        if self.funds < profile.cost {
            return Err(TrainError::InsufficientFunds {
                required: profile.cost,
                available: self.funds,
            });
        }

        let tree = TechTree::standard();
        if !tree.unlocked_train_types(&self.research).contains(&train_type) {
            return Err(TrainError::TechRequired(train_type));
        }

        let route = resolve_route(&self.tracks, stops).ok_or(TrainError::NoTrackPath)?;
        // A route that never leaves its first hex would earn nothing.
        if route.len() < 2 {
            return Err(TrainError::NotEnoughStations);
        }

        let speed_bonus = tree.speed_bonus(&self.research) as f64 / 100.0;
        let capacity_bonus = tree.capacity_bonus(&self.research) as f64 / 100.0;

        let id = self.next_train_id;
        self.next_train_id += 1;

        let train = Train {
            id,
            name: format!("{} {}", train_type.name(), id),
            train_type,
            route,
            stops: stops.to_vec(),
            current_segment: 0,
            progress: 0.0,
            speed: profile.speed * (1.0 + speed_bonus),
            capacity: (profile.capacity as f64 * (1.0 + capacity_bonus)).floor() as u32,
            cargo: BTreeMap::new(),
            revenue: 0,
            maintenance_cost: profile.maintenance,
        };

        self.funds -= profile.cost;
        debug!(id, %train_type, route_len = train.route.len(), cost = profile.cost, "train purchased");

        let text = format!("{} is now in service", train.name);
        self.trains.push(train);
        self.notifications.push(
            NotificationIcon::Train,
            "New Train",
            text,
            Severity::Success,
        );

        Ok(id)
    }

    /// Retire a train and return the refund.
    pub fn remove_train(&mut self, id: TrainId) -> Result<i64, TrainError> {
        let index = self
            .trains
            .iter()
            .position(|t| t.id == id)
            .ok_or(TrainError::NotFound(id))?;

        let train = self.trains.remove(index);
        let refund = train.train_type.refund();
        self.funds += refund;
        debug!(id, refund, "train retired");
        Ok(refund)
    }

    /// Move every train by `delta` real seconds at the current game speed.
    pub fn update_trains(&mut self, delta: f64) {
        if self.speed.is_paused() {
            return;
        }

        let multiplier = self.speed.multiplier();
        let revenue_bonus = TechTree::standard().revenue_bonus(&self.research);

        let GameState {
            trains,
            stations,
            rng,
            monthly_income,
            total_revenue,
            ..
        } = self;

        for train in trains.iter_mut() {
            let event = train.advance(train.speed * multiplier * delta);
            let mut earned = 0;

            if event == MoveEvent::LegCompleted {
                earned += train.leg_revenue(revenue_bonus);
            }

            if event.reached_hex() {
                let at_city_station = train
                    .current_hex()
                    .and_then(|hex| stations.get(&hex))
                    .is_some_and(|station| station.city.is_some());
                if at_city_station {
                    earned += delivery_revenue(rng);
                }
            }

            if earned > 0 {
                train.revenue += earned;
                *monthly_income += earned;
                *total_revenue += earned;
            }
        }
    }
}
