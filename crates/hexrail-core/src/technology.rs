//! Technology tree and research system.
//!
//! The tree is a static acyclic graph of 16 technologies spread over the four
//! eras. Research is instantaneous: once a player has the points and every
//! prerequisite, unlocking subtracts the cost and the effects apply at once.
//! Bonus effects are additive percentages summed over every unlocked
//! technology.

use crate::train::TrainType;
use crate::types::{Era, TechId, TrackType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;
use thiserror::Error;

/// Technology every new game starts with.
pub const BASELINE_TECH: &str = "steam_power";

/// Upper bound on the aggregate maintenance reduction, in percent.
pub const MAX_MAINTENANCE_REDUCTION: u32 = 75;

/// A single effect granted by a technology.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TechEffect {
    /// Makes a train class purchasable.
    UnlockTrain(TrainType),
    /// Percent added to train speed at purchase.
    SpeedBonus(u32),
    /// Percent added to train capacity at purchase.
    CapacityBonus(u32),
    /// Percent taken off monthly maintenance.
    MaintenanceReduction(u32),
    /// Percent added to leg-completion revenue.
    RevenueBonus(u32),
    /// Makes a track grade available.
    UnlockTrack(TrackType),
}

/// A technology in the tech tree.
#[derive(Clone, Debug, Serialize)]
pub struct Technology {
    /// Unique identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Era this technology belongs to.
    pub era: Era,
    /// Research point cost.
    pub cost: u32,
    /// Technologies that must all be unlocked first.
    pub prerequisites: Vec<&'static str>,
    /// What unlocking this technology grants.
    pub effects: Vec<TechEffect>,
    /// Short description for the research panel.
    pub description: &'static str,
}

impl Technology {
    /// Create a new technology.
    pub fn new(id: &'static str, name: &'static str, era: Era, cost: u32) -> Self {
        Self {
            id,
            name,
            era,
            cost,
            prerequisites: Vec::new(),
            effects: Vec::new(),
            description: "",
        }
    }

    /// Add prerequisites.
    pub fn with_prerequisites(mut self, prereqs: &[&'static str]) -> Self {
        self.prerequisites.extend_from_slice(prereqs);
        self
    }

    /// Add an effect.
    pub fn with_effect(mut self, effect: TechEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Set description.
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

/// Why a technology cannot be researched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResearchError {
    #[error("Already researched")]
    AlreadyUnlocked,
    #[error("Unknown technology")]
    UnknownTechnology,
    #[error("Requires {name}")]
    MissingPrerequisite { name: &'static str },
    #[error("Need {required} RP (have {current})")]
    InsufficientPoints { required: u32, current: u64 },
}

/// Research progress of the player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResearchState {
    /// Accumulated research points.
    pub points: f64,
    /// Unlocked technology ids.
    pub unlocked: BTreeSet<TechId>,
    /// Reserved for a timed research queue; unlocking ignores it.
    pub current_research: Option<TechId>,
    /// Reserved for a timed research queue; unlocking ignores it.
    pub progress: f64,
}

impl ResearchState {
    /// Fresh research state holding only the baseline technology.
    pub fn new() -> Self {
        let mut unlocked = BTreeSet::new();
        unlocked.insert(BASELINE_TECH.to_string());
        Self {
            points: 0.0,
            unlocked,
            current_research: None,
            progress: 0.0,
        }
    }

    /// Points rounded down, as shown to the player and used for spend checks.
    pub fn available_points(&self) -> u64 {
        self.points.max(0.0).floor() as u64
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }
}

impl Default for ResearchState {
    fn default() -> Self {
        Self::new()
    }
}

/// The complete technology tree.
#[derive(Clone, Debug)]
pub struct TechTree {
    /// Technologies in catalog order.
    techs: Vec<Technology>,
    /// Position of each technology in `techs`.
    index: HashMap<&'static str, usize>,
}

impl TechTree {
    /// Create a new tech tree with all technologies.
    pub fn new() -> Self {
        let mut tree = Self {
            techs: Vec::new(),
            index: HashMap::new(),
        };

        tree.add_steam_techs();
        tree.add_diesel_techs();
        tree.add_electric_techs();
        tree.add_maglev_techs();

        tree
    }

    /// Shared instance of the standard tree.
    pub fn standard() -> &'static TechTree {
        static TREE: OnceLock<TechTree> = OnceLock::new();
        TREE.get_or_init(TechTree::new)
    }

    /// Add a technology to the tree.
    fn add(&mut self, tech: Technology) {
        self.index.insert(tech.id, self.techs.len());
        self.techs.push(tech);
    }

    /// Get a technology by ID.
    pub fn get(&self, id: &str) -> Option<&Technology> {
        self.index.get(id).map(|&i| &self.techs[i])
    }

    /// All technologies in catalog order.
    pub fn all(&self) -> &[Technology] {
        &self.techs
    }

    /// Get all technologies in an era.
    pub fn get_era(&self, era: Era) -> Vec<&Technology> {
        self.techs.iter().filter(|t| t.era == era).collect()
    }

    pub fn len(&self) -> usize {
        self.techs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.techs.is_empty()
    }

    /// Check whether `id` can be unlocked right now.
    ///
    /// Returns the technology on success.
    pub fn can_research(
        &self,
        research: &ResearchState,
        id: &str,
    ) -> Result<&Technology, ResearchError> {
        if research.is_unlocked(id) {
            return Err(ResearchError::AlreadyUnlocked);
        }
        let tech = self.get(id).ok_or(ResearchError::UnknownTechnology)?;

        if let Some(missing) = tech
            .prerequisites
            .iter()
            .find(|prereq| !research.is_unlocked(prereq))
        {
            let name = self.get(missing).map(|t| t.name).unwrap_or(*missing);
            return Err(ResearchError::MissingPrerequisite { name });
        }

        if research.points < tech.cost as f64 {
            return Err(ResearchError::InsufficientPoints {
                required: tech.cost,
                current: research.available_points(),
            });
        }

        Ok(tech)
    }

    /// Unlock `id`, spending its cost.
    pub fn unlock(
        &self,
        research: &mut ResearchState,
        id: &str,
    ) -> Result<&Technology, ResearchError> {
        let tech = self.can_research(research, id)?;
        research.points -= tech.cost as f64;
        research.unlocked.insert(tech.id.to_string());
        Ok(tech)
    }

    /// Technologies that can be researched given enough points, in catalog order.
    pub fn available_techs(&self, research: &ResearchState) -> Vec<&Technology> {
        self.techs
            .iter()
            .filter(|tech| {
                !research.is_unlocked(tech.id)
                    && tech.prerequisites.iter().all(|p| research.is_unlocked(p))
            })
            .collect()
    }

    /// Iterate effects of every unlocked technology.
    fn unlocked_effects<'a>(
        &'a self,
        research: &'a ResearchState,
    ) -> impl Iterator<Item = &'a TechEffect> + 'a {
        research
            .unlocked
            .iter()
            .filter_map(|id| self.get(id))
            .flat_map(|tech| tech.effects.iter())
    }

    fn sum_effects(&self, research: &ResearchState, pick: fn(&TechEffect) -> Option<u32>) -> u32 {
        self.unlocked_effects(research).filter_map(pick).sum()
    }

    /// Total speed bonus in percent.
    pub fn speed_bonus(&self, research: &ResearchState) -> u32 {
        self.sum_effects(research, |e| match e {
            TechEffect::SpeedBonus(v) => Some(*v),
            _ => None,
        })
    }

    /// Total capacity bonus in percent.
    pub fn capacity_bonus(&self, research: &ResearchState) -> u32 {
        self.sum_effects(research, |e| match e {
            TechEffect::CapacityBonus(v) => Some(*v),
            _ => None,
        })
    }

    /// Total revenue bonus in percent.
    pub fn revenue_bonus(&self, research: &ResearchState) -> u32 {
        self.sum_effects(research, |e| match e {
            TechEffect::RevenueBonus(v) => Some(*v),
            _ => None,
        })
    }

    /// Total maintenance reduction in percent, capped at 75.
    pub fn maintenance_reduction(&self, research: &ResearchState) -> u32 {
        self.sum_effects(research, |e| match e {
            TechEffect::MaintenanceReduction(v) => Some(*v),
            _ => None,
        })
        .min(MAX_MAINTENANCE_REDUCTION)
    }

    /// Train types the player may buy.
    pub fn unlocked_train_types(&self, research: &ResearchState) -> BTreeSet<TrainType> {
        self.unlocked_effects(research)
            .filter_map(|e| match e {
                TechEffect::UnlockTrain(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    /// Track grades the player has unlocked.
    pub fn unlocked_track_types(&self, research: &ResearchState) -> Vec<TrackType> {
        let mut types = Vec::new();
        for effect in self.unlocked_effects(research) {
            if let TechEffect::UnlockTrack(t) = effect {
                if !types.contains(t) {
                    types.push(*t);
                }
            }
        }
        types
    }

    /// Whether the prerequisite graph has no cycles.
    pub fn is_acyclic(&self) -> bool {
        let mut remaining: Vec<usize> = self.techs.iter().map(|t| t.prerequisites.len()).collect();
        let mut ready: Vec<usize> = (0..self.techs.len()).filter(|&i| remaining[i] == 0).collect();
        let mut visited = 0;

        while let Some(i) = ready.pop() {
            visited += 1;
            let id = self.techs[i].id;
            for (j, tech) in self.techs.iter().enumerate() {
                let edges = tech.prerequisites.iter().filter(|p| **p == id).count();
                if edges > 0 {
                    remaining[j] -= edges;
                    if remaining[j] == 0 {
                        ready.push(j);
                    }
                }
            }
        }

        visited == self.techs.len()
    }

    /// Add Steam Era technologies.
    fn add_steam_techs(&mut self) {
        self.add(
            Technology::new(BASELINE_TECH, "Steam Power", Era::Steam, 0)
                .with_effect(TechEffect::UnlockTrain(TrainType::Freight))
                .with_effect(TechEffect::UnlockTrain(TrainType::Passenger))
                .with_description("Coal-fired locomotives haul the first goods and passengers."),
        );

        self.add(
            Technology::new("postal_contracts", "Postal Contracts", Era::Steam, 60)
                .with_prerequisites(&[BASELINE_TECH])
                .with_effect(TechEffect::UnlockTrain(TrainType::Mail))
                .with_description("Carry the royal mail between towns."),
        );

        self.add(
            Technology::new("heavy_haulage", "Heavy Haulage", Era::Steam, 100)
                .with_prerequisites(&[BASELINE_TECH])
                .with_effect(TechEffect::UnlockTrain(TrainType::HeavyFreight))
                .with_effect(TechEffect::CapacityBonus(10))
                .with_description("Stronger couplings for longer freight consists."),
        );

        self.add(
            Technology::new("improved_boilers", "Improved Boilers", Era::Steam, 80)
                .with_prerequisites(&[BASELINE_TECH])
                .with_effect(TechEffect::SpeedBonus(10))
                .with_description("Higher boiler pressure for faster running."),
        );
    }

    /// Add Diesel Era technologies.
    fn add_diesel_techs(&mut self) {
        self.add(
            Technology::new("diesel_engines", "Diesel Engines", Era::Diesel, 200)
                .with_prerequisites(&["improved_boilers"])
                .with_effect(TechEffect::UnlockTrain(TrainType::Express))
                .with_effect(TechEffect::SpeedBonus(15)),
        );

        self.add(
            Technology::new("suburban_lines", "Suburban Lines", Era::Diesel, 150)
                .with_prerequisites(&["postal_contracts"])
                .with_effect(TechEffect::UnlockTrain(TrainType::Commuter)),
        );

        self.add(
            Technology::new("dining_cars", "Dining Cars", Era::Diesel, 250)
                .with_prerequisites(&["postal_contracts"])
                .with_effect(TechEffect::UnlockTrain(TrainType::Luxury))
                .with_effect(TechEffect::RevenueBonus(10))
                .with_description("Travel in comfort, for a price."),
        );

        self.add(
            Technology::new("block_signalling", "Block Signalling", Era::Diesel, 180)
                .with_prerequisites(&["improved_boilers"])
                .with_effect(TechEffect::MaintenanceReduction(15))
                .with_effect(TechEffect::UnlockTrack(TrackType::Double)),
        );
    }

    /// Add Electric Era technologies.
    fn add_electric_techs(&mut self) {
        self.add(
            Technology::new("electrification", "Electrification", Era::Electric, 400)
                .with_prerequisites(&["diesel_engines"])
                .with_effect(TechEffect::SpeedBonus(10))
                .with_effect(TechEffect::UnlockTrack(TrackType::Electrified)),
        );

        self.add(
            Technology::new("bogie_wagons", "Bogie Wagons", Era::Electric, 350)
                .with_prerequisites(&["heavy_haulage"])
                .with_effect(TechEffect::CapacityBonus(25)),
        );

        self.add(
            Technology::new("traffic_control", "Centralized Traffic Control", Era::Electric, 450)
                .with_prerequisites(&["block_signalling"])
                .with_effect(TechEffect::MaintenanceReduction(20)),
        );

        self.add(
            Technology::new("bullet_trains", "Bullet Trains", Era::Electric, 600)
                .with_prerequisites(&["electrification"])
                .with_effect(TechEffect::UnlockTrain(TrainType::Bullet))
                .with_effect(TechEffect::UnlockTrack(TrackType::Highspeed))
                .with_description("Dedicated high-speed lines."),
        );
    }

    /// Add Maglev Era technologies.
    fn add_maglev_techs(&mut self) {
        self.add(
            Technology::new("superconductors", "Superconducting Magnets", Era::Maglev, 800)
                .with_prerequisites(&["bullet_trains"])
                .with_effect(TechEffect::SpeedBonus(20)),
        );

        self.add(
            Technology::new("vacuum_tubes", "Vacuum Tubes", Era::Maglev, 1200)
                .with_prerequisites(&["superconductors"])
                .with_effect(TechEffect::UnlockTrain(TrainType::Hyperloop))
                .with_description("Pods in near-vacuum tubes."),
        );

        self.add(
            Technology::new("predictive_maintenance", "Predictive Maintenance", Era::Maglev, 1000)
                .with_prerequisites(&["traffic_control"])
                .with_effect(TechEffect::MaintenanceReduction(30))
                .with_effect(TechEffect::RevenueBonus(15)),
        );

        self.add(
            Technology::new("global_logistics", "Global Logistics", Era::Maglev, 1500)
                .with_prerequisites(&["vacuum_tubes", "predictive_maintenance"])
                .with_effect(TechEffect::RevenueBonus(25))
                .with_effect(TechEffect::CapacityBonus(25))
                .with_effect(TechEffect::MaintenanceReduction(20)),
        );
    }
}

impl Default for TechTree {
    fn default() -> Self {
        Self::new()
    }
}
