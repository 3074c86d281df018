//! Player actions and their application to the game state.
//!
//! Actions are plain serializable values, so a host can record a session or
//! replay a scripted one from JSON.

use crate::economy::MonthlyReport;
use crate::game_state::{GameError, GameState};
use crate::hex::HexCoord;
use crate::train::TrainType;
use crate::types::{GameSpeed, TechId, TrainId};
use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameAction {
    // Construction
    BuildTrack {
        from: HexCoord,
        to: HexCoord,
    },
    BuildTrackRun {
        from: HexCoord,
        to: HexCoord,
    },
    BuildStation {
        hex: HexCoord,
    },

    // Rolling stock
    BuyTrain {
        train_type: TrainType,
        stops: Vec<HexCoord>,
    },
    RemoveTrain {
        train_id: TrainId,
    },

    // Research
    Research {
        tech_id: TechId,
    },

    // Time
    SetSpeed {
        speed: GameSpeed,
    },
    Tick {
        seconds: f64,
    },
    AdvanceMonth,
}

impl GameAction {
    /// Get a human-readable description of the action.
    pub fn description(&self) -> String {
        match self {
            GameAction::BuildTrack { from, to } => format!("Build track {} -> {}", from, to),
            GameAction::BuildTrackRun { from, to } => {
                format!("Build track run {} -> {}", from, to)
            }
            GameAction::BuildStation { hex } => format!("Build station at {}", hex),
            GameAction::BuyTrain { train_type, stops } => {
                format!("Buy {} train serving {} stops", train_type, stops.len())
            }
            GameAction::RemoveTrain { train_id } => format!("Retire train {}", train_id),
            GameAction::Research { tech_id } => format!("Research {}", tech_id),
            GameAction::SetSpeed { speed } => format!("Set speed to {}", speed.level()),
            GameAction::Tick { seconds } => format!("Run {:.2}s", seconds),
            GameAction::AdvanceMonth => "Advance one month".to_string(),
        }
    }
}

/// What a successfully applied action did.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ActionOutcome {
    Built { cost: i64 },
    TrackRun { built: usize, cost: i64 },
    TrainBought { train_id: TrainId },
    TrainRemoved { refund: i64 },
    Researched { tech_id: TechId },
    SpeedChanged { speed: GameSpeed },
    Ticked,
    MonthAdvanced { report: MonthlyReport },
}

impl GameState {
    /// Apply a single action.
    ///
    /// A track run that stops before building anything reports the reason
    /// as an error. A run that built at least one segment succeeds.
    pub fn apply(&mut self, action: &GameAction) -> Result<ActionOutcome, GameError> {
        let outcome = match action {
            GameAction::BuildTrack { from, to } => ActionOutcome::Built {
                cost: self.build_track(*from, *to)?,
            },
            GameAction::BuildTrackRun { from, to } => {
                let run = self.build_track_run(*from, *to);
                match run.stopped {
                    Some(err) if run.built == 0 => return Err(err.into()),
                    _ => ActionOutcome::TrackRun {
                        built: run.built,
                        cost: run.cost,
                    },
                }
            }
            GameAction::BuildStation { hex } => ActionOutcome::Built {
                cost: self.build_station(*hex)?,
            },
            GameAction::BuyTrain { train_type, stops } => ActionOutcome::TrainBought {
                train_id: self.buy_train(*train_type, stops)?,
            },
            GameAction::RemoveTrain { train_id } => ActionOutcome::TrainRemoved {
                refund: self.remove_train(*train_id)?,
            },
            GameAction::Research { tech_id } => {
                let tech = self.unlock_tech(tech_id)?;
                ActionOutcome::Researched {
                    tech_id: tech.id.to_string(),
                }
            }
            GameAction::SetSpeed { speed } => {
                self.speed = *speed;
                ActionOutcome::SpeedChanged { speed: *speed }
            }
            GameAction::Tick { seconds } => {
                self.update_trains(*seconds);
                ActionOutcome::Ticked
            }
            GameAction::AdvanceMonth => ActionOutcome::MonthAdvanced {
                report: self.advance_time(),
            },
        };
        Ok(outcome)
    }
}
