//! Monthly settlement and the game calendar.
//!
//! Each simulated month runs one settlement: maintenance is charged,
//! research points are earned, income and expenses are applied to funds in
//! one step, and cities served by a station grow. Era changes are checked
//! only when the year rolls over.

use crate::game_state::GameState;
use crate::notifications::{NotificationIcon, Severity};
use crate::technology::TechTree;
use crate::types::Era;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Research points earned per station each month.
pub const RESEARCH_PER_STATION: f64 = 10.0;
/// Share of monthly income converted into research points.
pub const RESEARCH_INCOME_SHARE: f64 = 0.02;

/// Maintenance charged for one month, before and after research discounts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceBreakdown {
    pub tracks: i64,
    pub stations: i64,
    pub trains: i64,
    /// Capped research discount in percent.
    pub reduction: u32,
    /// Amount actually charged.
    pub total: i64,
}

impl MaintenanceBreakdown {
    pub fn gross(&self) -> i64 {
        self.tracks + self.stations + self.trains
    }
}

/// Summary of one monthly settlement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub month: u32,
    pub year: i32,
    pub income: i64,
    pub expenses: i64,
    pub maintenance: MaintenanceBreakdown,
    pub research_points: f64,
    pub funds: i64,
}

impl MonthlyReport {
    pub fn profit(&self) -> i64 {
        self.income - self.expenses
    }
}

impl GameState {
    /// Maintenance the network would cost this month.
    pub fn maintenance(&self) -> MaintenanceBreakdown {
        let tracks = self.tracks.len() as i64 * self.era.track_maintenance();
        let stations = self
            .stations
            .values()
            .map(|s| s.station_type.maintenance())
            .sum();
        let trains = self
            .trains
            .iter()
            .map(|t| t.monthly_maintenance(self.era))
            .sum();
        let reduction = TechTree::standard().maintenance_reduction(&self.research);

        let mut breakdown = MaintenanceBreakdown {
            tracks,
            stations,
            trains,
            reduction,
            total: 0,
        };
        let discounted = (breakdown.gross() * (100 - reduction as i64)) as f64 / 100.0;
        breakdown.total = discounted.floor() as i64;
        breakdown
    }

    /// Settle the current month.
    pub fn update_economy(&mut self) -> MonthlyReport {
        let maintenance = self.maintenance();
        self.monthly_expenses += maintenance.total;

        let research_points = RESEARCH_PER_STATION * self.stations.len() as f64
            + (RESEARCH_INCOME_SHARE * self.monthly_income as f64).floor();
        self.research.points += research_points;
        self.research_rate = research_points;

        let was_solvent = self.funds >= 0;
        self.funds += self.monthly_income - self.monthly_expenses;

        let report = MonthlyReport {
            month: self.month,
            year: self.year,
            income: self.monthly_income,
            expenses: self.monthly_expenses,
            maintenance,
            research_points,
            funds: self.funds,
        };

        self.last_month_income = self.monthly_income;
        self.last_month_expenses = self.monthly_expenses;
        self.monthly_income = 0;
        self.monthly_expenses = 0;

        for city in &mut self.map.cities {
            city.grow();
        }

        info!(
            month = report.month,
            year = report.year,
            income = report.income,
            expenses = report.expenses,
            funds = report.funds,
            "month settled"
        );

        if was_solvent && self.funds < 0 {
            warn!(funds = self.funds, "funds are negative");
            self.notifications.push(
                NotificationIcon::Money,
                "In the Red",
                "Company funds are negative",
                Severity::Warning,
            );
        }

        report
    }

    /// Advance the calendar by one month and settle it.
    pub fn advance_time(&mut self) -> MonthlyReport {
        self.month += 1;
        if self.month >= 12 {
            self.month = 0;
            self.year += 1;
            self.check_era_transitions();
        }
        self.update_economy()
    }

    /// Move into every era whose start year has been reached, in order.
    fn check_era_transitions(&mut self) {
        while let Some(next) = self.era.next() {
            if self.year < next.start_year() {
                break;
            }
            self.enter_era(next);
        }
    }

    fn enter_era(&mut self, era: Era) {
        info!(%era, year = self.year, "era transition");
        self.era = era;
        self.notifications.push(
            NotificationIcon::Era,
            "New Era",
            format!("The {} has begun", era),
            Severity::Info,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::HexCoord;
    use crate::map::{CityData, GameMap};
    use crate::terrain::Terrain;
    use crate::train::TrainType;

    fn plains_state() -> GameState {
        GameState::new(GameMap::filled(12, 12, Terrain::Plains))
    }

    fn small_network() -> GameState {
        let mut state = plains_state();
        state.funds = 100_000;
        state.build_track(HexCoord::new(0, 0), HexCoord::new(1, 0)).unwrap();
        state.build_track(HexCoord::new(1, 0), HexCoord::new(2, 0)).unwrap();
        state.build_station(HexCoord::new(0, 0)).unwrap();
        state.build_station(HexCoord::new(2, 0)).unwrap();
        state
    }

    #[test]
    fn test_maintenance_breakdown() {
        let mut state = small_network();
        state
            .buy_train(TrainType::Freight, &[HexCoord::new(0, 0), HexCoord::new(2, 0)])
            .unwrap();

        let m = state.maintenance();
        assert_eq!(m.tracks, 2 * 10);
        assert_eq!(m.stations, 2 * 30);
        assert_eq!(m.trains, 300);
        assert_eq!(m.reduction, 0);
        assert_eq!(m.total, 380);
    }

    #[test]
    fn test_maintenance_discount() {
        let mut state = small_network();
        state.research.unlocked.insert("improved_boilers".into());
        state.research.unlocked.insert("block_signalling".into());

        let m = state.maintenance();
        assert_eq!(m.reduction, 15);
        // 80 * 0.85
        assert_eq!(m.total, 68);
    }

    #[test]
    fn test_maintenance_discount_rounds_down() {
        let mut state = small_network();
        state.build_track(HexCoord::new(2, 0), HexCoord::new(3, 0)).unwrap();
        state.research.unlocked.insert("improved_boilers".into());
        state.research.unlocked.insert("block_signalling".into());

        let m = state.maintenance();
        assert_eq!(m.gross(), 90);
        // 90 * 0.85 = 76.5
        assert_eq!(m.total, 76);
    }

    #[test]
    fn test_accumulators_reset() {
        let mut state = small_network();
        state.monthly_income = 5_000;
        state.monthly_expenses = 200;
        let funds = state.funds;

        let report = state.update_economy();

        assert_eq!(state.monthly_income, 0);
        assert_eq!(state.monthly_expenses, 0);
        assert_eq!(state.last_month_income, 5_000);
        assert_eq!(state.last_month_expenses, 200 + 80);
        assert_eq!(state.funds, funds + 5_000 - 280);
        assert_eq!(report.profit(), 5_000 - 280);
    }

    #[test]
    fn test_research_points() {
        let mut state = small_network();
        state.monthly_income = 1_234;
        state.update_economy();
        // 2 stations * 10 + floor(24.68)
        assert_eq!(state.research.points, 44.0);
        assert_eq!(state.research_rate, 44.0);
    }

    #[test]
    fn test_city_growth() {
        let mut map = GameMap::filled(12, 12, Terrain::Plains);
        map.cities.push(CityData::new(HexCoord::new(3, 3), "Ashford", 1000, 0.01));
        map.cities.push(CityData::new(HexCoord::new(8, 8), "Bramley", 1000, 0.01));
        let mut state = GameState::new(map);
        state.build_station(HexCoord::new(3, 3)).unwrap();

        state.update_economy();
        assert_eq!(state.map.cities[0].population, 1010);
        assert_eq!(state.map.cities[1].population, 1000);
    }

    #[test]
    fn test_negative_funds_warning() {
        let mut state = small_network();
        state.funds = 10;
        state.update_economy();
        assert!(state.funds < 0);
        assert_eq!(
            state.notifications.latest().map(|n| n.severity),
            Some(Severity::Warning)
        );

        let count = state.notifications.len();
        let last_id = state.notifications.latest().map(|n| n.id);
        state.update_economy();
        assert_eq!(state.notifications.len(), count);
        assert_eq!(state.notifications.latest().map(|n| n.id), last_id);
    }

    #[test]
    fn test_month_rollover() {
        let mut state = plains_state();
        state.month = 11;
        state.year = 1860;
        state.advance_time();
        assert_eq!(state.month, 0);
        assert_eq!(state.year, 1861);
        assert_eq!(state.era, Era::Steam);
    }

    #[test]
    fn test_era_changes_only_on_rollover() {
        let mut state = plains_state();
        state.year = 1900;
        state.month = 3;
        state.advance_time();
        assert_eq!(state.era, Era::Steam);
    }

    #[test]
    fn test_era_monotonic() {
        let mut state = plains_state();
        assert_eq!(state.year, 1850);

        let mut previous = state.era;
        while state.year < 1900 {
            state.advance_time();
            assert!(state.era >= previous);
            previous = state.era;
        }
        assert_eq!(state.era, Era::Diesel);

        for _ in 0..24 {
            state.advance_time();
            assert_eq!(state.era, Era::Diesel);
        }
    }

    #[test]
    fn test_era_catch_up() {
        let mut state = plains_state();
        state.year = 1999;
        state.month = 11;
        state.advance_time();
        assert_eq!(state.era, Era::Maglev);
        let eras = state
            .notifications
            .iter()
            .filter(|n| n.icon == NotificationIcon::Era)
            .count();
        assert_eq!(eras, 3);
    }

    #[test]
    fn test_settlement_runs_every_month() {
        let mut state = small_network();
        let funds = state.funds;
        state.advance_time();
        state.advance_time();
        assert_eq!(state.funds, funds - 2 * 80);
        assert_eq!(state.research.points, 40.0);
    }
}
