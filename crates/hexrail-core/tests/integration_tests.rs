//! Integration tests for complete Hex Rail game flows.
//!
//! These tests verify end-to-end scenarios including:
//! - Map generation and determinism
//! - Track and station construction
//! - Train purchase, movement and revenue
//! - Monthly settlement and era progression
//! - Research unlocks
//! - Save/load serialization

use hexrail_core::{
    actions::{ActionOutcome, GameAction},
    game_state::{GameError, GameState},
    hex::HexCoord,
    map::{CityData, GameMap},
    mapgen::{generate_map, MapGenConfig, MapGenerator},
    network::BuildError,
    settings::GameSettings,
    terrain::Terrain,
    train::{TrainError, TrainType},
    types::{Era, GameSpeed},
};

// =============================================================================
// Test Helpers
// =============================================================================

/// Create a map filled with plains for testing
fn create_test_map(width: u32, height: u32) -> GameMap {
    GameMap::filled(width, height, Terrain::Plains)
}

/// A state with a straight line of track from (0, 2) to (4, 2) and a station
/// at each end.
fn create_line_state(map: GameMap) -> GameState {
    let mut state = GameState::new(map);
    state.funds = 500_000;
    state.reseed(7);

    let run = state.build_track_run(HexCoord::new(0, 2), HexCoord::new(4, 2));
    assert_eq!(run.built, 4);
    state.build_station(HexCoord::new(0, 2)).unwrap();
    state.build_station(HexCoord::new(4, 2)).unwrap();
    state
}

fn line_stops() -> [HexCoord; 2] {
    [HexCoord::new(0, 2), HexCoord::new(4, 2)]
}

// =============================================================================
// 1. Map Generation Tests
// =============================================================================

mod map_generation {
    use super::*;

    #[test]
    fn test_same_seed_same_terrain() {
        let a = generate_map(40, 30, 42);
        let b = generate_map(40, 30, 42);
        assert_eq!(a.tile_count(), 1200);

        // Rivers use unseeded placement; everything else comes from the seed
        for (hex, terrain) in a.iter() {
            let other = b.terrain_at(hex).unwrap();
            if *terrain != Terrain::River && other != Terrain::River {
                assert_eq!(*terrain, other, "terrain differs at {}", hex);
            }
        }
    }

    #[test]
    fn test_base_terrain_bit_for_bit() {
        let config = MapGenConfig {
            width: 40,
            height: 30,
            seed: 42,
        };
        let a = MapGenerator::new(config.clone());
        let b = MapGenerator::new(config);
        assert_eq!(a.base_terrain(), b.base_terrain());

        for hex in [HexCoord::new(0, 0), HexCoord::new(20, 15), HexCoord::new(39, 29)] {
            assert_eq!(a.elevation_at(&hex).to_bits(), b.elevation_at(&hex).to_bits());
            assert_eq!(a.moisture_at(&hex).to_bits(), b.moisture_at(&hex).to_bits());
        }
    }

    #[test]
    fn test_generated_map_is_complete() {
        let map = generate_map(40, 30, 42);
        for q in 0..40 {
            for r in 0..30 {
                assert!(map.terrain_at(&HexCoord::new(q, r)).is_some());
            }
        }
        assert!(!map.cities.is_empty());
        assert!(map.cities.len() <= 15);
    }

    #[test]
    fn test_cities_spaced_and_named_uniquely() {
        let map = generate_map(40, 30, 42);
        for (i, a) in map.cities.iter().enumerate() {
            for b in &map.cities[i + 1..] {
                assert!(a.hex.distance(&b.hex) >= 5);
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_start_area_revealed() {
        let map = generate_map(40, 30, 42);
        let first = &map.cities[0];
        for hex in first.hex.hexes_in_radius(4) {
            if map.in_bounds(&hex) {
                assert!(map.is_explored(&hex));
            }
        }
    }
}

// =============================================================================
// 2. Construction Tests
// =============================================================================

mod construction {
    use super::*;

    #[test]
    fn test_track_scenario_on_generated_map() {
        let map = generate_map(40, 30, 42);

        // Find any plains hex with an on-map land neighbor
        let (from, to) = map
            .iter()
            .filter(|(_, t)| **t == Terrain::Plains)
            .flat_map(|(hex, _)| map.neighbors(hex).into_iter().map(move |n| (n, *hex)))
            .find(|(n, _)| map.terrain_at(n).is_some_and(|t| t != Terrain::Water))
            .expect("map has plains");

        let mut state = GameState::new(map);
        assert_eq!(state.funds, 50_000);

        assert_eq!(state.build_track(from, to), Ok(500));
        assert_eq!(state.funds, 49_500);

        let err = state.build_track(from, to).unwrap_err();
        assert_eq!(err.to_string(), "Track already exists");
        assert_eq!(state.funds, 49_500);
    }

    #[test]
    fn test_water_never_buildable() {
        let mut map = create_test_map(10, 10);
        map.terrain.insert(HexCoord::new(5, 5), Terrain::Water);
        let mut state = GameState::new(map);

        for funds in [0, 500, 1_000_000, i64::MAX] {
            state.funds = funds;
            for neighbor in HexCoord::new(5, 5).neighbors() {
                assert_eq!(
                    state.can_build_track(neighbor, HexCoord::new(5, 5)),
                    Err(BuildError::Water)
                );
            }
        }
    }

    #[test]
    fn test_station_connectivity_rules() {
        let mut state = GameState::new(create_test_map(12, 12));

        // Empty network: anywhere buildable is fine
        assert!(state.can_build_station(HexCoord::new(9, 9)).is_ok());
        state.build_station(HexCoord::new(1, 1)).unwrap();

        // Every hex without track is now rejected
        for hex in [HexCoord::new(9, 9), HexCoord::new(2, 1), HexCoord::new(5, 5)] {
            assert_eq!(state.can_build_station(hex), Err(BuildError::Disconnected));
        }
    }

    #[test]
    fn test_construction_reveals_fog() {
        let mut state = GameState::new(create_test_map(20, 20));
        assert!(state.map.explored.is_empty());

        state.build_station(HexCoord::new(10, 10)).unwrap();
        let after_station = state.map.explored.len();
        assert_eq!(after_station, 37);

        state.build_track(HexCoord::new(10, 10), HexCoord::new(11, 10)).unwrap();
        assert!(state.map.explored.len() >= after_station);
    }
}

// =============================================================================
// 3. Train Tests
// =============================================================================

mod trains {
    use super::*;

    #[test]
    fn test_unresearched_purchase_never_charges() {
        let mut state = create_line_state(create_test_map(10, 10));
        let funds = state.funds;
        for train_type in [
            TrainType::Mail,
            TrainType::Express,
            TrainType::Bullet,
            TrainType::Hyperloop,
        ] {
            assert_eq!(
                state.buy_train(train_type, &line_stops()),
                Err(TrainError::TechRequired(train_type))
            );
        }
        assert_eq!(state.funds, funds);
        assert!(state.trains.is_empty());
    }

    #[test]
    fn test_leg_revenue_over_traversals() {
        let mut state = create_line_state(create_test_map(10, 10));
        state.buy_train(TrainType::Passenger, &line_stops()).unwrap();

        // 5 hexes, passenger multiplier 2
        let per_leg = 5 * 100 * 2;
        let traversals = 3;

        // One edge per second at normal speed, 4 edges per leg
        for _ in 0..(traversals * 2 * 4) {
            state.update_trains(1.0);
        }

        let train = &state.trains[0];
        assert_eq!(train.revenue, 2 * traversals as i64 * per_leg);
        assert_eq!(state.total_revenue, train.revenue);
        assert_eq!(state.monthly_income, train.revenue);
        assert_eq!(train.route[0], HexCoord::new(0, 2));
    }

    #[test]
    fn test_delivery_bonus_bounds() {
        let mut map = create_test_map(10, 10);
        map.cities.push(CityData::new(HexCoord::new(0, 2), "Ashford", 2000, 0.01));
        map.cities.push(CityData::new(HexCoord::new(4, 2), "Bramley", 2000, 0.01));
        let mut state = create_line_state(map);
        state.buy_train(TrainType::Freight, &line_stops()).unwrap();

        let legs = 6;
        // Freight at 0.8 edges/s crosses one edge per 1.5s step
        for _ in 0..(legs * 4) {
            state.update_trains(1.5);
        }

        let leg_revenue = 5 * 100;
        let bonus = state.trains[0].revenue - legs as i64 * leg_revenue;
        assert!(bonus >= legs as i64 * 50, "bonus {}", bonus);
        assert!(bonus <= legs as i64 * 249, "bonus {}", bonus);
    }

    #[test]
    fn test_research_bonus_on_revenue() {
        let mut state = create_line_state(create_test_map(10, 10));
        state.research.unlocked.insert("postal_contracts".into());
        state.research.unlocked.insert("dining_cars".into());
        state.buy_train(TrainType::Luxury, &line_stops()).unwrap();

        // Luxury at 1.1 edges/s: one edge per step
        for _ in 0..4 {
            state.update_trains(1.0);
        }
        // floor(5 * 100 * 3 * 1.1)
        assert_eq!(state.trains[0].revenue, 1650);
    }

    #[test]
    fn test_paused_game_freezes() {
        let mut state = create_line_state(create_test_map(10, 10));
        state.buy_train(TrainType::Passenger, &line_stops()).unwrap();
        state.speed = GameSpeed::Paused;
        for _ in 0..100 {
            state.update_trains(1.0);
        }
        assert_eq!(state.trains[0].current_segment, 0);
        assert_eq!(state.total_revenue, 0);
    }
}

// =============================================================================
// 4. Economy Tests
// =============================================================================

mod economy {
    use super::*;

    #[test]
    fn test_month_cycle() {
        let mut state = create_line_state(create_test_map(10, 10));
        state.buy_train(TrainType::Passenger, &line_stops()).unwrap();
        for _ in 0..8 {
            state.update_trains(1.0);
        }
        let earned = state.monthly_income;
        assert_eq!(earned, 2000);
        let funds = state.funds;

        let report = state.advance_time();
        // 4 tracks * 10 + 2 halts * 30 + passenger 350
        assert_eq!(report.maintenance.total, 450);
        assert_eq!(state.funds, funds + earned - 450);
        assert_eq!(state.monthly_income, 0);
        assert_eq!(state.monthly_expenses, 0);
        assert_eq!(state.last_month_income, earned);
        // 2 stations * 10 + floor(2% of 2000)
        assert_eq!(state.research_rate, 60.0);
    }

    #[test]
    fn test_era_progression_is_monotonic() {
        let mut state = GameState::new(create_test_map(10, 10));
        let mut seen = vec![state.era];
        while state.year < 2001 {
            state.apply(&GameAction::AdvanceMonth).unwrap();
            if seen.last() != Some(&state.era) {
                seen.push(state.era);
            }
            if state.year >= 1900 {
                assert!(state.era >= Era::Diesel);
            }
        }
        assert_eq!(seen, vec![Era::Steam, Era::Diesel, Era::Electric, Era::Maglev]);
    }

    #[test]
    fn test_era_track_rates() {
        let mut state = create_line_state(create_test_map(10, 10));
        state.era = Era::Maglev;
        assert_eq!(state.maintenance().tracks, 4 * 15);
    }
}

// =============================================================================
// 5. Research Tests
// =============================================================================

mod research {
    use super::*;

    #[test]
    fn test_research_unlocks_purchase() {
        let mut state = create_line_state(create_test_map(10, 10));
        assert!(state.buy_train(TrainType::Mail, &line_stops()).is_err());

        state.research.points = 60.0;
        state.unlock_tech("postal_contracts").unwrap();
        assert_eq!(state.research.points, 0.0);
        assert!(state.buy_train(TrainType::Mail, &line_stops()).is_ok());
    }

    #[test]
    fn test_points_accumulate_from_stations() {
        let mut state = create_line_state(create_test_map(10, 10));
        for _ in 0..3 {
            state.advance_time();
        }
        assert_eq!(state.research.points, 60.0);
        assert!(state.can_research("postal_contracts").is_ok());
        assert!(state.can_research("heavy_haulage").is_err());
    }
}

// =============================================================================
// 6. Action Replay Tests
// =============================================================================

mod action_replay {
    use super::*;

    #[test]
    fn test_scripted_session() {
        let script = r#"[
            {"type": "BuildStation", "hex": "1,1"},
            {"type": "BuildTrackRun", "from": "1,1", "to": "5,1"},
            {"type": "BuildStation", "hex": "5,1"},
            {"type": "BuyTrain", "train_type": "passenger", "stops": ["1,1", "5,1"]},
            {"type": "SetSpeed", "speed": "fast"},
            {"type": "Tick", "seconds": 0.5},
            {"type": "AdvanceMonth"}
        ]"#;
        let actions: Vec<GameAction> = serde_json::from_str(script).unwrap();
        let mut state = GameState::new(create_test_map(10, 10));

        let outcomes: Vec<_> = actions
            .iter()
            .map(|a| state.apply(a))
            .collect::<Result<_, GameError>>()
            .unwrap();

        assert_eq!(outcomes[1], ActionOutcome::TrackRun { built: 4, cost: 2000 });
        assert_eq!(outcomes[3], ActionOutcome::TrainBought { train_id: 1 });
        assert_eq!(state.month, 1);
        assert_eq!(state.trains[0].current_segment, 1);
    }

    #[test]
    fn test_failed_action_leaves_state() {
        let mut state = GameState::new(create_test_map(10, 10));
        let before = serde_json::to_string(&state.tracks).unwrap();
        let err = state
            .apply(&GameAction::BuildTrack {
                from: HexCoord::new(0, 0),
                to: HexCoord::new(3, 3),
            })
            .unwrap_err();
        assert_eq!(err, GameError::Build(BuildError::NotAdjacent));
        assert_eq!(serde_json::to_string(&state.tracks).unwrap(), before);
    }
}

// =============================================================================
// 7. Serialization Tests
// =============================================================================

mod serialization {
    use super::*;

    #[test]
    fn test_generated_game_round_trip() {
        let settings = GameSettings {
            map_width: 24,
            map_height: 18,
            seed: Some(42),
            ..Default::default()
        };
        let (mut state, _) = GameState::generate(&settings).unwrap();
        state.advance_time();

        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.map.terrain, state.map.terrain);
        assert_eq!(restored.map.cities.len(), state.map.cities.len());
        assert_eq!(restored.month, 1);
        assert_eq!(restored.funds, state.funds);
    }
}
