//! Procedural map generation.
//!
//! Terrain classification is driven by two seeded noise fields and is fully
//! reproducible from the seed. Rivers, cities, names and resources draw from a
//! caller-supplied random source: pass a seeded RNG to
//! [`MapGenerator::generate_with_rng`] when the whole map must be reproducible.

use crate::hex::HexCoord;
use crate::map::{CityData, GameMap};
use crate::noise::GradientNoise;
use crate::terrain::{Good, Resource, Terrain};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

const ELEVATION_OCTAVES: u32 = 5;
const MOISTURE_OCTAVES: u32 = 4;
const PERSISTENCE: f64 = 0.5;
const LACUNARITY: f64 = 2.0;
/// Scale from hex space into noise space.
const NOISE_SCALE: f64 = 0.08;
const MOISTURE_SEED_OFFSET: u32 = 7919;
const MOISTURE_SAMPLE_OFFSET: f64 = 100.0;
/// Weight of the radial island mask in the final elevation.
const ISLAND_WEIGHT: f64 = 0.4;

const MIN_RIVERS: u32 = 3;
const MAX_RIVERS: u32 = 5;
const MAX_RIVER_STEPS: usize = 20;

const MAX_CITIES: usize = 15;
const HEXES_PER_CITY: u32 = 60;
const MIN_CITY_SPACING: u32 = 5;
const START_REVEAL_RADIUS: u32 = 4;

const CITY_NAMES: &[&str] = &[
    "Ashford", "Bramley", "Calder", "Dunmore", "Elmstead", "Fairhaven", "Glenrock", "Harrowgate",
    "Ironbridge", "Juniper Falls", "Kingsport", "Larkhill", "Millbrook", "Northwick", "Oakridge",
    "Pemberton", "Queensferry", "Redcliff", "Stonebury", "Thornton", "Upton Vale", "Westmoor",
    "Yarrow", "Zephyr Bay",
];

/// Configuration for map generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapGenConfig {
    /// Width in hexes.
    pub width: u32,
    /// Height in hexes.
    pub height: u32,
    /// Seed for the terrain noise fields.
    pub seed: u32,
}

impl Default for MapGenConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 30,
            seed: 42,
        }
    }
}

/// Generates game maps from a seed.
pub struct MapGenerator {
    config: MapGenConfig,
    elevation: GradientNoise,
    moisture: GradientNoise,
}

impl MapGenerator {
    /// Create a new map generator for the given config.
    pub fn new(config: MapGenConfig) -> Self {
        Self {
            elevation: GradientNoise::new(config.seed),
            moisture: GradientNoise::new(config.seed.wrapping_add(MOISTURE_SEED_OFFSET)),
            config,
        }
    }

    pub fn config(&self) -> &MapGenConfig {
        &self.config
    }

    /// Generate a complete map using the thread-local random source for
    /// placement.
    pub fn generate(&self) -> GameMap {
        self.generate_with_rng(&mut rand::thread_rng())
    }

    /// Generate a complete map, drawing placement randomness from `rng`.
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> GameMap {
        let mut map = GameMap::new(self.config.width, self.config.height);

        // Phase 1: Classify terrain from noise
        map.terrain = self.base_terrain();
        if map.terrain.is_empty() {
            return map;
        }

        // Phase 2: Carve rivers from the highlands
        self.carve_rivers(&mut map, rng);

        // Phase 3: Found cities
        self.place_cities(&mut map, rng);

        // Phase 4: Scatter resources
        self.scatter_resources(&mut map, rng);

        // Phase 5: Reveal around the first city
        if let Some(first) = map.cities.first().map(|c| c.hex) {
            map.reveal(&first, START_REVEAL_RADIUS);
        }

        debug!(
            width = map.width,
            height = map.height,
            seed = self.config.seed,
            cities = map.cities.len(),
            resources = map.resources.len(),
            "generated map"
        );

        map
    }

    /// Terrain classification for every hex before rivers are carved.
    ///
    /// Depends only on the seed and dimensions.
    pub fn base_terrain(&self) -> HashMap<HexCoord, Terrain> {
        let area = GameMap::area(self.config.width, self.config.height);
        let mut terrain = HashMap::with_capacity(area);
        for q in 0..self.config.width as i32 {
            for r in 0..self.config.height as i32 {
                let coord = HexCoord::new(q, r);
                let kind = classify(self.elevation_at(&coord), self.moisture_at(&coord));
                terrain.insert(coord, kind);
            }
        }
        terrain
    }

    /// Final elevation at `coord`: fractal noise blended with the island mask.
    pub fn elevation_at(&self, coord: &HexCoord) -> f64 {
        let (x, y) = noise_position(coord);
        let noise = self.elevation.fractal(x, y, ELEVATION_OCTAVES, PERSISTENCE, LACUNARITY);
        noise * (1.0 - ISLAND_WEIGHT) + self.island_mask(coord) * ISLAND_WEIGHT
    }

    /// Moisture at `coord`.
    pub fn moisture_at(&self, coord: &HexCoord) -> f64 {
        let (x, y) = noise_position(coord);
        self.moisture.fractal(
            x + MOISTURE_SAMPLE_OFFSET,
            y + MOISTURE_SAMPLE_OFFSET,
            MOISTURE_OCTAVES,
            PERSISTENCE,
            LACUNARITY,
        )
    }

    /// `1 - d²` where `d` is the distance from the map center, normalized per
    /// axis so the middle of each edge sits at 1.
    fn island_mask(&self, coord: &HexCoord) -> f64 {
        let half_w = (self.config.width as f64 / 2.0).max(1.0);
        let half_h = (self.config.height as f64 / 2.0).max(1.0);
        let dq = (coord.q as f64 - half_w) / half_w;
        let dr = (coord.r as f64 - half_h) / half_h;
        1.0 - (dq * dq + dr * dr)
    }

    fn carve_rivers<R: Rng + ?Sized>(&self, map: &mut GameMap, rng: &mut R) {
        let attempts = rng.gen_range(MIN_RIVERS..=MAX_RIVERS);

        for _ in 0..attempts {
            let start = HexCoord::new(
                rng.gen_range(0..map.width) as i32,
                rng.gen_range(0..map.height) as i32,
            );

            // Only highland starts are accepted; no retry
            if !map.terrain_at(&start).is_some_and(|t| t.is_highland()) {
                continue;
            }

            let mut current = start;
            for _ in 0..MAX_RIVER_STEPS {
                map.terrain.insert(current, Terrain::River);

                let options = map.neighbors(&current);
                let Some(&next) = options.choose(rng) else {
                    break;
                };
                if map.terrain_at(&next) == Some(Terrain::Water) {
                    break;
                }
                current = next;
            }
        }
    }

    fn place_cities<R: Rng + ?Sized>(&self, map: &mut GameMap, rng: &mut R) {
        let target = MAX_CITIES.min((map.width * map.height / HEXES_PER_CITY) as usize);

        let mut candidates: Vec<HexCoord> = map
            .iter()
            .filter(|(_, t)| t.can_found_city())
            .map(|(c, _)| *c)
            .collect();
        candidates.sort(); // Ensure deterministic order before shuffling
        candidates.shuffle(rng);

        let mut names: Vec<&str> = CITY_NAMES.to_vec();
        names.shuffle(rng);

        for hex in candidates {
            if map.cities.len() >= target {
                break;
            }
            if map
                .cities
                .iter()
                .any(|c| c.hex.distance(&hex) < MIN_CITY_SPACING)
            {
                continue;
            }

            let name = names
                .pop()
                .map(str::to_string)
                .unwrap_or_else(|| format!("City {}", map.cities.len() + 1));
            let population = rng.gen_range(500..5000);
            let growth = rng.gen_range(0.005..0.02);
            let terrain = map.terrain_at(&hex).unwrap_or_default();

            let mut city = CityData::new(hex, name, population, growth);
            city.demand = city_demand(population, rng);
            city.supply = city_supply(terrain, rng);
            map.cities.push(city);
        }
    }

    fn scatter_resources<R: Rng + ?Sized>(&self, map: &mut GameMap, rng: &mut R) {
        let mut coords: Vec<HexCoord> = map.terrain.keys().copied().collect();
        coords.sort(); // Ensure deterministic iteration order

        for coord in coords {
            let Some(terrain) = map.terrain_at(&coord) else {
                continue;
            };
            if let Some((resource, chance)) = Resource::for_terrain(terrain) {
                if rng.gen::<f64>() < chance {
                    map.resources.insert(coord, resource);
                }
            }
        }
    }
}

/// Generate a map with the default placement randomness.
pub fn generate_map(width: u32, height: u32, seed: u32) -> GameMap {
    MapGenerator::new(MapGenConfig {
        width,
        height,
        seed,
    })
    .generate()
}

/// Classify a hex by elevation, then moisture.
///
/// The branch order is significant: a low, wet hex becomes Forest before the
/// Swamp test is reached.
pub fn classify(elevation: f64, moisture: f64) -> Terrain {
    if elevation < -0.15 {
        Terrain::Water
    } else if elevation < -0.05 {
        Terrain::Coast
    } else if elevation > 0.45 {
        Terrain::Mountains
    } else if elevation > 0.3 {
        Terrain::Hills
    } else if moisture > 0.25 {
        Terrain::Forest
    } else if moisture < -0.2 {
        Terrain::Desert
    } else if moisture > 0.1 && elevation < 0.05 {
        Terrain::Swamp
    } else {
        Terrain::Plains
    }
}

/// Demand of a city of `population`.
pub fn city_demand<R: Rng + ?Sized>(population: u32, rng: &mut R) -> BTreeMap<Good, u32> {
    let thousands = population as f64 / 1000.0;
    let mut demand = BTreeMap::new();
    demand.insert(Good::Grain, (thousands * 10.0 + rng.gen::<f64>() * 5.0).floor() as u32);
    demand.insert(Good::Goods, (thousands * 8.0 + rng.gen::<f64>() * 4.0).floor() as u32);
    demand.insert(
        Good::Passengers,
        (thousands * 15.0 + rng.gen::<f64>() * 10.0).floor() as u32,
    );
    demand
}

/// Supply of a city founded on `terrain`.
pub fn city_supply<R: Rng + ?Sized>(terrain: Terrain, rng: &mut R) -> BTreeMap<Good, u32> {
    let mut supply = BTreeMap::new();
    match terrain {
        Terrain::Plains => {
            supply.insert(Good::Grain, rng.gen_range(10..20));
        }
        Terrain::Coast => {
            supply.insert(Good::Passengers, rng.gen_range(5..10));
        }
        Terrain::Forest => {
            supply.insert(Good::Timber, rng.gen_range(8..13));
        }
        _ => {}
    }
    supply
}

/// Axial hex to a cartesian position in noise space.
fn noise_position(coord: &HexCoord) -> (f64, f64) {
    let x = coord.q as f64 + coord.r as f64 * 0.5;
    let y = coord.r as f64 * 0.866;
    (x * NOISE_SCALE, y * NOISE_SCALE)
}
