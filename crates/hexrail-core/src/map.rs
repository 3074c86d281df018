//! Game map: terrain, cities, resources and fog of war.

use crate::hex::HexCoord;
use crate::terrain::{Good, Resource, Terrain};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// The game map produced by the generator and owned by the game state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameMap {
    /// Map width in hexes (q axis).
    pub width: u32,
    /// Map height in hexes (r axis).
    pub height: u32,
    /// Terrain of every hex on the map.
    pub terrain: HashMap<HexCoord, Terrain>,
    /// Cities in placement order.
    pub cities: Vec<CityData>,
    /// Hexes revealed to the player. Only ever grows.
    pub explored: HashSet<HexCoord>,
    /// Sparse resource deposits.
    pub resources: HashMap<HexCoord, Resource>,
}

impl GameMap {
    /// Create a new empty map with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            terrain: HashMap::with_capacity(Self::area(width, height)),
            cities: Vec::new(),
            explored: HashSet::new(),
            resources: HashMap::new(),
        }
    }

    /// Create a map filled with a single terrain type (useful for testing).
    pub fn filled(width: u32, height: u32, terrain: Terrain) -> Self {
        let mut map = Self::new(width, height);
        for q in 0..width as i32 {
            for r in 0..height as i32 {
                map.terrain.insert(HexCoord::new(q, r), terrain);
            }
        }
        map
    }

    /// Terrain at the given hex, if it is on the map.
    pub fn terrain_at(&self, coord: &HexCoord) -> Option<Terrain> {
        self.terrain.get(coord).copied()
    }

    /// Check if a coordinate is on the map.
    pub fn in_bounds(&self, coord: &HexCoord) -> bool {
        self.terrain.contains_key(coord)
    }

    /// Get neighbors of a hex that are on the map.
    pub fn neighbors(&self, coord: &HexCoord) -> Vec<HexCoord> {
        coord
            .neighbors()
            .into_iter()
            .filter(|c| self.in_bounds(c))
            .collect()
    }

    /// Index of the city located at `coord`.
    pub fn city_index_at(&self, coord: &HexCoord) -> Option<usize> {
        self.cities.iter().position(|c| c.hex == *coord)
    }

    /// City located at `coord`.
    pub fn city_at(&self, coord: &HexCoord) -> Option<&CityData> {
        self.cities.iter().find(|c| c.hex == *coord)
    }

    /// Resource deposit at `coord`.
    pub fn resource_at(&self, coord: &HexCoord) -> Option<Resource> {
        self.resources.get(coord).copied()
    }

    /// Reveal every on-map hex within `radius` of `center`.
    ///
    /// Returns the number of newly explored hexes.
    pub fn reveal(&mut self, center: &HexCoord, radius: u32) -> usize {
        let mut revealed = 0;
        for coord in center.hexes_in_radius(radius) {
            if self.terrain.contains_key(&coord) && self.explored.insert(coord) {
                revealed += 1;
            }
        }
        revealed
    }

    /// Whether the player has explored `coord`.
    pub fn is_explored(&self, coord: &HexCoord) -> bool {
        self.explored.contains(coord)
    }

    /// Hex count of a `width` x `height` map, computed without `u32` overflow.
    pub fn area(width: u32, height: u32) -> usize {
        (width as usize) * (height as usize)
    }

    /// Count total hexes in the map.
    pub fn tile_count(&self) -> usize {
        self.terrain.len()
    }

    /// Number of hexes of each terrain type.
    pub fn terrain_histogram(&self) -> BTreeMap<Terrain, usize> {
        let mut counts = BTreeMap::new();
        for terrain in self.terrain.values() {
            *counts.entry(*terrain).or_insert(0) += 1;
        }
        counts
    }

    /// Iterate over all hexes and their terrain.
    pub fn iter(&self) -> impl Iterator<Item = (&HexCoord, &Terrain)> {
        self.terrain.iter()
    }
}

impl Default for GameMap {
    fn default() -> Self {
        Self::new(40, 30)
    }
}

/// A city placed during map generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityData {
    /// Location on the map.
    pub hex: HexCoord,
    /// Unique city name.
    pub name: String,
    /// Current population.
    pub population: u32,
    /// Goods the city wants, fixed at generation.
    pub demand: BTreeMap<Good, u32>,
    /// Goods the city produces, fixed at generation.
    pub supply: BTreeMap<Good, u32>,
    /// Set once the first station is built on the city hex.
    pub has_station: bool,
    /// Fractional monthly growth rate while served by a station.
    pub growth: f64,
}

impl CityData {
    /// Create a city with no demand or supply.
    pub fn new(hex: HexCoord, name: impl Into<String>, population: u32, growth: f64) -> Self {
        Self {
            hex,
            name: name.into(),
            population,
            demand: BTreeMap::new(),
            supply: BTreeMap::new(),
            has_station: false,
            growth,
        }
    }

    /// Apply one month of growth. Cities without a station do not grow.
    pub fn grow(&mut self) {
        if self.has_station {
            self.population = (self.population as f64 * (1.0 + self.growth)).floor() as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_map() {
        let map = GameMap::filled(10, 8, Terrain::Plains);
        assert_eq!(map.tile_count(), 80);
        assert_eq!(map.terrain_at(&HexCoord::new(9, 7)), Some(Terrain::Plains));
        assert_eq!(map.terrain_at(&HexCoord::new(10, 0)), None);
        assert!(!map.in_bounds(&HexCoord::new(-1, 0)));
    }

    #[test]
    fn test_area_does_not_wrap() {
        assert_eq!(GameMap::area(40, 30), 1_200);
        // 65536 * 65536 wraps to zero in u32
        assert_eq!(GameMap::area(65_536, 65_536) as u64, 1 << 32);
        assert_eq!(GameMap::area(u32::MAX, 0), 0);
    }

    #[test]
    fn test_neighbors_at_edge() {
        let map = GameMap::filled(10, 10, Terrain::Plains);
        // Corner (0, 0) only keeps E and SE
        let n = map.neighbors(&HexCoord::new(0, 0));
        assert_eq!(n.len(), 2);
        assert_eq!(map.neighbors(&HexCoord::new(5, 5)).len(), 6);
    }

    #[test]
    fn test_reveal_is_monotonic() {
        let mut map = GameMap::filled(20, 20, Terrain::Plains);
        let center = HexCoord::new(10, 10);

        assert_eq!(map.reveal(&center, 1), 7);
        assert_eq!(map.reveal(&center, 1), 0);
        assert_eq!(map.reveal(&center, 2), 12);
        assert_eq!(map.explored.len(), 19);
        assert!(map.is_explored(&center));
    }

    #[test]
    fn test_reveal_clips_to_map() {
        let mut map = GameMap::filled(5, 5, Terrain::Plains);
        map.reveal(&HexCoord::new(0, 0), 3);
        assert!(map.explored.iter().all(|h| map.in_bounds(h)));
    }

    #[test]
    fn test_city_growth_requires_station() {
        let mut city = CityData::new(HexCoord::new(1, 1), "Ashford", 1000, 0.1);
        city.grow();
        assert_eq!(city.population, 1000);

        city.has_station = true;
        city.grow();
        assert_eq!(city.population, 1100);
    }

    #[test]
    fn test_city_lookup() {
        let mut map = GameMap::filled(10, 10, Terrain::Plains);
        map.cities.push(CityData::new(HexCoord::new(2, 3), "Ashford", 900, 0.01));
        map.cities.push(CityData::new(HexCoord::new(7, 7), "Bramley", 1200, 0.01));

        assert_eq!(map.city_index_at(&HexCoord::new(7, 7)), Some(1));
        assert_eq!(map.city_at(&HexCoord::new(2, 3)).map(|c| c.name.as_str()), Some("Ashford"));
        assert!(map.city_at(&HexCoord::new(0, 0)).is_none());
    }

    #[test]
    fn test_histogram() {
        let mut map = GameMap::filled(4, 4, Terrain::Plains);
        map.terrain.insert(HexCoord::new(0, 0), Terrain::Water);
        let hist = map.terrain_histogram();
        assert_eq!(hist.get(&Terrain::Water), Some(&1));
        assert_eq!(hist.get(&Terrain::Plains), Some(&15));
    }
}
