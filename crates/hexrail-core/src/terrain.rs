//! Terrain types, resources, and trade goods for the game map.

use serde::{Deserialize, Serialize};

/// Base track cost before the terrain multiplier is applied.
pub const BASE_TRACK_COST: i64 = 500;

/// Terrain type of a single hex.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Water,
    Coast,
    #[default]
    Plains,
    Forest,
    Hills,
    Mountains,
    Desert,
    Swamp,
    River,
}

impl Terrain {
    /// Track cost multiplier when building onto this terrain.
    ///
    /// Water is infinite: it can never carry track.
    pub const fn cost_multiplier(&self) -> f64 {
        match self {
            Terrain::Plains | Terrain::Coast => 1.0,
            Terrain::Forest => 1.5,
            Terrain::Hills => 2.0,
            Terrain::Desert => 1.2,
            Terrain::Swamp => 2.5,
            Terrain::River => 3.0,
            Terrain::Mountains => 4.0,
            Terrain::Water => f64::INFINITY,
        }
    }

    /// Cost of laying one standard track segment onto this terrain, if possible.
    pub fn track_cost(&self) -> Option<i64> {
        if self.is_water() {
            return None;
        }
        Some((BASE_TRACK_COST as f64 * self.cost_multiplier()).floor() as i64)
    }

    /// Check if this is a water terrain type.
    pub const fn is_water(&self) -> bool {
        matches!(self, Terrain::Water)
    }

    /// Whether a station may be placed here.
    pub const fn can_hold_station(&self) -> bool {
        !matches!(self, Terrain::Water | Terrain::Mountains)
    }

    /// Whether a city may be founded here during map generation.
    pub const fn can_found_city(&self) -> bool {
        matches!(self, Terrain::Plains | Terrain::Coast | Terrain::Forest)
    }

    /// Whether a river may start here.
    pub const fn is_highland(&self) -> bool {
        matches!(self, Terrain::Mountains | Terrain::Hills)
    }

    /// Human readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            Terrain::Water => "Water",
            Terrain::Coast => "Coast",
            Terrain::Plains => "Plains",
            Terrain::Forest => "Forest",
            Terrain::Hills => "Hills",
            Terrain::Mountains => "Mountains",
            Terrain::Desert => "Desert",
            Terrain::Swamp => "Swamp",
            Terrain::River => "River",
        }
    }

    /// Get all terrain variants.
    pub const fn all() -> &'static [Terrain] {
        &[
            Terrain::Water,
            Terrain::Coast,
            Terrain::Plains,
            Terrain::Forest,
            Terrain::Hills,
            Terrain::Mountains,
            Terrain::Desert,
            Terrain::Swamp,
            Terrain::River,
        ]
    }
}

impl std::fmt::Display for Terrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Natural resources scattered over the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Iron,
    Coal,
    Timber,
    Grain,
}

impl Resource {
    /// The resource a terrain can carry and the chance of it appearing.
    pub const fn for_terrain(terrain: Terrain) -> Option<(Resource, f64)> {
        match terrain {
            Terrain::Mountains => Some((Resource::Iron, 0.15)),
            Terrain::Hills => Some((Resource::Coal, 0.20)),
            Terrain::Forest => Some((Resource::Timber, 0.15)),
            Terrain::Plains => Some((Resource::Grain, 0.10)),
            _ => None,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Resource::Iron => "iron",
            Resource::Coal => "coal",
            Resource::Timber => "timber",
            Resource::Grain => "grain",
        }
    }
}

/// Goods cities demand and supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Good {
    Grain,
    Goods,
    Passengers,
    Timber,
}

impl Good {
    pub const fn name(&self) -> &'static str {
        match self {
            Good::Grain => "grain",
            Good::Goods => "goods",
            Good::Passengers => "passengers",
            Good::Timber => "timber",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_costs() {
        assert_eq!(Terrain::Plains.track_cost(), Some(500));
        assert_eq!(Terrain::Coast.track_cost(), Some(500));
        assert_eq!(Terrain::Forest.track_cost(), Some(750));
        assert_eq!(Terrain::Hills.track_cost(), Some(1000));
        assert_eq!(Terrain::Desert.track_cost(), Some(600));
        assert_eq!(Terrain::Swamp.track_cost(), Some(1250));
        assert_eq!(Terrain::River.track_cost(), Some(1500));
        assert_eq!(Terrain::Mountains.track_cost(), Some(2000));
        assert_eq!(Terrain::Water.track_cost(), None);
    }

    #[test]
    fn test_station_terrain() {
        assert!(Terrain::Plains.can_hold_station());
        assert!(Terrain::River.can_hold_station());
        assert!(!Terrain::Water.can_hold_station());
        assert!(!Terrain::Mountains.can_hold_station());
    }

    #[test]
    fn test_resource_for_terrain() {
        assert_eq!(Resource::for_terrain(Terrain::Mountains), Some((Resource::Iron, 0.15)));
        assert_eq!(Resource::for_terrain(Terrain::Hills), Some((Resource::Coal, 0.20)));
        assert_eq!(Resource::for_terrain(Terrain::Water), None);
        assert_eq!(Resource::for_terrain(Terrain::Desert), None);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Terrain::Mountains).unwrap(), "\"mountains\"");
        assert_eq!(serde_json::to_string(&Resource::Timber).unwrap(), "\"timber\"");
        assert_eq!(serde_json::to_string(&Good::Passengers).unwrap(), "\"passengers\"");
    }

    #[test]
    fn test_all_terrains() {
        assert_eq!(Terrain::all().len(), 9);
    }
}
