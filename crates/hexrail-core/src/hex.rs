//! Hex coordinate system for the game map.
//!
//! Uses axial coordinates `(q, r)` with the implicit third cube coordinate
//! `s = -q - r`. Hexes are laid out pointy-top when converted to pixels.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

/// Axial offsets of the six neighbors, in order: E, NE, NW, W, SW, SE.
pub const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Nudge applied to line-draw endpoints so samples never land on an exact
/// half and round inconsistently.
const LINE_EPSILON: f64 = 1e-6;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Axial coordinates for a hex grid.
///
/// Two coordinates are the same hex iff both components are equal. When used
/// as a map key in serialized state the coordinate is written as the
/// canonical string `"q,r"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct HexCoord {
    /// Column-like axis.
    pub q: i32,
    /// Row axis.
    pub r: i32,
}

impl PartialOrd for HexCoord {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HexCoord {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Row-major ordering for deterministic iteration
        (self.r, self.q).cmp(&(other.r, other.q))
    }
}

impl HexCoord {
    /// Create a new hex coordinate.
    #[inline]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The implicit third cube coordinate.
    #[inline]
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Canonical string key, `"q,r"`.
    pub fn key(&self) -> String {
        format!("{},{}", self.q, self.r)
    }

    /// Get all 6 neighboring hexes.
    ///
    /// Returns neighbors in order: E, NE, NW, W, SW, SE
    pub fn neighbors(&self) -> [HexCoord; 6] {
        DIRECTIONS.map(|(dq, dr)| HexCoord::new(self.q + dq, self.r + dr))
    }

    /// Calculate the distance to another hex (in hex steps).
    pub fn distance(&self, other: &HexCoord) -> u32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        ((dq.abs() + (dq + dr).abs() + dr.abs()) / 2) as u32
    }

    /// Check whether `other` shares an edge with this hex.
    pub fn is_adjacent(&self, other: &HexCoord) -> bool {
        self.distance(other) == 1
    }

    /// Convert to cube coordinates `(x, y, z)` with `x + y + z = 0`.
    pub fn to_cube(&self) -> (i32, i32, i32) {
        (self.q, self.s(), self.r)
    }

    /// Create a HexCoord from cube coordinates.
    ///
    /// Note: Input must satisfy x + y + z = 0
    pub fn from_cube(x: i32, _y: i32, z: i32) -> Self {
        Self { q: x, r: z }
    }

    /// Check if this coordinate is within a `width` x `height` axial rhombus.
    pub fn in_bounds(&self, width: u32, height: u32) -> bool {
        self.q >= 0 && self.r >= 0 && (self.q as u32) < width && (self.r as u32) < height
    }

    /// Get all hexes within a given radius (inclusive).
    pub fn hexes_in_radius(&self, radius: u32) -> Vec<HexCoord> {
        let n = radius as i32;
        let mut result = Vec::with_capacity((3 * n * (n + 1) + 1) as usize);

        for dq in -n..=n {
            let lo = (-n).max(-dq - n);
            let hi = n.min(-dq + n);
            for dr in lo..=hi {
                result.push(HexCoord::new(self.q + dq, self.r + dr));
            }
        }

        result
    }

    /// Get a ring of hexes at exactly the given distance.
    pub fn hex_ring(&self, radius: u32) -> Vec<HexCoord> {
        if radius == 0 {
            return vec![*self];
        }

        self.hexes_in_radius(radius)
            .into_iter()
            .filter(|h| self.distance(h) == radius)
            .collect()
    }

    /// Center of this hex in pixel space for pointy-top hexes of `size`.
    pub fn to_pixel(&self, size: f64) -> (f64, f64) {
        let q = self.q as f64;
        let r = self.r as f64;
        let x = size * (SQRT_3 * q + SQRT_3 / 2.0 * r);
        let y = size * (1.5 * r);
        (x, y)
    }

    /// The hex containing the pixel `(x, y)`.
    pub fn from_pixel(x: f64, y: f64, size: f64) -> Self {
        let q = (SQRT_3 / 3.0 * x - y / 3.0) / size;
        let r = (2.0 / 3.0 * y) / size;
        hex_round(q, r)
    }

    /// Connected path of hexes from `self` to `other`, both inclusive.
    pub fn line_to(&self, other: &HexCoord) -> Vec<HexCoord> {
        line_draw(*self, *other)
    }
}

/// Round fractional axial coordinates to the nearest hex.
///
/// Rounds all three cube components and recomputes the one with the largest
/// rounding error from the other two so that `q + r + s == 0` holds.
pub fn hex_round(q: f64, r: f64) -> HexCoord {
    let s = -q - r;

    let mut rq = q.round();
    let mut rr = r.round();
    let rs = s.round();

    let dq = (rq - q).abs();
    let dr = (rr - r).abs();
    let ds = (rs - s).abs();

    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }

    HexCoord::new(rq as i32, rr as i32)
}

/// Interpolate `distance + 1` samples between `a` and `b` and round each.
///
/// Consecutive entries are always adjacent, so the result can be laid as
/// track edge by edge.
pub fn line_draw(a: HexCoord, b: HexCoord) -> Vec<HexCoord> {
    let n = a.distance(&b);
    if n == 0 {
        return vec![a];
    }

    let aq = a.q as f64 + LINE_EPSILON;
    let ar = a.r as f64 + LINE_EPSILON;
    let bq = b.q as f64 + LINE_EPSILON;
    let br = b.r as f64 + LINE_EPSILON;

    (0..=n)
        .map(|i| {
            let t = i as f64 / n as f64;
            hex_round(aq + (bq - aq) * t, ar + (br - ar) * t)
        })
        .collect()
}

/// Error parsing a `"q,r"` key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex key: {0:?}")]
pub struct ParseHexError(pub String);

impl FromStr for HexCoord {
    type Err = ParseHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (q, r) = s
            .split_once(',')
            .ok_or_else(|| ParseHexError(s.to_string()))?;
        let q = q
            .trim()
            .parse()
            .map_err(|_| ParseHexError(s.to_string()))?;
        let r = r
            .trim()
            .parse()
            .map_err(|_| ParseHexError(s.to_string()))?;
        Ok(HexCoord::new(q, r))
    }
}

impl Serialize for HexCoord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&format_args!("{},{}", self.q, self.r))
    }
}

impl<'de> Deserialize<'de> for HexCoord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}
