//! Breadth-first pathfinding over the built track network.
//!
//! Track segments are unweighted, so the shortest path is the one with the
//! fewest edges. Adjacency uses ordered sets, which makes tie-breaking between
//! equally short paths stable from run to run.

use crate::game_state::GameState;
use crate::hex::HexCoord;
use crate::network::{TrackKey, TrackSegment};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// Undirected adjacency of the track network.
pub type TrackGraph = BTreeMap<HexCoord, BTreeSet<HexCoord>>;

/// Build the undirected adjacency map from all track segments.
pub fn track_graph(tracks: &BTreeMap<TrackKey, TrackSegment>) -> TrackGraph {
    let mut graph = TrackGraph::new();
    for key in tracks.keys() {
        let (a, b) = key.endpoints();
        graph.entry(a).or_default().insert(b);
        graph.entry(b).or_default().insert(a);
    }
    graph
}

/// Shortest hex path over `graph`, endpoints included.
///
/// Returns `[from]` when the endpoints are equal, and `None` when `from` has
/// no track or `to` cannot be reached.
pub fn bfs_path(graph: &TrackGraph, from: HexCoord, to: HexCoord) -> Option<Vec<HexCoord>> {
    if from == to {
        return Some(vec![from]);
    }
    if !graph.contains_key(&from) {
        return None;
    }

    let mut came_from: HashMap<HexCoord, HexCoord> = HashMap::new();
    let mut queue = VecDeque::new();
    queue.push_back(from);
    came_from.insert(from, from);

    while let Some(current) = queue.pop_front() {
        if current == to {
            return Some(reconstruct_path(&came_from, from, to));
        }
        let Some(neighbors) = graph.get(&current) else {
            continue;
        };
        for &next in neighbors {
            if !came_from.contains_key(&next) {
                came_from.insert(next, current);
                queue.push_back(next);
            }
        }
    }

    None
}

/// Walk parent links back from `to`.
fn reconstruct_path(
    came_from: &HashMap<HexCoord, HexCoord>,
    from: HexCoord,
    to: HexCoord,
) -> Vec<HexCoord> {
    let mut path = vec![to];
    let mut current = to;
    while current != from {
        match came_from.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Shortest path between two hexes over the built track.
pub fn find_track_path(
    tracks: &BTreeMap<TrackKey, TrackSegment>,
    from: HexCoord,
    to: HexCoord,
) -> Option<Vec<HexCoord>> {
    bfs_path(&track_graph(tracks), from, to)
}

/// Concatenate the shortest legs between consecutive stops.
///
/// The hex shared by two consecutive legs appears once. Fails if any leg is
/// unreachable.
pub fn resolve_route(
    tracks: &BTreeMap<TrackKey, TrackSegment>,
    stops: &[HexCoord],
) -> Option<Vec<HexCoord>> {
    let graph = track_graph(tracks);
    let mut route: Vec<HexCoord> = Vec::new();

    for leg in stops.windows(2) {
        let path = bfs_path(&graph, leg[0], leg[1])?;
        let skip = usize::from(!route.is_empty());
        route.extend(path.into_iter().skip(skip));
    }

    if route.is_empty() {
        route.extend(stops.first().copied());
    }
    Some(route)
}

impl GameState {
    /// Shortest path between two hexes over this state's track.
    pub fn find_track_path(&self, from: HexCoord, to: HexCoord) -> Option<Vec<HexCoord>> {
        find_track_path(&self.tracks, from, to)
    }
}
