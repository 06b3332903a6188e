//! Pathfinding trait and capacity-aware A*.
//!
//! # Cost model
//!
//! Cost is accumulated road length in metres.  The heuristic is the
//! haversine distance to the target, the same metric edge weights are
//! derived from, so it never overestimates and A* returns shortest routes.
//!
//! # Admission
//!
//! An edge is skipped when it is cut or when its load has reached its
//! capacity.  Vehicles therefore spill onto longer roads as the short ones
//! fill up.
//!
//! # Termination
//!
//! Success is declared only when the destination is *popped* from the open
//! set, never when it is first seen as a neighbour.  A search also ends when
//! the open set empties or after closing `budget` vertices; both are reported
//! as [`RoutingError::Unreachable`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use tracing::debug;

use rr_core::{CoreError, EdgeId, VertexId};
use rr_network::RoadGraph;

use crate::RoutingError;

// ── Route ─────────────────────────────────────────────────────────────────────

/// A path found by a [`Pathfinder`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Vertices from origin to destination, both included.
    pub vertices:       Vec<VertexId>,
    /// Edges in travel order; always `vertices.len() - 1` long.
    pub edges:          Vec<EdgeId>,
    pub total_weight_m: f64,
    /// Vertices closed by the search that produced this route.
    pub explored:       usize,
}

impl Route {
    pub fn origin(&self) -> VertexId {
        self.vertices.first().copied().unwrap_or_default()
    }

    pub fn destination(&self) -> VertexId {
        self.vertices.last().copied().unwrap_or_default()
    }

    /// `true` if the origin and destination are the same vertex.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Pathfinder trait ──────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations must not admit cut or full edges, and must give up after
/// closing `budget` vertices.
pub trait Pathfinder {
    fn find_route<Id: Eq + Hash + Clone + fmt::Debug>(
        &self,
        graph:  &RoadGraph<Id>,
        from:   VertexId,
        to:     VertexId,
        budget: usize,
    ) -> Result<Route, RoutingError>;
}

// ── AStarPathfinder ───────────────────────────────────────────────────────────

/// A* over the road graph with a haversine heuristic.
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarPathfinder;

impl Pathfinder for AStarPathfinder {
    fn find_route<Id: Eq + Hash + Clone + fmt::Debug>(
        &self,
        graph:  &RoadGraph<Id>,
        from:   VertexId,
        to:     VertexId,
        budget: usize,
    ) -> Result<Route, RoutingError> {
        astar(graph, from, to, budget)
    }
}

// ── A* internals ──────────────────────────────────────────────────────────────

/// Open-set priority: lowest `f` first, then earliest insertion.
/// `KeyedPriorityQueue` is a max-heap, hence the reversed comparisons.
#[derive(Copy, Clone, Debug)]
struct Priority {
    f:   f64,
    seq: u64,
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.total_cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Priority {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Priority {}

/// Per-search state.  Lives only for one call, so nothing leaks between
/// searches on the same graph.
struct Search {
    /// Best known distance from the origin; `INFINITY` if unseen.
    g:           Vec<f64>,
    closed:      Vec<bool>,
    closed_len:  usize,
    /// vertex → (predecessor, edge used to reach it)
    predecessor: FxHashMap<VertexId, (VertexId, EdgeId)>,
    open:        KeyedPriorityQueue<VertexId, Priority>,
    seq:         u64,
}

impl Search {
    fn new(vertex_count: usize) -> Self {
        Self {
            g:           vec![f64::INFINITY; vertex_count],
            closed:      vec![false; vertex_count],
            closed_len:  0,
            predecessor: FxHashMap::default(),
            open:        KeyedPriorityQueue::new(),
            seq:         0,
        }
    }

    /// Insert `v`, or update its priority in place if already open.
    fn open(&mut self, v: VertexId, f: f64) {
        self.open.push(v, Priority { f, seq: self.seq });
        self.seq += 1;
    }

    fn close(&mut self, v: VertexId) {
        if !self.closed[v.index()] {
            self.closed[v.index()] = true;
            self.closed_len += 1;
        }
    }
}

fn astar<Id: Eq + Hash + Clone + fmt::Debug>(
    graph:  &RoadGraph<Id>,
    from:   VertexId,
    to:     VertexId,
    budget: usize,
) -> Result<Route, RoutingError> {
    graph.vertex(from)?;
    let target = graph.vertex(to)?.pos;
    let heuristic = |v: VertexId| -> Result<f64, CoreError> {
        Ok(graph.vertex(v)?.pos.distance_m(target))
    };

    let mut s = Search::new(graph.vertex_count());
    s.g[from.index()] = 0.0;
    s.open(from, heuristic(from)?);

    while let Some((current, _)) = s.open.pop() {
        if current == to {
            debug!(%from, %to, explored = s.closed_len, "A* reached destination");
            return Ok(reconstruct(&s, from, to));
        }

        let g_current = s.g[current.index()];
        for &edge_id in graph.vertex(current)?.out_edges() {
            let edge = graph.edge(edge_id)?;
            if !edge.is_traversable() {
                continue;
            }

            let next = edge.to();
            let tentative = g_current + edge.weight_m();
            let g_next = s.g[next.index()];

            if s.open.get_priority(&next).is_some() {
                if g_next <= tentative {
                    continue;
                }
            } else if s.closed[next.index()] && g_next <= tentative {
                continue;
            }

            s.g[next.index()] = tentative;
            s.predecessor.insert(next, (current, edge_id));
            s.open(next, tentative + heuristic(next)?);
        }

        s.close(current);
        if s.closed_len >= budget {
            debug!(%from, %to, budget, "A* budget exhausted");
            return Err(RoutingError::Unreachable { from, to, explored: s.closed_len });
        }
    }

    debug!(%from, %to, explored = s.closed_len, "A* open set exhausted");
    Err(RoutingError::Unreachable { from, to, explored: s.closed_len })
}

fn reconstruct(s: &Search, from: VertexId, to: VertexId) -> Route {
    let mut vertices = vec![to];
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let Some(&(prev, edge)) = s.predecessor.get(&cur) else {
            break;
        };
        edges.push(edge);
        vertices.push(prev);
        cur = prev;
    }
    vertices.reverse();
    edges.reverse();
    Route {
        vertices,
        edges,
        total_weight_m: s.g[to.index()],
        explored: s.closed_len,
    }
}
