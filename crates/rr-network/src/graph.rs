//! Road graph representation.
//!
//! # Data layout
//!
//! Vertices and edges live in two arenas indexed by [`VertexId`] and
//! [`EdgeId`].  Each vertex owns its outgoing edges through two views:
//!
//! ```text
//! out_edges:    [EdgeId]               insertion order, for scans
//! by_neighbour: VertexId -> EdgeId     O(1) "which edge connects u → v"
//! ```
//!
//! External vertex identities (`Id`) are mapped to dense `VertexId`s once at
//! insertion; everything past the loader works on dense ids only.
//!
//! # Transient state
//!
//! Closures and commits mutate a small set of per-vertex and per-edge flags
//! (`visited`, `reachable`, `resolved`, load, cut, on-path).  [`RoadGraph::reset_all`]
//! restores all of them without touching topology, so the same base network
//! can be used for repeated what-if closures.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use rr_core::{CoreError, CoreResult, EdgeId, GeoPoint, VertexId};

use crate::names::{normalize_name, rank_suggestions};

// ── Vertex ────────────────────────────────────────────────────────────────────

/// A road intersection or shape point.
#[derive(Clone, Debug)]
pub struct Vertex<Id> {
    pub id:          VertexId,
    pub external_id: Id,
    pub pos:         GeoPoint,

    out_edges:    Vec<EdgeId>,
    by_neighbour: FxHashMap<VertexId, EdgeId>,

    /// Set by the closure traversal.
    pub visited: bool,
    /// `false` once a reroute toward this vertex has failed.
    pub reachable: bool,
    /// `true` once a reroute toward this vertex has been committed.
    pub resolved: bool,
}

impl<Id> Vertex<Id> {
    fn new(id: VertexId, external_id: Id, pos: GeoPoint) -> Self {
        Self {
            id,
            external_id,
            pos,
            out_edges:    Vec::new(),
            by_neighbour: FxHashMap::default(),
            visited:      false,
            reachable:    true,
            resolved:     false,
        }
    }

    /// Outgoing edges in insertion order.
    #[inline]
    pub fn out_edges(&self) -> &[EdgeId] {
        &self.out_edges
    }

    #[inline]
    pub fn out_degree(&self) -> usize {
        self.out_edges.len()
    }

    /// The edge from this vertex to `neighbour`, if any.
    #[inline]
    pub fn edge_to(&self, neighbour: VertexId) -> Option<EdgeId> {
        self.by_neighbour.get(&neighbour).copied()
    }

    fn reset(&mut self) {
        self.visited   = false;
        self.reachable = true;
        self.resolved  = false;
    }
}

// ── Edge ──────────────────────────────────────────────────────────────────────

/// A directed road segment.
///
/// Endpoints and weight are fixed at construction so the adjacency index
/// stays valid:
///
/// ```compile_fail
/// use rr_core::VertexId;
/// let mut e = rr_network::Edge::new(VertexId(0), VertexId(1), 10.0, 5);
/// e.to = VertexId(99);
/// ```
///
/// Load, cut and on-path state can only be changed through the
/// methods below so that `current_load <= max_capacity` holds at all times.
#[derive(Clone, Debug)]
pub struct Edge {
    from:          VertexId,
    to:            VertexId,
    /// Length in metres.
    weight_m:      f64,
    /// Display name; several edges may share one.
    street_name:   String,
    /// Unique lookup key registered in the name index, if any.
    name_mask:     Option<String>,
    bidirectional: bool,

    max_capacity:     u32,
    current_load:     u32,
    is_cut:           bool,
    on_solution_path: bool,
}

impl Edge {
    pub fn new(from: VertexId, to: VertexId, weight_m: f64, max_capacity: u32) -> Self {
        Self {
            from,
            to,
            weight_m,
            street_name:      String::new(),
            name_mask:        None,
            bidirectional:    false,
            max_capacity,
            current_load:     0,
            is_cut:           false,
            on_solution_path: false,
        }
    }

    pub fn with_street_name(mut self, name: impl Into<String>) -> Self {
        self.street_name = name.into();
        self
    }

    pub fn with_bidirectional(mut self, bidirectional: bool) -> Self {
        self.bidirectional = bidirectional;
        self
    }

    #[inline]
    pub fn from(&self) -> VertexId {
        self.from
    }

    #[inline]
    pub fn to(&self) -> VertexId {
        self.to
    }

    #[inline]
    pub fn weight_m(&self) -> f64 {
        self.weight_m
    }

    pub fn street_name(&self) -> &str {
        &self.street_name
    }

    pub fn name_mask(&self) -> Option<&str> {
        self.name_mask.as_deref()
    }

    #[inline]
    pub fn is_bidirectional(&self) -> bool {
        self.bidirectional
    }

    /// Attach the loader's street record to an edge already in the graph.
    pub(crate) fn set_street(&mut self, name: &str, bidirectional: bool) {
        self.street_name   = name.to_owned();
        self.bidirectional = bidirectional;
    }

    #[inline]
    pub fn max_capacity(&self) -> u32 {
        self.max_capacity
    }

    #[inline]
    pub fn current_load(&self) -> u32 {
        self.current_load
    }

    #[inline]
    pub fn is_cut(&self) -> bool {
        self.is_cut
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.current_load >= self.max_capacity
    }

    #[inline]
    pub fn on_solution_path(&self) -> bool {
        self.on_solution_path
    }

    /// Open and below capacity.
    #[inline]
    pub fn is_traversable(&self) -> bool {
        !self.is_cut && !self.is_full()
    }

    /// Fraction of capacity in use; a zero-capacity edge reports 1.0.
    pub fn load_ratio(&self) -> f64 {
        if self.max_capacity == 0 {
            1.0
        } else {
            self.current_load as f64 / self.max_capacity as f64
        }
    }

    pub fn cut(&mut self) {
        self.is_cut = true;
    }

    /// Put one more vehicle on the edge.  Returns `false` (and changes
    /// nothing) if the edge is cut or full.
    pub fn add_vehicle(&mut self) -> bool {
        if !self.is_traversable() {
            return false;
        }
        self.current_load += 1;
        true
    }

    pub fn mark_on_path(&mut self) {
        self.on_solution_path = true;
    }

    pub(crate) fn take_on_path(&mut self) -> bool {
        std::mem::take(&mut self.on_solution_path)
    }

    fn reset(&mut self) {
        self.current_load     = 0;
        self.is_cut           = false;
        self.on_solution_path = false;
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed road graph, generic over the loader's external vertex identity.
pub struct RoadGraph<Id = i64> {
    vertices: Vec<Vertex<Id>>,
    edges:    Vec<Edge>,
    external: FxHashMap<Id, VertexId>,
    names:    BTreeMap<String, EdgeId>,
    stranded: Vec<VertexId>,
}

impl<Id: Eq + Hash + Clone + fmt::Debug> RoadGraph<Id> {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Pre-allocate for the expected number of vertices and edges.
    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            edges:    Vec::with_capacity(edges),
            external: FxHashMap::default(),
            names:    BTreeMap::new(),
            stranded: Vec::new(),
        }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Add a vertex and return its dense id (sequential from 0).
    ///
    /// A repeated external id still gets a fresh vertex; the external index
    /// keeps pointing at the first one.
    pub fn add_vertex(&mut self, external_id: Id, pos: GeoPoint) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        if self.external.contains_key(&external_id) {
            warn!(external_id = ?external_id, "duplicate external vertex id");
        } else {
            self.external.insert(external_id.clone(), id);
        }
        self.vertices.push(Vertex::new(id, external_id, pos));
        id
    }

    /// Attach `edge` to its source vertex.
    ///
    /// Returns `None` if either endpoint is unknown, or if the source already
    /// has an edge to the same destination.
    pub fn add_edge(&mut self, edge: Edge) -> Option<EdgeId> {
        if edge.to.index() >= self.vertices.len() {
            return None;
        }
        let id = EdgeId(self.edges.len() as u32);
        let source = self.vertices.get_mut(edge.from.index())?;
        if source.by_neighbour.contains_key(&edge.to) {
            debug!(from = %edge.from, to = %edge.to, "parallel edge ignored");
            return None;
        }
        source.by_neighbour.insert(edge.to, id);
        source.out_edges.push(id);
        self.edges.push(edge);
        Some(id)
    }

    /// Convenience: add a directed edge whose weight is the haversine length
    /// between its endpoints.
    pub fn add_road(&mut self, from: VertexId, to: VertexId, capacity: u32) -> Option<EdgeId> {
        let a = self.vertices.get(from.index())?.pos;
        let b = self.vertices.get(to.index())?.pos;
        self.add_edge(Edge::new(from, to, a.distance_m(b), capacity))
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn vertex(&self, id: VertexId) -> CoreResult<&Vertex<Id>> {
        self.vertices.get(id.index()).ok_or(CoreError::VertexNotFound(id))
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> CoreResult<&mut Vertex<Id>> {
        self.vertices.get_mut(id.index()).ok_or(CoreError::VertexNotFound(id))
    }

    pub fn edge(&self, id: EdgeId) -> CoreResult<&Edge> {
        self.edges.get(id.index()).ok_or(CoreError::EdgeNotFound(id))
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> CoreResult<&mut Edge> {
        self.edges.get_mut(id.index()).ok_or(CoreError::EdgeNotFound(id))
    }

    pub fn vertex_by_external(&self, external_id: &Id) -> Option<VertexId> {
        self.external.get(external_id).copied()
    }

    /// The edge `from → to`, if both exist and are connected.
    pub fn edge_between(&self, from: VertexId, to: VertexId) -> Option<EdgeId> {
        self.vertices.get(from.index())?.edge_to(to)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex<Id>> + '_ {
        self.vertices.iter()
    }

    /// All edges with their ids.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i as u32), e))
    }

    pub(crate) fn edges_mut(&mut self) -> impl Iterator<Item = (EdgeId, &mut Edge)> + '_ {
        self.edges.iter_mut().enumerate().map(|(i, e)| (EdgeId(i as u32), e))
    }

    // ── Street names ──────────────────────────────────────────────────────

    /// Register `name` as the lookup key for `edge`.
    ///
    /// Names are normalized (trimmed, upper-cased).  Returns `false` if the
    /// edge is unknown or the name is already taken.
    pub fn register_street_name(&mut self, name: &str, edge: EdgeId) -> bool {
        let key = normalize_name(name);
        let Some(e) = self.edges.get_mut(edge.index()) else {
            return false;
        };
        if key.is_empty() || self.names.contains_key(&key) {
            return false;
        }
        e.name_mask = Some(key.clone());
        self.names.insert(key, edge);
        true
    }

    pub fn find_edge_by_name(&self, name: &str) -> Option<EdgeId> {
        self.names.get(&normalize_name(name)).copied()
    }

    /// Registered lookup keys in sorted order.
    pub fn street_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.keys().map(String::as_str)
    }

    /// Up to `limit` registered names closest to `name`, best first.
    pub fn suggest_streets(&self, name: &str, limit: usize) -> Vec<String> {
        rank_suggestions(name, self.street_names(), limit)
    }

    // ── Stranded destinations ─────────────────────────────────────────────

    /// Vertices that hold a stranded vehicle, in discovery order.
    pub fn stranded(&self) -> &[VertexId] {
        &self.stranded
    }

    pub fn push_stranded(&mut self, v: VertexId) {
        self.stranded.push(v);
    }

    /// Clear every vertex's `visited` flag ahead of a traversal.
    pub fn clear_visited(&mut self) {
        for v in &mut self.vertices {
            v.visited = false;
        }
    }

    // ── Reset ─────────────────────────────────────────────────────────────

    /// Restore every transient field to its pristine value.
    ///
    /// O(V + E).  Topology, weights, capacities and names are untouched.
    pub fn reset_all(&mut self) {
        for v in &mut self.vertices {
            v.reset();
        }
        for e in &mut self.edges {
            e.reset();
        }
        self.stranded.clear();
    }
}

impl<Id: Eq + Hash + Clone + fmt::Debug> Default for RoadGraph<Id> {
    fn default() -> Self {
        Self::new()
    }
}
