//! Applying a found route to the network.

use std::fmt;
use std::hash::Hash;

use tracing::trace;

use rr_core::EdgeId;
use rr_network::RoadGraph;

use crate::{RerouteError, RerouteResult, Route};

/// Put one vehicle on every edge of `route`.
///
/// The route is walked from destination back to origin and each connecting
/// edge is looked up through the predecessor's adjacency.  The whole walk is
/// validated before anything changes: if any edge is missing, cut, or full,
/// the graph is left untouched and an error is returned.  Otherwise every
/// edge gets `load += 1` and the on-path hint.
///
/// The route is consumed so its predecessor chain cannot be committed twice.
pub fn commit_route<Id: Eq + Hash + Clone + fmt::Debug>(
    graph: &mut RoadGraph<Id>,
    route: Route,
) -> RerouteResult<()> {
    let mut edges: Vec<EdgeId> = Vec::with_capacity(route.edges.len());

    for step in route.vertices.windows(2).rev() {
        let (prev, cur) = (step[0], step[1]);
        let id = graph
            .edge_between(prev, cur)
            .ok_or(RerouteError::BrokenRoute { from: prev, to: cur })?;
        let edge = graph.edge(id)?;
        if edge.is_cut() {
            return Err(RerouteError::CutEdge(id));
        }
        if edge.is_full() {
            return Err(RerouteError::CapacityExceeded {
                edge:     id,
                load:     edge.current_load(),
                capacity: edge.max_capacity(),
            });
        }
        edges.push(id);
    }

    for id in edges {
        let edge = graph.edge_mut(id)?;
        let admitted = edge.add_vehicle();
        debug_assert!(admitted, "edge {id} validated but refused a vehicle");
        edge.mark_on_path();
        trace!(%id, load = edge.current_load(), capacity = edge.max_capacity(), "vehicle added");
    }
    Ok(())
}
