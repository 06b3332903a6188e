//! Street closure.
//!
//! Closing a street cuts its edge and decides which vehicles are stranded:
//! every vertex reachable from the far end of the cut is a place some traffic
//! was heading to, and each one holds a stranded vehicle with probability
//! [`RerouteConfig::stranded_probability`].  The draw comes from the caller's
//! [`SimRng`], so a fixed seed always strands the same vertices.

use std::fmt;
use std::hash::Hash;

use tracing::info;

use rr_core::{EdgeId, SimRng, VertexId};
use rr_network::RoadGraph;

use crate::{RerouteConfig, RerouteError, RerouteResult};

/// Result of a successful [`close_street`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Closure {
    pub edge:        EdgeId,
    /// Source of the cut edge; stranded vehicles are rerouted from here.
    pub origin:      VertexId,
    /// Vertices reached by the traversal (0 when `already_cut`).
    pub explored:    usize,
    /// Vertices stranded by this closure, in discovery order.
    pub stranded:    Vec<VertexId>,
    pub already_cut: bool,
}

/// Close the street registered as `name`.
///
/// Closing an already-cut street returns the same origin without another
/// traversal.  O(V + E).
pub fn close_street<Id: Eq + Hash + Clone + fmt::Debug>(
    graph:  &mut RoadGraph<Id>,
    name:   &str,
    config: &RerouteConfig,
    rng:    &mut SimRng,
) -> RerouteResult<Closure> {
    let Some(edge) = graph.find_edge_by_name(name) else {
        return Err(RerouteError::StreetNotFound {
            name:        name.to_owned(),
            suggestions: graph.suggest_streets(name, config.suggestion_limit),
        });
    };

    let (origin, start, already_cut) = {
        let e = graph.edge(edge)?;
        (e.from(), e.to(), e.is_cut())
    };
    if already_cut {
        return Ok(Closure { edge, origin, explored: 0, stranded: Vec::new(), already_cut });
    }

    graph.clear_visited();
    let mut stranded = Vec::new();
    let mut explored = 0usize;
    let mut stack    = vec![start];
    let mut next     = Vec::new();
    graph.vertex_mut(start)?.visited = true;

    while let Some(v) = stack.pop() {
        explored += 1;
        if rng.gen_bool(config.stranded_probability) {
            graph.push_stranded(v);
            stranded.push(v);
        }

        next.clear();
        for &e in graph.vertex(v)?.out_edges() {
            next.push(graph.edge(e)?.to());
        }
        // Reverse so the first out-edge is explored first.
        for &n in next.iter().rev() {
            let vertex = graph.vertex_mut(n)?;
            if !vertex.visited {
                vertex.visited = true;
                stack.push(n);
            }
        }
    }

    graph.edge_mut(edge)?.cut();
    info!(
        street   = name,
        %edge,
        %origin,
        explored,
        stranded = stranded.len(),
        "street closed"
    );

    Ok(Closure { edge, origin, explored, stranded, already_cut: false })
}
