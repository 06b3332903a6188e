use thiserror::Error;

use rr_core::{CoreError, EdgeId, VertexId};

/// Pathfinding failures.  `Unreachable` is an expected outcome, not a fault.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("no route from {from} to {to} (explored {explored} vertices)")]
    Unreachable {
        from:     VertexId,
        to:       VertexId,
        explored: usize,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

#[derive(Debug, Error)]
pub enum RerouteError {
    #[error("street {name:?} not found")]
    StreetNotFound {
        name:        String,
        /// Closest registered names, best first.
        suggestions: Vec<String>,
    },

    /// A committed route would push an edge past its capacity.  The search
    /// never admits full edges, so this is an invariant violation.
    #[error("edge {edge} is full ({load}/{capacity}); refusing to commit route")]
    CapacityExceeded {
        edge:     EdgeId,
        load:     u32,
        capacity: u32,
    },

    #[error("edge {0} is cut; refusing to commit route")]
    CutEdge(EdgeId),

    #[error("route has no edge {from} → {to}")]
    BrokenRoute { from: VertexId, to: VertexId },

    #[error("routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type RerouteResult<T> = Result<T, RerouteError>;
