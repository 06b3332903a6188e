//! Rerouting observer trait for progress reporting.

use tracing::{info, warn};

use rr_core::VertexId;

use crate::{Closure, Route};

/// Callbacks invoked by [`Rerouter::run_closure`](crate::Rerouter::run_closure).
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait RerouteObserver {
    /// Called once the street is cut and stranded destinations are known.
    fn on_closure(&mut self, _street: &str, _closure: &Closure) {}

    /// Called after a route has been committed.
    fn on_rerouted(&mut self, _route: &Route) {}

    /// Called when no admissible route to `destination` exists.
    fn on_unreachable(&mut self, _destination: VertexId, _explored: usize) {}
}

/// A [`RerouteObserver`] that does nothing.
pub struct NoopObserver;

impl RerouteObserver for NoopObserver {}

/// Emits one `tracing` event per callback.
pub struct TracingObserver;

impl RerouteObserver for TracingObserver {
    fn on_closure(&mut self, street: &str, closure: &Closure) {
        info!(
            street,
            origin   = %closure.origin,
            stranded = closure.stranded.len(),
            already_cut = closure.already_cut,
            "closure applied"
        );
    }

    fn on_rerouted(&mut self, route: &Route) {
        info!(
            destination = %route.destination(),
            edges       = route.edges.len(),
            weight_m    = route.total_weight_m,
            explored    = route.explored,
            "vehicle rerouted"
        );
    }

    fn on_unreachable(&mut self, destination: VertexId, explored: usize) {
        warn!(%destination, explored, "no admissible route");
    }
}
