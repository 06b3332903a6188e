//! Closure-to-commit workflow driver.

use std::fmt;
use std::hash::Hash;

use tracing::info;

use rr_core::{SimRng, VertexId};
use rr_network::RoadGraph;

use crate::{
    AStarPathfinder, Closure, Pathfinder, RerouteConfig, RerouteObserver, RerouteResult, Route,
    RoutingError, close_street, commit_route,
};

/// What happened to one stranded destination.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DestinationOutcome {
    Rerouted {
        destination: VertexId,
        edges:       usize,
        weight_m:    f64,
        explored:    usize,
    },
    Unreachable {
        destination: VertexId,
        explored:    usize,
    },
}

impl DestinationOutcome {
    pub fn destination(&self) -> VertexId {
        match *self {
            DestinationOutcome::Rerouted { destination, .. }
            | DestinationOutcome::Unreachable { destination, .. } => destination,
        }
    }

    pub fn is_rerouted(&self) -> bool {
        matches!(self, DestinationOutcome::Rerouted { .. })
    }
}

/// Summary of one [`Rerouter::run_closure`] call.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RerouteReport {
    pub street:   String,
    pub closure:  Closure,
    pub outcomes: Vec<DestinationOutcome>,
}

impl RerouteReport {
    pub fn rerouted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_rerouted()).count()
    }

    pub fn unreachable(&self) -> usize {
        self.outcomes.len() - self.rerouted()
    }
}

/// Drives closures against a graph.
///
/// Holds the configuration, the seeded RNG used for stranded sampling, and
/// the pathfinder.  The graph itself is passed in per call.
pub struct Rerouter<P: Pathfinder = AStarPathfinder> {
    config:     RerouteConfig,
    rng:        SimRng,
    pathfinder: P,
}

impl Rerouter<AStarPathfinder> {
    pub fn new(config: RerouteConfig) -> RerouteResult<Self> {
        Self::with_pathfinder(config, AStarPathfinder)
    }
}

impl<P: Pathfinder> Rerouter<P> {
    pub fn with_pathfinder(config: RerouteConfig, pathfinder: P) -> RerouteResult<Self> {
        config.validate()?;
        let rng = SimRng::new(config.seed);
        Ok(Self { config, rng, pathfinder })
    }

    pub fn config(&self) -> &RerouteConfig {
        &self.config
    }

    /// Route one vehicle from `origin` to `destination` and commit it.
    ///
    /// On success the destination is marked `resolved` and reachable.  If no
    /// admissible route exists within `budget` it is marked unreachable and
    /// unresolved, and `Ok(Err(..))` is returned; only invariant violations
    /// are `Err`.  The flags always describe the latest attempt.
    pub fn reroute_to<Id: Eq + Hash + Clone + fmt::Debug>(
        &self,
        graph:       &mut RoadGraph<Id>,
        origin:      VertexId,
        destination: VertexId,
        budget:      usize,
    ) -> RerouteResult<Result<Route, RoutingError>> {
        match self.pathfinder.find_route(graph, origin, destination, budget) {
            Ok(route) => {
                commit_route(graph, route.clone())?;
                let v = graph.vertex_mut(destination)?;
                v.resolved  = true;
                v.reachable = true;
                Ok(Ok(route))
            }
            Err(err @ RoutingError::Unreachable { .. }) => {
                let v = graph.vertex_mut(destination)?;
                v.reachable = false;
                v.resolved  = false;
                Ok(Err(err))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Close `street` and reroute every vehicle it strands.
    ///
    /// Unreachable destinations are recorded and skipped; the run continues
    /// with the next one.  An unknown street or a commit that would break the
    /// capacity invariant aborts the run.
    pub fn run_closure<Id, O>(
        &mut self,
        graph:    &mut RoadGraph<Id>,
        street:   &str,
        observer: &mut O,
    ) -> RerouteResult<RerouteReport>
    where
        Id: Eq + Hash + Clone + fmt::Debug,
        O:  RerouteObserver,
    {
        let closure = close_street(graph, street, &self.config, &mut self.rng)?;
        observer.on_closure(street, &closure);

        let budget = self.config.budget.limit(graph.vertex_count(), closure.explored);
        let mut outcomes = Vec::with_capacity(closure.stranded.len());

        for &destination in &closure.stranded {
            let outcome = match self.reroute_to(graph, closure.origin, destination, budget)? {
                Ok(route) => {
                    observer.on_rerouted(&route);
                    DestinationOutcome::Rerouted {
                        destination,
                        edges:    route.edges.len(),
                        weight_m: route.total_weight_m,
                        explored: route.explored,
                    }
                }
                Err(RoutingError::Unreachable { explored, .. }) => {
                    observer.on_unreachable(destination, explored);
                    DestinationOutcome::Unreachable { destination, explored }
                }
                Err(err) => return Err(err.into()),
            };
            outcomes.push(outcome);
        }

        let report = RerouteReport { street: street.to_owned(), closure, outcomes };
        info!(
            street,
            rerouted    = report.rerouted(),
            unreachable = report.unreachable(),
            "closure processed"
        );
        Ok(report)
    }
}
