//! Rerouting configuration.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and passed to [`Rerouter::new`](crate::Rerouter::new).

use rr_core::{CoreError, CoreResult};

/// Upper bound on how many vertices one search may close before giving up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchBudget {
    /// Every vertex in the graph.  Never cuts a search short.
    #[default]
    AllVertices,
    /// Vertices reached by the closure traversal, plus the origin.
    ClosureReach,
    Fixed(usize),
}

impl SearchBudget {
    pub fn limit(&self, vertex_count: usize, closure_explored: usize) -> usize {
        match *self {
            SearchBudget::AllVertices  => vertex_count,
            SearchBudget::ClosureReach => closure_explored + 1,
            SearchBudget::Fixed(n)     => n,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RerouteConfig {
    /// Seed for stranded-destination sampling.  Same seed, same closure outcome.
    pub seed: u64,

    /// Chance that a vertex beyond the closure holds a stranded vehicle.
    pub stranded_probability: f64,

    pub budget: SearchBudget,

    /// How many street names to suggest when a closure names an unknown street.
    pub suggestion_limit: usize,
}

impl RerouteConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if !(0.0..=1.0).contains(&self.stranded_probability) {
            return Err(CoreError::Config(format!(
                "stranded_probability must be within [0, 1], got {}",
                self.stranded_probability
            )));
        }
        Ok(())
    }
}

impl Default for RerouteConfig {
    fn default() -> Self {
        Self {
            seed:                 42,
            stranded_probability: 0.1,
            budget:               SearchBudget::AllVertices,
            suggestion_limit:     5,
        }
    }
}
