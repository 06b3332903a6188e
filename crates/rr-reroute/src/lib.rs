//! `rr-reroute` — closure-triggered rerouting.
//!
//! # Workflow
//!
//! ```text
//! close_street(name)
//!   ① look up the edge by name      → StreetNotFound (+ suggestions) on miss
//!   ② DFS from the edge's target    → sample stranded destinations
//!   ③ cut the edge                  → origin = edge source
//! for each stranded destination:
//!   ④ A* from origin                → skips cut and full edges
//!   ⑤ commit the route              → load += 1 on every edge, on-path hint
//!      or flag it unreachable       → reachable = false, continue
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`closure`]  | `close_street`, `Closure`                              |
//! | [`astar`]    | `Pathfinder` trait, `Route`, `AStarPathfinder`         |
//! | [`commit`]   | `commit_route`                                         |
//! | [`rerouter`] | `Rerouter`, `RerouteReport`, `DestinationOutcome`      |
//! | [`observer`] | `RerouteObserver`, `NoopObserver`, `TracingObserver`   |
//! | [`config`]   | `RerouteConfig`, `SearchBudget`                        |
//! | [`error`]    | `RoutingError`, `RerouteError`                         |
//!
//! All operations are single-threaded and take the graph by `&mut`, so two
//! searches or commits can never interleave on the same graph.

pub mod astar;
pub mod closure;
pub mod commit;
pub mod config;
pub mod error;
pub mod observer;
pub mod rerouter;

#[cfg(test)]
mod tests;

pub use astar::{AStarPathfinder, Pathfinder, Route};
pub use closure::{Closure, close_street};
pub use commit::commit_route;
pub use config::{RerouteConfig, SearchBudget};
pub use error::{RerouteError, RerouteResult, RoutingError};
pub use observer::{NoopObserver, RerouteObserver, TracingObserver};
pub use rerouter::{DestinationOutcome, RerouteReport, Rerouter};
