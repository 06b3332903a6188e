//! `rr-core` — foundational types for the road-closure rerouting simulator.
//!
//! This crate is a dependency of every other `rr-*` crate.  It has no `rr-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `VertexId`, `EdgeId`                                  |
//! | [`geo`]     | `GeoPoint` (radians), haversine distance, `Bounds`    |
//! | [`rng`]     | `SimRng` (seedable, injectable)                       |
//! | [`error`]   | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Bounds, GeoPoint};
pub use ids::{EdgeId, VertexId};
pub use rng::SimRng;
