//! `rr-network` — road graph, name index, and loading.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`graph`]    | `RoadGraph<Id>`, `Vertex`, `Edge`                          |
//! | [`capacity`] | `CapacityPolicy` (fixed or seeded-uniform edge capacities) |
//! | [`names`]    | street-name normalization and fuzzy suggestions            |
//! | [`loader`]   | `;`-delimited nodes / edges / streets loader               |
//! | [`snapshot`] | `GraphSnapshot` handed to renderers                        |
//! | [`error`]    | `NetworkError`, `NetworkResult<T>`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod capacity;
pub mod error;
pub mod graph;
pub mod loader;
pub mod names;
pub mod snapshot;


pub use capacity::CapacityPolicy;
pub use error::{NetworkError, NetworkResult};
pub use graph::{Edge, RoadGraph, Vertex};
pub use loader::{LoadedNetwork, NetworkFiles, load_network, load_network_readers};
pub use snapshot::{DestinationSnapshot, DestinationStatus, EdgeSnapshot, EdgeStatus, GraphSnapshot};
