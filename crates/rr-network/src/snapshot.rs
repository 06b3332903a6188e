//! Read-out of the graph's congestion state for an external renderer.
//!
//! The snapshot carries everything needed to pick a colour and thickness per
//! edge and per stranded destination; no drawing happens here.

use std::fmt;
use std::hash::Hash;

use rr_core::{EdgeId, VertexId};

use crate::graph::RoadGraph;

/// Render-relevant state of one directed edge.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeSnapshot {
    pub edge:     EdgeId,
    pub from:     VertexId,
    pub to:       VertexId,
    /// Lookup key if registered, otherwise the display name.
    pub name:     String,
    pub load:     u32,
    pub capacity: u32,
    pub is_cut:   bool,
    pub on_path:  bool,
    pub weight_m: f64,
}

/// Display category, in precedence order: a freshly committed path wins over
/// a cut, a cut over a full road.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeStatus {
    OnPath,
    Cut,
    Full,
    Open,
}

impl EdgeSnapshot {
    pub fn status(&self) -> EdgeStatus {
        if self.on_path {
            EdgeStatus::OnPath
        } else if self.is_cut {
            EdgeStatus::Cut
        } else if self.load >= self.capacity {
            EdgeStatus::Full
        } else {
            EdgeStatus::Open
        }
    }

    pub fn load_ratio(&self) -> f64 {
        if self.capacity == 0 { 1.0 } else { self.load as f64 / self.capacity as f64 }
    }
}

impl fmt::Display for EdgeSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{} {:.0}m", self.name, self.load, self.capacity, self.weight_m)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DestinationStatus {
    Resolved,
    Pending,
    Unreachable,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DestinationSnapshot {
    pub vertex: VertexId,
    pub status: DestinationStatus,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphSnapshot {
    pub edges:        Vec<EdgeSnapshot>,
    pub destinations: Vec<DestinationSnapshot>,
}

impl GraphSnapshot {
    pub fn edge(&self, id: EdgeId) -> Option<&EdgeSnapshot> {
        self.edges.iter().find(|e| e.edge == id)
    }
}

impl<Id: Eq + Hash + Clone + fmt::Debug> RoadGraph<Id> {
    /// Capture the current congestion state.
    ///
    /// On-path markers are a one-shot hint: reading them here clears them, so
    /// the next snapshot only highlights paths committed in between.
    pub fn snapshot(&mut self) -> GraphSnapshot {
        let edges = self
            .edges_mut()
            .map(|(id, e)| EdgeSnapshot {
                edge:     id,
                from:     e.from(),
                to:       e.to(),
                name:     e.name_mask().unwrap_or(e.street_name()).to_owned(),
                load:     e.current_load(),
                capacity: e.max_capacity(),
                is_cut:   e.is_cut(),
                on_path:  e.take_on_path(),
                weight_m: e.weight_m(),
            })
            .collect();

        let destinations = self
            .stranded()
            .iter()
            .filter_map(|&v| self.vertex(v).ok())
            .map(|v| DestinationSnapshot {
                vertex: v.id,
                status: if v.resolved {
                    DestinationStatus::Resolved
                } else if v.reachable {
                    DestinationStatus::Pending
                } else {
                    DestinationStatus::Unreachable
                },
            })
            .collect();

        GraphSnapshot { edges, destinations }
    }
}
