//! Text-file road network loader.
//!
//! # File formats
//!
//! Three `;`-delimited files without a header row.  A trailing `;` is
//! tolerated.
//!
//! ```text
//! nodes:    node_id;lat_deg;lon_deg;lon_rad;lat_rad
//! edges:    road_id;from_node_id;to_node_id
//! streets:  road_id;street name;T|F
//! ```
//!
//! Coordinates are taken from the radian columns.  An edge's weight is the
//! haversine distance between its endpoints.
//!
//! # Street naming
//!
//! One road id may cover several directed segments.  For a street record the
//! segments carrying its road id are numbered in file order and registered as
//! `"<NAME><i>"`.  A two-way street (`T`) also gets a reverse segment for each
//! of them, registered as `"<NAME><i>B"`.
//!
//! Edges referencing unknown nodes and street records referencing unknown
//! road ids are skipped with a warning.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rustc_hash::FxHashMap;
use tracing::{info, warn};

use rr_core::{Bounds, EdgeId, GeoPoint, SimRng};

use crate::graph::{Edge, RoadGraph};
use crate::{CapacityPolicy, NetworkError, NetworkResult};

// ── Public API ────────────────────────────────────────────────────────────────

/// Paths of the three input files.
#[derive(Clone, Debug)]
pub struct NetworkFiles {
    pub nodes:   PathBuf,
    pub edges:   PathBuf,
    pub streets: PathBuf,
}

impl NetworkFiles {
    /// `_nodes.txt`, `_edges.txt`, `_streets.txt` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            nodes:   dir.join("_nodes.txt"),
            edges:   dir.join("_edges.txt"),
            streets: dir.join("_streets.txt"),
        }
    }
}

/// A loaded graph plus the geographic extent of its vertices.
pub struct LoadedNetwork {
    pub graph:  RoadGraph<i64>,
    /// `None` only when the nodes file is empty.
    pub bounds: Option<Bounds>,
}

/// Load a network from the three files named in `files`.
pub fn load_network(
    files:    &NetworkFiles,
    capacity: CapacityPolicy,
    rng:      &mut SimRng,
) -> NetworkResult<LoadedNetwork> {
    load_network_readers(
        File::open(&files.nodes)?,
        File::open(&files.edges)?,
        File::open(&files.streets)?,
        capacity,
        rng,
    )
}

/// Like [`load_network`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `&[u8]`).
pub fn load_network_readers<N: Read, E: Read, S: Read>(
    nodes:    N,
    edges:    E,
    streets:  S,
    capacity: CapacityPolicy,
    rng:      &mut SimRng,
) -> NetworkResult<LoadedNetwork> {
    let mut graph  = RoadGraph::new();
    let mut bounds: Option<Bounds> = None;

    // ── Nodes ─────────────────────────────────────────────────────────────
    for (line, rec) in records(nodes) {
        let rec = rec?;
        let id: i64      = field(&rec, 0, "nodes", line)?;
        let lon_rad: f64 = field(&rec, 3, "nodes", line)?;
        let lat_rad: f64 = field(&rec, 4, "nodes", line)?;
        let pos = GeoPoint::from_radians(lat_rad, lon_rad);
        match bounds.as_mut() {
            Some(b) => b.extend(pos),
            None => bounds = Some(Bounds::around(pos)),
        }
        graph.add_vertex(id, pos);
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let mut by_road: FxHashMap<i64, Vec<EdgeId>> = FxHashMap::default();
    for (line, rec) in records(edges) {
        let rec = rec?;
        let road: i64 = field(&rec, 0, "edges", line)?;
        let src: i64  = field(&rec, 1, "edges", line)?;
        let dst: i64  = field(&rec, 2, "edges", line)?;

        let (Some(from), Some(to)) = (graph.vertex_by_external(&src), graph.vertex_by_external(&dst))
        else {
            warn!(road, src, dst, line, "edge references unknown node; skipped");
            continue;
        };
        if let Some(e) = graph.add_road(from, to, capacity.sample(rng)) {
            by_road.entry(road).or_default().push(e);
        }
    }

    // ── Streets ───────────────────────────────────────────────────────────
    let mut named = 0usize;
    for (line, rec) in records(streets) {
        let rec = rec?;
        let road: i64 = field(&rec, 0, "streets", line)?;
        let name      = rec.get(1).unwrap_or_default().trim().to_owned();
        let two_way   = rec.get(2).is_some_and(|f| f.trim().eq_ignore_ascii_case("T"));

        let Some(segments) = by_road.get(&road) else {
            warn!(road, line, street = %name, "street references unknown road id; skipped");
            continue;
        };

        for (i, &edge) in segments.iter().enumerate() {
            let key = format!("{name}{}", i + 1);
            let (from, to, weight) = {
                let e = graph.edge_mut(edge)?;
                e.set_street(&name, two_way);
                (e.from(), e.to(), e.weight_m())
            };
            if graph.register_street_name(&key, edge) {
                named += 1;
            }

            if two_way {
                // The edges file may already carry the reverse segment; name
                // that one instead of adding a parallel edge.
                let rev = match graph.edge_between(to, from) {
                    Some(existing) => {
                        graph.edge_mut(existing)?.set_street(&name, true);
                        Some(existing)
                    }
                    None => graph.add_edge(
                        Edge::new(to, from, weight, capacity.sample(rng))
                            .with_street_name(name.clone())
                            .with_bidirectional(true),
                    ),
                };
                let rev_key = format!("{key}B");
                match rev {
                    Some(rev) if graph.register_street_name(&rev_key, rev) => named += 1,
                    _ => warn!(line, street = %rev_key, "reverse segment name not registered"),
                }
            }
        }
    }

    info!(
        vertices = graph.vertex_count(),
        edges    = graph.edge_count(),
        named,
        "road network loaded"
    );
    Ok(LoadedNetwork { graph, bounds })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Header-less `;`-delimited records paired with their 1-based line number.
fn records<R: Read>(reader: R) -> impl Iterator<Item = (u64, Result<csv::StringRecord, csv::Error>)> {
    csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader)
        .into_records()
        .enumerate()
        .map(|(i, r)| (i as u64 + 1, r))
}

fn field<T: FromStr>(
    rec:  &csv::StringRecord,
    idx:  usize,
    file: &'static str,
    line: u64,
) -> NetworkResult<T> {
    let raw = rec.get(idx).ok_or_else(|| NetworkError::Parse {
        file,
        line,
        msg: format!("missing column {idx}"),
    })?;
    raw.trim().parse().map_err(|_| NetworkError::Parse {
        file,
        line,
        msg: format!("invalid value {raw:?} in column {idx}"),
    })
}
