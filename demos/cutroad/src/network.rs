//! Built-in demo network.
//!
//! Eight intersections around a small river town.  Every street is two-way;
//! the forward edge is registered under the street's name and the reverse
//! edge under the name with a trailing `B`, the same scheme the file loader
//! uses.

use rr_core::{GeoPoint, SimRng, VertexId};
use rr_network::{CapacityPolicy, RoadGraph};

/// Build the demo network.
///
/// External ids are the intersection numbers 1–8.  Capacities are drawn from
/// `capacity` with `rng`.
pub fn build_network(capacity: CapacityPolicy, rng: &mut SimRng) -> RoadGraph<i64> {
    let mut g = RoadGraph::with_capacity(8, 24);

    let station     = g.add_vertex(1, GeoPoint::from_degrees(41.1496, -8.6110));
    let market      = g.add_vertex(2, GeoPoint::from_degrees(41.1470, -8.6080));
    let cathedral   = g.add_vertex(3, GeoPoint::from_degrees(41.1430, -8.6113));
    let bridge      = g.add_vertex(4, GeoPoint::from_degrees(41.1405, -8.6095));
    let riverside   = g.add_vertex(5, GeoPoint::from_degrees(41.1410, -8.6150));
    let university  = g.add_vertex(6, GeoPoint::from_degrees(41.1466, -8.6158));
    let park        = g.add_vertex(7, GeoPoint::from_degrees(41.1515, -8.6170));
    let hospital    = g.add_vertex(8, GeoPoint::from_degrees(41.1530, -8.6060));

    let streets: [(&str, VertexId, VertexId); 11] = [
        ("Station Road",     station,    market),
        ("Market Street",    market,     cathedral),
        ("Cathedral Hill",   cathedral,  bridge),
        ("Quay Street",      bridge,     riverside),
        ("River Walk",       riverside,  university),
        ("College Lane",     university, station),
        ("Park Avenue",      park,       station),
        ("Park Crescent",    park,       university),
        ("Hospital Road",    hospital,   station),
        ("Eastern Bypass",   hospital,   market),
        ("Old Town Passage", university, cathedral),
    ];

    for (name, a, b) in streets {
        if let Some(e) = g.add_road(a, b, capacity.sample(rng)) {
            g.register_street_name(name, e);
        }
        if let Some(e) = g.add_road(b, a, capacity.sample(rng)) {
            g.register_street_name(&format!("{name} B"), e);
        }
    }
    g
}
