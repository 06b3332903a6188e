//! Unit tests for rr-reroute.
//!
//! Small hand-built graphs; every random draw comes from a fixed seed.

#[cfg(test)]
mod helpers {
    use rr_core::{GeoPoint, SimRng, VertexId};
    use rr_network::{CapacityPolicy, Edge, RoadGraph};

    /// Diamond A→B→D, A→C→D, every edge 100 m, capacities `[AB, BD, AC, CD]`.
    ///
    /// All four vertices share one coordinate, so the heuristic is zero and
    /// the explicit weights decide everything.
    pub fn diamond_with(caps: [u32; 4]) -> (RoadGraph<char>, [VertexId; 4]) {
        let mut g = RoadGraph::new();
        let p = GeoPoint::from_degrees(41.15, -8.61);
        let a = g.add_vertex('A', p);
        let b = g.add_vertex('B', p);
        let c = g.add_vertex('C', p);
        let d = g.add_vertex('D', p);
        let roads = [(a, b, "A-B"), (b, d, "B-D"), (a, c, "A-C"), (c, d, "C-D")];
        for ((from, to, name), cap) in roads.into_iter().zip(caps) {
            let e = g.add_edge(Edge::new(from, to, 100.0, cap)).unwrap();
            assert!(g.register_street_name(name, e));
        }
        (g, [a, b, c, d])
    }

    pub fn diamond() -> (RoadGraph<char>, [VertexId; 4]) {
        diamond_with([5; 4])
    }

    /// `n × n` grid of two-way streets about 110 m apart, haversine weights,
    /// capacities drawn from `policy`.  Edge `k` is registered as `"R<k>"`.
    pub fn grid(n: u32, policy: CapacityPolicy, seed: u64) -> RoadGraph<(u32, u32)> {
        let mut rng = SimRng::new(seed);
        let mut g = RoadGraph::new();
        for r in 0..n {
            for c in 0..n {
                // Slight jitter keeps the layout from being perfectly regular.
                let jitter = rng.gen_range(0.0..0.0002);
                g.add_vertex(
                    (r, c),
                    GeoPoint::from_degrees(41.0 + r as f64 * 0.001 + jitter, -8.6 + c as f64 * 0.0013),
                );
            }
        }
        let at = |r: u32, c: u32| VertexId(r * n + c);
        for r in 0..n {
            for c in 0..n {
                let mut link = |a: VertexId, b: VertexId| {
                    g.add_road(a, b, policy.sample(&mut rng));
                    g.add_road(b, a, policy.sample(&mut rng));
                };
                if c + 1 < n {
                    link(at(r, c), at(r, c + 1));
                }
                if r + 1 < n {
                    link(at(r, c), at(r + 1, c));
                }
            }
        }
        let ids: Vec<_> = g.edges().map(|(id, _)| id).collect();
        for id in ids {
            g.register_street_name(&format!("R{}", id.0), id);
        }
        g
    }

    /// Plain O(V²) Dijkstra over traversable edges.  Reference for optimality.
    pub fn brute_force_distance<Id>(g: &RoadGraph<Id>, from: VertexId, to: VertexId) -> Option<f64>
    where
        Id: Eq + std::hash::Hash + Clone + std::fmt::Debug,
    {
        let n = g.vertex_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut done = vec![false; n];
        dist[from.index()] = 0.0;
        loop {
            let next = (0..n)
                .filter(|&i| !done[i] && dist[i].is_finite())
                .min_by(|&a, &b| dist[a].total_cmp(&dist[b]));
            let Some(u) = next else { break };
            done[u] = true;
            for &e in g.vertex(VertexId(u as u32)).unwrap().out_edges() {
                let edge = g.edge(e).unwrap();
                if edge.is_traversable() {
                    let alt = dist[u] + edge.weight_m();
                    if alt < dist[edge.to().index()] {
                        dist[edge.to().index()] = alt;
                    }
                }
            }
        }
        dist[to.index()].is_finite().then_some(dist[to.index()])
    }

    pub fn quiet_config(stranded_probability: f64) -> crate::RerouteConfig {
        crate::RerouteConfig { stranded_probability, ..Default::default() }
    }
}

// ── A* ────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod astar {
    use rr_core::{CoreError, GeoPoint, VertexId};
    use rr_network::{CapacityPolicy, Edge, RoadGraph};

    use super::helpers::{brute_force_distance, diamond, diamond_with, grid};
    use crate::{AStarPathfinder, Pathfinder, RoutingError};

    #[test]
    fn trivial_same_vertex() {
        let (g, [a, ..]) = diamond();
        let r = AStarPathfinder.find_route(&g, a, a, g.vertex_count()).unwrap();
        assert!(r.is_trivial());
        assert_eq!(r.vertices, [a]);
        assert_eq!(r.total_weight_m, 0.0);
    }

    #[test]
    fn cut_edge_forces_detour() {
        let (mut g, [a, b, c, d]) = diamond();
        let ab = g.edge_between(a, b).unwrap();
        g.edge_mut(ab).unwrap().cut();

        let r = AStarPathfinder.find_route(&g, a, d, 4).unwrap();
        assert_eq!(r.vertices, [a, c, d]);
        assert_eq!(r.total_weight_m, 200.0);
        assert!(!r.edges.contains(&ab));
        assert_eq!(r.origin(), a);
        assert_eq!(r.destination(), d);
    }

    #[test]
    fn full_edges_are_not_admitted() {
        // A→B at capacity 0 behaves like a cut.
        let (g, [a, _, c, d]) = diamond_with([0, 5, 5, 5]);
        let r = AStarPathfinder.find_route(&g, a, d, 4).unwrap();
        assert_eq!(r.vertices, [a, c, d]);
    }

    #[test]
    fn no_open_road_is_unreachable() {
        let (mut g, [a, b, _, d]) = diamond_with([5, 5, 0, 0]);
        g.edge_mut(g.edge_between(a, b).unwrap()).unwrap().cut();
        let err = AStarPathfinder.find_route(&g, a, d, 4).unwrap_err();
        assert!(matches!(err, RoutingError::Unreachable { from, to, .. } if from == a && to == d));
    }

    #[test]
    fn budget_bounds_the_search() {
        let (g, [a, .., d]) = diamond();
        let err = AStarPathfinder.find_route(&g, a, d, 1).unwrap_err();
        assert!(matches!(err, RoutingError::Unreachable { explored: 1, .. }));
    }

    #[test]
    fn unknown_vertex_is_an_error() {
        let (g, [a, ..]) = diamond();
        let err = AStarPathfinder.find_route(&g, a, VertexId(99), 4).unwrap_err();
        assert!(matches!(err, RoutingError::Core(CoreError::VertexNotFound(VertexId(99)))));
    }

    #[test]
    fn terminates_on_pop_not_on_discovery() {
        // S→T directly is 1000 m; S→X→T is 20 m.  T is seen as a neighbour of
        // S first, but the search must keep going until it pops T.
        let mut g = RoadGraph::new();
        let p = GeoPoint::from_degrees(0.0, 0.0);
        let s = g.add_vertex(0u8, p);
        let t = g.add_vertex(1u8, p);
        let x = g.add_vertex(2u8, p);
        g.add_edge(Edge::new(s, t, 1_000.0, 5)).unwrap();
        g.add_edge(Edge::new(s, x, 10.0, 5)).unwrap();
        g.add_edge(Edge::new(x, t, 10.0, 5)).unwrap();

        let r = AStarPathfinder.find_route(&g, s, t, 3).unwrap();
        assert_eq!(r.vertices, [s, x, t]);
        assert_eq!(r.total_weight_m, 20.0);
    }

    #[test]
    fn optimal_against_brute_force() {
        // Capacities 0..3 leave roughly a third of the edges full.
        let mut g = grid(4, CapacityPolicy::Uniform { low: 0, high: 3 }, 11);
        for name in ["R3", "R10", "R17"] {
            let e = g.find_edge_by_name(name).unwrap();
            g.edge_mut(e).unwrap().cut();
        }
        let n = g.vertex_count() as u32;
        for from in (0..n).map(VertexId) {
            for to in (0..n).map(VertexId) {
                let expected = brute_force_distance(&g, from, to);
                match (AStarPathfinder.find_route(&g, from, to, g.vertex_count()), expected) {
                    (Ok(route), Some(best)) => {
                        assert!(
                            (route.total_weight_m - best).abs() < 1e-6,
                            "{from}→{to}: A* {} vs {best}",
                            route.total_weight_m
                        );
                        let summed: f64 = route.edges.iter().map(|&e| g.edge(e).unwrap().weight_m()).sum();
                        assert!((summed - route.total_weight_m).abs() < 1e-6);
                    }
                    (Err(RoutingError::Unreachable { .. }), None) => {}
                    (got, want) => panic!("{from}→{to}: A* {got:?} vs brute force {want:?}"),
                }
            }
        }
    }

    #[test]
    fn route_edges_match_vertices() {
        let g = grid(3, CapacityPolicy::Fixed(10), 5);
        let r = AStarPathfinder.find_route(&g, VertexId(0), VertexId(8), 9).unwrap();
        assert_eq!(r.edges.len() + 1, r.vertices.len());
        for (i, &e) in r.edges.iter().enumerate() {
            let edge = g.edge(e).unwrap();
            assert_eq!((edge.from(), edge.to()), (r.vertices[i], r.vertices[i + 1]));
        }
        // Corner to corner on a 3×3 grid is four blocks.
        assert_eq!(r.edges.len(), 4);
    }
}

// ── Closure ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod closure {
    use rr_core::SimRng;
    use rr_network::CapacityPolicy;

    use super::helpers::{diamond, grid, quiet_config};
    use crate::{RerouteError, close_street};

    #[test]
    fn unknown_street_suggests_names() {
        let (mut g, _) = diamond();
        let mut rng = SimRng::new(1);
        let err = close_street(&mut g, "A-X", &quiet_config(0.1), &mut rng).unwrap_err();
        match err {
            RerouteError::StreetNotFound { name, suggestions } => {
                assert_eq!(name, "A-X");
                assert!(!suggestions.is_empty());
                assert!(suggestions.contains(&"A-B".to_owned()));
                assert!(suggestions.iter().all(|s| s.starts_with("A-")));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(g.edges().all(|(_, e)| !e.is_cut()));
    }

    #[test]
    fn cuts_edge_and_returns_origin() {
        let (mut g, [a, b, _, d]) = diamond();
        let mut rng = SimRng::new(1);
        let c = close_street(&mut g, "a-b", &quiet_config(0.0), &mut rng).unwrap();
        assert_eq!(c.origin, a);
        assert_eq!(c.edge, g.edge_between(a, b).unwrap());
        assert!(g.edge(c.edge).unwrap().is_cut());
        // B and D lie beyond the cut.
        assert_eq!(c.explored, 2);
        assert!(g.vertex(b).unwrap().visited && g.vertex(d).unwrap().visited);
        assert!(!g.vertex(a).unwrap().visited);
        assert!(c.stranded.is_empty());
    }

    #[test]
    fn certain_probability_strands_everything_reached() {
        let (mut g, [_, b, _, d]) = diamond();
        let mut rng = SimRng::new(1);
        let c = close_street(&mut g, "A-B", &quiet_config(1.0), &mut rng).unwrap();
        assert_eq!(c.stranded, [b, d]);
        assert_eq!(g.stranded(), [b, d]);
    }

    #[test]
    fn closing_twice_is_idempotent() {
        let (mut g, [a, ..]) = diamond();
        let mut rng = SimRng::new(1);
        let first = close_street(&mut g, "A-B", &quiet_config(1.0), &mut rng).unwrap();
        let second = close_street(&mut g, "A-B", &quiet_config(1.0), &mut rng).unwrap();
        assert_eq!(second.origin, a);
        assert_eq!(second.edge, first.edge);
        assert!(second.already_cut);
        assert!(second.stranded.is_empty());
        assert_eq!(g.stranded().len(), first.stranded.len());
    }

    #[test]
    fn sampling_is_deterministic_per_seed() {
        let run = |seed| {
            let mut g = grid(5, CapacityPolicy::Fixed(10), 3);
            let mut rng = SimRng::new(seed);
            close_street(&mut g, "R0", &quiet_config(0.3), &mut rng).unwrap().stranded
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn traversal_reaches_whole_connected_grid() {
        let mut g = grid(4, CapacityPolicy::Fixed(10), 3);
        let mut rng = SimRng::new(1);
        let c = close_street(&mut g, "R0", &quiet_config(0.0), &mut rng).unwrap();
        // Two-way grid: every vertex is reachable from the far end.
        assert_eq!(c.explored, 16);
    }
}

// ── Commit ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod commit {
    use super::helpers::{diamond, diamond_with};
    use crate::{AStarPathfinder, Pathfinder, RerouteError, Route, commit_route};

    #[test]
    fn increments_load_and_marks_path() {
        let (mut g, [a, b, c, d]) = diamond();
        g.edge_mut(g.edge_between(a, b).unwrap()).unwrap().cut();
        let route = AStarPathfinder.find_route(&g, a, d, 4).unwrap();
        commit_route(&mut g, route).unwrap();

        for (from, to) in [(a, c), (c, d)] {
            let e = g.edge(g.edge_between(from, to).unwrap()).unwrap();
            assert_eq!(e.current_load(), 1);
            assert!(e.on_solution_path());
        }
        let bd = g.edge(g.edge_between(b, d).unwrap()).unwrap();
        assert_eq!(bd.current_load(), 0);
        assert!(!bd.on_solution_path());
    }

    #[test]
    fn full_edge_aborts_without_side_effects() {
        let (mut g, [a, _, c, d]) = diamond_with([5, 5, 5, 1]);

        // Fill C→D after the route was planned.
        let cd = g.edge_between(c, d).unwrap();
        g.edge_mut(cd).unwrap().add_vehicle();
        let stale = Route {
            vertices: vec![a, c, d],
            edges: vec![g.edge_between(a, c).unwrap(), cd],
            total_weight_m: 200.0,
            explored: 0,
        };

        let err = commit_route(&mut g, stale).unwrap_err();
        assert!(matches!(err, RerouteError::CapacityExceeded { edge, load: 1, capacity: 1 } if edge == cd));
        let ac = g.edge(g.edge_between(a, c).unwrap()).unwrap();
        assert_eq!(ac.current_load(), 0);
        assert!(!ac.on_solution_path());
    }

    #[test]
    fn cut_edge_aborts() {
        let (mut g, [a, b, _, d]) = diamond();
        let ab = g.edge_between(a, b).unwrap();
        let route = Route {
            vertices: vec![a, b, d],
            edges: vec![ab, g.edge_between(b, d).unwrap()],
            total_weight_m: 200.0,
            explored: 0,
        };
        g.edge_mut(ab).unwrap().cut();
        assert!(matches!(commit_route(&mut g, route), Err(RerouteError::CutEdge(e)) if e == ab));
    }

    #[test]
    fn disconnected_route_is_broken() {
        let (mut g, [a, _, _, d]) = diamond();
        let route = Route { vertices: vec![a, d], edges: vec![], total_weight_m: 0.0, explored: 0 };
        assert!(matches!(
            commit_route(&mut g, route),
            Err(RerouteError::BrokenRoute { from, to }) if from == a && to == d
        ));
    }
}

// ── Rerouter workflow ─────────────────────────────────────────────────────────

#[cfg(test)]
mod rerouter {
    use rr_core::{CoreError, VertexId};
    use rr_network::CapacityPolicy;

    use super::helpers::{diamond, diamond_with, grid, quiet_config};
    use crate::{
        Closure, DestinationOutcome, NoopObserver, RerouteConfig, RerouteError, RerouteObserver,
        Rerouter, Route, SearchBudget,
    };

    #[derive(Default)]
    struct Counting {
        closures:    usize,
        rerouted:    usize,
        unreachable: usize,
    }

    impl RerouteObserver for Counting {
        fn on_closure(&mut self, _street: &str, _closure: &Closure) {
            self.closures += 1;
        }
        fn on_rerouted(&mut self, _route: &Route) {
            self.rerouted += 1;
        }
        fn on_unreachable(&mut self, _destination: VertexId, _explored: usize) {
            self.unreachable += 1;
        }
    }

    #[test]
    fn invalid_probability_rejected() {
        let err = Rerouter::new(quiet_config(1.5)).err().unwrap();
        assert!(matches!(err, RerouteError::Core(CoreError::Config(_))));
        assert!(Rerouter::new(quiet_config(f64::NAN)).is_err());
    }

    #[test]
    fn diamond_closure_scenario() {
        let (mut g, [a, b, c, d]) = diamond();
        let mut rr = Rerouter::new(quiet_config(1.0)).unwrap();
        let mut obs = Counting::default();
        let report = rr.run_closure(&mut g, "A-B", &mut obs).unwrap();

        assert_eq!(report.closure.origin, a);
        // B is only reachable through the cut; D is rerouted via C.
        assert_eq!(
            report.outcomes,
            [
                DestinationOutcome::Unreachable { destination: b, explored: 3 },
                DestinationOutcome::Rerouted { destination: d, edges: 2, weight_m: 200.0, explored: 2 },
            ]
        );
        assert_eq!((obs.closures, obs.rerouted, obs.unreachable), (1, 1, 1));
        assert_eq!((report.rerouted(), report.unreachable()), (1, 1));

        let load = |g: &rr_network::RoadGraph<char>, x, y| {
            g.edge(g.edge_between(x, y).unwrap()).unwrap().current_load()
        };
        assert_eq!(load(&g, a, c), 1);
        assert_eq!(load(&g, c, d), 1);
        assert_eq!(load(&g, a, b), 0);
        assert!(g.vertex(d).unwrap().resolved);
        assert!(!g.vertex(b).unwrap().reachable);

        g.reset_all();
        assert!(!g.edge(g.edge_between(a, b).unwrap()).unwrap().is_cut());
        assert!(g.edges().all(|(_, e)| e.current_load() == 0));
        assert!(g.vertex(b).unwrap().reachable);
    }

    #[test]
    fn prefilled_detour_leaves_destination_unreachable() {
        let (mut g, [_, _, _, d]) = diamond_with([5, 5, 0, 0]);
        let mut rr = Rerouter::new(quiet_config(1.0)).unwrap();
        let report = rr.run_closure(&mut g, "A-B", &mut NoopObserver).unwrap();
        assert_eq!(report.rerouted(), 0);
        assert!(!g.vertex(d).unwrap().reachable);
        assert!(!g.vertex(d).unwrap().resolved);
    }

    #[test]
    fn unknown_street_aborts_run() {
        let (mut g, _) = diamond();
        let mut rr = Rerouter::new(RerouteConfig::default()).unwrap();
        let err = rr.run_closure(&mut g, "Nowhere", &mut NoopObserver).unwrap_err();
        assert!(matches!(err, RerouteError::StreetNotFound { .. }));
    }

    #[test]
    fn closure_reach_budget_can_cut_search_short() {
        // A fixed budget of 1 stops every search after closing A, so neither
        // B nor D is rerouted.  The closure reaches B and D, so the reach
        // budget is 3: enough to find D via A and C, not enough to exhaust
        // the search for B.
        let (mut g, [_, _, _, d]) = diamond();
        let config = RerouteConfig { budget: SearchBudget::Fixed(1), ..quiet_config(1.0) };
        let mut rr = Rerouter::new(config).unwrap();
        let report = rr.run_closure(&mut g, "A-B", &mut NoopObserver).unwrap();
        assert_eq!(report.rerouted(), 0);
        assert!(!g.vertex(d).unwrap().reachable);

        g.reset_all();
        let config = RerouteConfig { budget: SearchBudget::ClosureReach, ..quiet_config(1.0) };
        let mut rr = Rerouter::new(config).unwrap();
        let report = rr.run_closure(&mut g, "A-B", &mut NoopObserver).unwrap();
        assert_eq!(report.rerouted(), 1);
    }

    #[test]
    fn latest_reroute_decides_destination_status() {
        use rr_network::DestinationStatus;

        let (mut g, [a, b, c, d]) = diamond();
        let rr = Rerouter::new(RerouteConfig::default()).unwrap();
        g.push_stranded(d);
        let status = |g: &mut rr_network::RoadGraph<char>| g.snapshot().destinations[0].status;

        assert!(rr.reroute_to(&mut g, a, d, 4).unwrap().is_ok());
        assert_eq!(status(&mut g), DestinationStatus::Resolved);

        // Both ways out of A closed: the next vehicle to D has no route.
        for to in [b, c] {
            g.edge_mut(g.edge_between(a, to).unwrap()).unwrap().cut();
        }
        assert!(rr.reroute_to(&mut g, a, d, 4).unwrap().is_err());
        let v = g.vertex(d).unwrap();
        assert!(!v.resolved && !v.reachable);
        assert_eq!(status(&mut g), DestinationStatus::Unreachable);
    }

    #[test]
    fn success_after_failure_clears_unreachable() {
        let (mut g, [a, .., d]) = diamond();
        let rr = Rerouter::new(RerouteConfig::default()).unwrap();

        assert!(rr.reroute_to(&mut g, a, d, 1).unwrap().is_err());
        assert!(!g.vertex(d).unwrap().reachable);

        assert!(rr.reroute_to(&mut g, a, d, 4).unwrap().is_ok());
        let v = g.vertex(d).unwrap();
        assert!(v.resolved && v.reachable);
    }

    #[test]
    fn capacity_invariant_and_exclusion_over_many_closures() {
        let mut g = grid(5, CapacityPolicy::Uniform { low: 1, high: 4 }, 21);
        let mut rr = Rerouter::new(quiet_config(0.6)).unwrap();
        let streets = ["R0", "R7", "R12", "R25", "R40"];
        // (edge, load when it was cut)
        let mut cut = Vec::new();

        for street in streets {
            let report = rr.run_closure(&mut g, street, &mut NoopObserver).unwrap();
            let id = report.closure.edge;
            cut.push((id, g.edge(id).unwrap().current_load()));
            for (_, e) in g.edges() {
                assert!(e.current_load() <= e.max_capacity());
            }
            for &(id, load) in &cut {
                let e = g.edge(id).unwrap();
                assert!(e.is_cut());
                assert_eq!(e.current_load(), load, "cut edge {id} carried new traffic");
            }
        }

        g.reset_all();
        assert!(g.edges().all(|(_, e)| e.current_load() == 0 && !e.is_cut()));
        assert!(g.stranded().is_empty());
    }

    #[test]
    fn same_seed_same_report() {
        let run = || {
            let mut g = grid(4, CapacityPolicy::Fixed(3), 8);
            let mut rr = Rerouter::new(RerouteConfig { seed: 99, ..quiet_config(0.5) }).unwrap();
            rr.run_closure(&mut g, "R5", &mut NoopObserver).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn snapshot_shows_committed_path_once() {
        let (mut g, [a, _, c, _]) = diamond();
        let mut rr = Rerouter::new(quiet_config(1.0)).unwrap();
        rr.run_closure(&mut g, "A-B", &mut NoopObserver).unwrap();

        let ac = g.edge_between(a, c).unwrap();
        let snap = g.snapshot();
        assert!(snap.edge(ac).unwrap().on_path);
        assert_eq!(snap.destinations.len(), 2);
        assert!(!g.snapshot().edge(ac).unwrap().on_path);
    }
}
