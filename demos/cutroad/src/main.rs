//! cutroad — close streets and watch stranded traffic find its way around.
//!
//! Loads a road network (the `_nodes.txt`/`_edges.txt`/`_streets.txt` triple,
//! or a built-in eight-intersection town), closes each `--street` in turn,
//! reroutes the vehicles each closure strands, and prints what happened.
//!
//! ```text
//! cutroad --street "Market Street" --street "college lane b"
//! cutroad --data-dir data/porto --config reroute.json --street "Rua de Cedofeita0"
//! RUST_LOG=rr_reroute=debug cutroad --street "Quay Street"
//! ```

mod network;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use rr_core::SimRng;
use rr_network::{
    CapacityPolicy, DestinationStatus, EdgeStatus, NetworkFiles, RoadGraph, load_network,
};
use rr_reroute::{RerouteConfig, RerouteError, RerouteReport, Rerouter, TracingObserver};

use network::build_network;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding `_nodes.txt`, `_edges.txt` and `_streets.txt`.
    /// Without it the built-in demo town is used.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// JSON file with a `RerouteConfig`; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the seed from `--config`.
    #[arg(long)]
    seed: Option<u64>,

    /// Street to close.  Repeat to close several, in order.
    #[arg(long = "street", short = 's', required = true)]
    streets: Vec<String>,

    /// Restore the network between closures instead of letting them pile up.
    #[arg(long)]
    reset_between: bool,

    /// Fixed capacity for every edge instead of the default uniform draw.
    #[arg(long)]
    capacity: Option<u32>,

    /// Print the full report of each closure as JSON.
    #[arg(long)]
    json: bool,
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn load_config(args: &Args) -> Result<RerouteConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => RerouteConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_report(graph: &mut RoadGraph<i64>, report: &RerouteReport) {
    let closure = &report.closure;
    if closure.already_cut {
        println!("{:?} was already closed", report.street);
        return;
    }
    println!(
        "Closed {:?}: {} vertices beyond the cut, {} stranded, rerouting from {}",
        report.street,
        closure.explored,
        closure.stranded.len(),
        external(graph, closure.origin),
    );

    let snapshot = graph.snapshot();
    for d in &snapshot.destinations {
        let status = match d.status {
            DestinationStatus::Resolved    => "rerouted",
            DestinationStatus::Pending     => "pending",
            DestinationStatus::Unreachable => "UNREACHABLE",
        };
        println!("  vehicle to {:>10}  {status}", external(graph, d.vertex));
    }

    let mut used: Vec<_> = snapshot
        .edges
        .iter()
        .filter(|e| e.status() == EdgeStatus::OnPath)
        .collect();
    used.sort_by(|a, b| b.load_ratio().total_cmp(&a.load_ratio()));
    if !used.is_empty() {
        println!("  streets carrying the detour:");
        for e in used {
            println!("    {e}");
        }
    }
    println!(
        "  {} rerouted, {} unreachable",
        report.rerouted(),
        report.unreachable()
    );
}

fn external(graph: &RoadGraph<i64>, v: rr_core::VertexId) -> String {
    graph
        .vertex(v)
        .map(|v| v.external_id.to_string())
        .unwrap_or_else(|_| v.to_string())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let config = load_config(&args)?;

    let capacity = args.capacity.map_or_else(CapacityPolicy::default, CapacityPolicy::Fixed);
    // Capacities use their own stream so the closure draws only depend on the seed.
    let mut rng = SimRng::new(config.seed).child(1);

    let mut graph = match &args.data_dir {
        Some(dir) => {
            let loaded = load_network(&NetworkFiles::in_dir(dir), capacity, &mut rng)
                .with_context(|| format!("loading network from {}", dir.display()))?;
            if let Some(bounds) = loaded.bounds {
                info!(?bounds, "network extent");
            }
            loaded.graph
        }
        None => build_network(capacity, &mut rng),
    };
    println!(
        "Road network: {} vertices, {} edges, {} named streets",
        graph.vertex_count(),
        graph.edge_count(),
        graph.street_names().count()
    );

    let mut rerouter = Rerouter::new(config)?;
    let mut observer = TracingObserver;

    for street in &args.streets {
        if args.reset_between {
            graph.reset_all();
        }
        match rerouter.run_closure(&mut graph, street, &mut observer) {
            Ok(report) => {
                print_report(&mut graph, &report);
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
            }
            Err(RerouteError::StreetNotFound { name, suggestions }) => {
                println!("No street named {name:?}.");
                if !suggestions.is_empty() {
                    println!("  Did you mean: {}?", suggestions.join(", "));
                }
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
