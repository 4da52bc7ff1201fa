use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

mod config;
mod data;
mod graph;
mod spanner;
mod storage;
mod verify;

use config::Config;
use spanner::metrics::SpannerSummary;

#[derive(Parser, Debug)]
#[clap(
    name = "graph-spanner",
    about = "Sparse t-spanner construction for weighted undirected graphs"
)]
struct Cli {
    /// Input graph (header `n m t`, then `u v w` lines); stdin if omitted
    #[clap(long)]
    input: Option<String>,

    /// Output file for the spanner; stdout if omitted
    #[clap(long)]
    output: Option<String>,

    /// Optional JSON summary file
    #[clap(long)]
    summary: Option<String>,

    /// Seed for the sampling stream (seeded from entropy if omitted)
    #[clap(long)]
    seed: Option<u64>,

    /// Check the result with the all-pairs stretch oracle (cubic; small graphs only)
    #[clap(long)]
    verify: bool,

    /// Number of worker threads for verification (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let config = Config::new(args.seed, args.verify, args.threads);

    // Set number of threads for the verification oracle
    let num_threads = if config.threads > 0 {
        config.threads
    } else {
        num_cpus::get()
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting spanner construction");
    let total_start = Instant::now();

    // 1. Load and validate the input
    let input = data::text::load_input(args.input.as_deref())?;
    let mut graph = input.graph;
    let stretch = input.stretch;

    let vertex_count = graph.vertex_count();
    let edge_count = graph.edge_count();
    log::info!(
        "Loaded graph with {} vertices, {} edges, stretch {}",
        vertex_count,
        edge_count,
        stretch
    );

    // Verification needs the original edge list before construction
    // overwrites the edge statuses
    let original_edges = if config.verify {
        Some(graph.edge_list())
    } else {
        None
    };

    // 2. Build the spanner
    let mut rng = match config.seed {
        Some(seed) => {
            log::info!("Sampling stream seeded with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let construction_start = Instant::now();
    let result = spanner::build_spanner(&mut graph, stretch, &mut rng);
    log::info!(
        "Construction finished in {:.2?}: kept {} of {} edges",
        construction_start.elapsed(),
        result.edges.len(),
        edge_count
    );

    // 3. Summarize
    let summary = SpannerSummary::compute(edge_count, &result, stretch);
    log::info!(
        "Retention {:.3}, expected-size yardstick {:.1}",
        summary.retention,
        summary.expected_size_bound
    );
    if let Some(path) = args.summary.as_deref() {
        storage::save_summary(&summary, path)?;
    }

    // 4. Verify if requested
    if let Some(edges) = original_edges {
        log::info!("Running all-pairs stretch verification");
        let report = verify::verify_spanner(vertex_count, &edges, &result, stretch)?;
        if report.passed() {
            log::info!("Verification passed");
        } else {
            log::error!(
                "Verification FAILED (subgraph: {}, stretch: {})",
                report.is_subgraph,
                report.stretch_ok
            );
            return Err(anyhow::anyhow!("spanner failed verification"));
        }
    }

    // 5. Emit the spanner
    storage::save_spanner(&result, args.output.as_deref())?;

    log::info!("Done in {:.2?}", total_start.elapsed());

    Ok(())
}
