use anyhow::Result;
use clap::Parser;

use hierarchical_cluster_analyzer::cluster::agglomerative::AgglomerativeEngine;
use hierarchical_cluster_analyzer::cluster::divisive::DivisiveEngine;
use hierarchical_cluster_analyzer::cluster::linkage::Linkage;
use hierarchical_cluster_analyzer::config::ClusterConfig;
use hierarchical_cluster_analyzer::{data, storage};

#[derive(Parser, Debug)]
#[clap(
    name = "hierarchical-cluster-analyzer",
    about = "Hierarchical cluster analysis of labeled vector records"
)]
struct Cli {
    /// Path to input CSV or Parquet file
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "cluster_results")]
    output_dir: String,

    /// Clustering direction: agglomerative (merge) or divisive (split)
    #[clap(long, default_value = "agglomerative")]
    algorithm: String,

    /// Linkage policy: single, complete, average, weighted_average,
    /// centroid, median, or ward
    #[clap(long, default_value = "single")]
    linkage: String,

    /// Record-to-record metric: squared_euclidean, euclidean, or manhattan
    #[clap(long, default_value = "squared_euclidean")]
    metric: String,

    /// Target number of clusters
    #[clap(long)]
    clusters: Option<usize>,

    /// Stop merging once the closest pair is farther than this
    /// (agglomerative only, mutually exclusive with --clusters)
    #[clap(long)]
    distance_threshold: Option<f64>,

    /// Number of worker threads (0 = use all available cores)
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

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting hierarchical cluster analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // 1. Load data
    let dataset = data::loader::load_dataset(&args.input)?;

    log::info!(
        "Loaded dataset with {} records and {} attributes",
        dataset.len(),
        dataset.attribute_count()
    );

    // 2. Build the run configuration
    let linkage: Linkage = args.linkage.parse()?;
    let num_clusters = if args.distance_threshold.is_some() {
        args.clusters
    } else {
        Some(args.clusters.unwrap_or(1))
    };
    let config = ClusterConfig {
        linkage,
        metric: args.metric.clone(),
        num_clusters,
        distance_threshold: args.distance_threshold,
    };

    // 3. Cluster
    let result = match args.algorithm.as_str() {
        "agglomerative" => AgglomerativeEngine::new(&config)?.cluster(&dataset)?,
        "divisive" => DivisiveEngine::new(&config)?.cluster(&dataset)?,
        other => {
            return Err(anyhow::anyhow!(
                "Unrecognized algorithm: {} (expected agglomerative or divisive)",
                other
            ))
        }
    };

    log::info!("Found {} clusters", result.cluster_count());
    if let Some(distance) = result.final_distance() {
        log::info!("Final merge/split distance: {}", distance);
    }

    // 4. Save results
    storage::save_results(&result, &dataset, &args.output_dir)?;

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
