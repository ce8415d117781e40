//! Results persistence module

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, to_string_pretty};

use crate::cluster::ClusterResult;
use crate::data::Dataset;

/// Save clustering results to the specified directory
pub fn save_results(result: &ClusterResult, dataset: &Dataset, output_dir: &str) -> Result<()> {
    log::info!("Saving {} clusters to {}", result.cluster_count(), output_dir);

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    save_summary(result, dataset, output_dir)?;
    save_clusters(result, dataset, output_dir)?;
    save_history(result, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save summary information
fn save_summary(result: &ClusterResult, dataset: &Dataset, output_dir: &str) -> Result<()> {
    log::info!("Saving summary information");

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let report = result.report();
    let summary = json!({
        "dataset": {
            "record_count": dataset.len(),
            "attribute_count": dataset.attribute_count(),
            "attributes": dataset.labels,
        },
        "cluster_stats": {
            "cluster_count": report.cluster_count,
            "member_counts": report.member_counts,
            "largest_cluster_size": report.member_counts.iter().max().copied().unwrap_or(0),
            "smallest_cluster_size": report.member_counts.iter().min().copied().unwrap_or(0),
            "final_distance": report.final_distance,
            "supports_assignment": result.supports_assignment(),
        }
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save individual cluster information
fn save_clusters(result: &ClusterResult, dataset: &Dataset, output_dir: &str) -> Result<()> {
    log::info!("Saving individual cluster information");

    // Create clusters directory
    let clusters_dir = Path::new(output_dir).join("clusters");
    fs::create_dir_all(&clusters_dir)?;

    let partitions = result.split_dataset(dataset)?;

    // Create a JSON file for each cluster
    for (id, (members, partition)) in result.clusters().iter().zip(&partitions).enumerate() {
        let path = clusters_dir.join(format!("cluster_{}.json", id));
        let mut file = File::create(path)?;

        let cluster_json = json!({
            "id": id,
            "size": members.len(),
            "members": members,
            "labels": partition.labels,
            "records": partition.records,
        });

        file.write_all(to_string_pretty(&cluster_json)?.as_bytes())?;
    }

    // Create a JSON file with all clusters
    let all_clusters_path = Path::new(output_dir).join("all_clusters.json");
    let mut all_clusters_file = File::create(all_clusters_path)?;

    let clusters_json = json!({
        "clusters": result.clusters().iter().enumerate().map(|(id, members)| {
            json!({
                "id": id,
                "size": members.len(),
            })
        }).collect::<Vec<_>>()
    });

    all_clusters_file.write_all(to_string_pretty(&clusters_json)?.as_bytes())?;

    Ok(())
}

/// Save the merge or split history for reporting collaborators
fn save_history(result: &ClusterResult, output_dir: &str) -> Result<()> {
    log::info!("Saving clustering history");

    let path = Path::new(output_dir).join("history.json");
    let mut file = File::create(path)?;

    let history = match result.dendrogram() {
        Some(dendrogram) => json!({
            "kind": "agglomerative",
            "heights": dendrogram.heights(),
            "merges": dendrogram.steps(),
        }),
        None => json!({
            "kind": "divisive",
            "splits": result.split_history(),
        }),
    };

    file.write_all(to_string_pretty(&history)?.as_bytes())?;

    Ok(())
}
