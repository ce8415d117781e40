//! Core library for hierarchical cluster analysis

pub mod cluster;
pub mod config;
pub mod data;
pub mod error;
pub mod metric;
pub mod storage;

pub use anyhow::{anyhow, Result};

pub use cluster::agglomerative::AgglomerativeEngine;
pub use cluster::dendrogram::Dendrogram;
pub use cluster::divisive::DivisiveEngine;
pub use cluster::linkage::Linkage;
pub use cluster::{ClusterReport, ClusterResult};
pub use config::ClusterConfig;
pub use data::Dataset;
pub use error::ClusterError;
