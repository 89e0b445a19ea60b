//! Clustering engine
//!
//! Maps (records, zoom) to a partition of clusters and singletons.

pub mod partition;
pub mod greedy;

pub use partition::{Cluster, ClusterId, ClusterPartition, Singleton};
pub use greedy::{cluster, cluster_with};
