//! Clusters module - list clusters and mark the active selection

mod api;
mod commands;
mod models;

pub use commands::run_clusters_command;
pub use models::Cluster;
