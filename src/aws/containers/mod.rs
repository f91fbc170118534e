//! Containers module - browse the containers running in a cluster

mod api;
mod commands;
mod models;

pub use commands::{run_containers_command, sort_containers};
pub use models::{Container, Task, TaskContainer};
