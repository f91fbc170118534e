//! Output formatting for browse commands
//!
//! Each resource has its own formatter supporting table, CSV, JSON and
//! YAML. Tables are for humans; the other formats keep stable field
//! names for scripting.

mod clusters;
mod common;
mod containers;
mod instances;

pub use clusters::output_clusters;
pub use common::escape_csv;
pub use containers::output_containers;
pub use instances::output_instances;
