mod project;

pub use project::Project;
#[cfg(test)]
pub use project::{Cluster, Environment, Pipelines};
