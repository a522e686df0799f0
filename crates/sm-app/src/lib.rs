//! Swarm Mobile application layer
//!
//! Use cases that drive the setup wizard and the node lifecycle on top of the
//! ports defined in `sm-core`.

pub mod app_paths;
pub mod deps;
pub mod usecases;

pub use app_paths::AppPaths;
pub use deps::{AppDeps, StartupSettings};
