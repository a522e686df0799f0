//! Swarm Mobile terminal shell.
//!
//! Composition root: loads deployment configuration, installs tracing, wires
//! the infra and platform adapters into the use cases and drives them from a
//! line-oriented terminal.

pub mod adapters;
pub mod bootstrap;

pub use bootstrap::{load_config_or_default, run_app};
