mod orchestrator;
mod persist;
mod session;

pub use orchestrator::{StartupOrchestrator, StartupOutcome};
pub use persist::{LoadSavedConfig, PersistConfig, PersistConfigError};
pub use session::NodeSession;

#[cfg(test)]
pub(crate) use orchestrator::test_support;
