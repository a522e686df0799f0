mod context;
mod orchestrator;

pub use context::SetupContext;
pub use orchestrator::SetupOrchestrator;
