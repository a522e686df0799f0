//! Use cases
//!
//! [Resume] ── complete saved config ──▶ [Startup] ──▶ NodeSession ──▶ [StatusPoller]
//!    │                                      ▲
//!    └── otherwise ──▶ [Setup wizard] ──────┘

pub mod resume;
pub mod setup;
pub mod startup;
pub mod status_poller;

pub use resume::{ResumeFromSavedConfig, ResumeOutcome};
pub use setup::{SetupContext, SetupOrchestrator};
pub use startup::{
    LoadSavedConfig, NodeSession, PersistConfig, PersistConfigError, StartupOrchestrator,
    StartupOutcome,
};
pub use status_poller::{NodeStatusSnapshot, StatusPoller};
