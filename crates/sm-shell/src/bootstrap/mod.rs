pub mod config;
pub mod run;
pub mod runtime;
pub mod settings;
pub mod tracing;
pub mod wiring;

pub use config::{load_config, load_config_or_default};
pub use run::run_app;
pub use runtime::AppRuntime;
pub use settings::RuntimeSettings;
