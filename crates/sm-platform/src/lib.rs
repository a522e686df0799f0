//! Platform adapters: OS directories and the Bee node binary.

pub mod app_dirs;
pub mod bee;

pub use app_dirs::DirsAppDirsAdapter;
pub use bee::{BeeNodeService, BeeServiceOptions};
