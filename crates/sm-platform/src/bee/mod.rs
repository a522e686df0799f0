//! Bee node adapter: command line, HTTP API, process supervision and keystore.

mod api;
mod args;
mod keystore;
mod process;

pub use api::{BeeApiClient, NodeInfo};
pub use args::start_args;
pub use keystore::{read_keystore_address, KeystoreError};
pub use process::{BeeNodeService, BeeRunningNode, BeeServiceOptions};
