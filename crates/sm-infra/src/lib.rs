pub mod chain;
pub mod preferences;

pub use chain::JsonRpcChainProber;
pub use preferences::FilePreferencesStore;
