use std::sync::Arc;

use tokio::sync::Mutex;

use sm_core::setup::SetupState;
use sm_core::NodeConfig;

/// Shared wizard context: current state, the configuration being collected
/// and the dispatch lock.
///
/// ## Lock Ordering
/// Acquire `dispatch_lock` first, then `state` or `config`. Never hold
/// `state` and `config` at the same time.
pub struct SetupContext {
    state: Mutex<SetupState>,
    config: Mutex<NodeConfig>,
    /// Serializes dispatch calls so one step's mutation completes before the
    /// next event is processed.
    dispatch_lock: Mutex<()>,
}

impl SetupContext {
    pub fn new(initial_state: SetupState, config: NodeConfig) -> Self {
        Self {
            state: Mutex::new(initial_state),
            config: Mutex::new(config),
            dispatch_lock: Mutex::new(()),
        }
    }

    /// Fresh wizard at `Password` for the given configuration.
    pub fn starting_with(config: NodeConfig) -> Self {
        Self::new(SetupState::initial(), config)
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Does NOT acquire `dispatch_lock`, so it can observe in-flight states.
    pub async fn get_state(&self) -> SetupState {
        self.state.lock().await.clone()
    }

    pub async fn acquire_dispatch_lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    /// Only call while holding `dispatch_lock`.
    pub async fn set_state(&self, state: SetupState) {
        *self.state.lock().await = state;
    }

    /// Moves the configuration out for a transition. Only call while holding
    /// `dispatch_lock` and put it back with [`SetupContext::put_config`].
    pub async fn take_config(&self) -> NodeConfig {
        std::mem::take(&mut *self.config.lock().await)
    }

    pub async fn put_config(&self, config: NodeConfig) {
        *self.config.lock().await = config;
    }

    /// A copy of the configuration collected so far.
    pub async fn config_snapshot(&self) -> NodeConfig {
        self.config.lock().await.duplicate()
    }
}
