use crate::setup::{SetupNotice, SetupState};

#[async_trait::async_trait]
pub trait SetupEventPort: Send + Sync {
    async fn emit_setup_state_changed(&self, state: SetupState);

    async fn emit_setup_notice(&self, notice: SetupNotice);
}
