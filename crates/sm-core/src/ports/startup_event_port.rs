use crate::startup::StartupPhase;

#[async_trait::async_trait]
pub trait StartupEventPort: Send + Sync {
    async fn emit_startup_phase(&self, phase: StartupPhase);
}
