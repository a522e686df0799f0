//! Setup wizard domain module.
//!
//! The wizard is a pure state machine: [`SetupStateMachine::transition`] maps
//! `(state, config, event)` to the next state, the updated configuration and
//! the side effects the orchestrator has to run.

mod action;
mod error;
mod event;
mod state;
pub mod state_machine;

pub use action::{SetupAction, SetupNotice};
pub use error::SetupError;
pub use event::SetupEvent;
pub use state::SetupState;
pub use state_machine::SetupStateMachine;
