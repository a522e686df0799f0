//! Terminal adapters: event printers, line prompts and the wizard driver.

pub mod console;
pub mod prompt;
pub mod terminal;
pub mod wizard;

pub use console::Console;
pub use prompt::{Answer, Prompter};
pub use terminal::TerminalEvents;
pub use wizard::drive_wizard;
