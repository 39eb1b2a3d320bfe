//! CLI module
//!
//! Interactive front end: prompts, the backend selection menu, progress
//! spinners, summary tables and the flow that ties the steps together.

pub mod orchestrator;
pub mod progress;
pub mod prompt;
pub mod select_menu;
pub mod summary;

// Re-exports
pub use orchestrator::{bootstrap, Orchestrator, RunOutcome};
pub use prompt::{Prompter, TerminalPrompter};
