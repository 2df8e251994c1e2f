//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod classify;
mod completions;
mod config;
mod format;
mod transform;
mod utils;

pub use classify::handle_classify;
pub use completions::handle_completions;
pub use config::handle_config;
pub use format::handle_format;
pub use transform::handle_transform;

/// How a successfully handled command ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Normal completion
    Success,
    /// The command produced an error envelope for a remote failure
    Flagged,
}

impl Outcome {
    /// Process exit code for this outcome
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Flagged => 3,
        }
    }
}
