//! Help command handler.
//!
//! Lists the available commands and their syntax. This is a stateless command
//! that always returns the same help message.

use log::debug;

use crate::commands::{CommandResult, reply::format_help};

/// Returns formatted help information about available commands.
///
/// This command is read-only and never records an audit entry.
pub fn handle_help(bot_name: &str) -> CommandResult {
    debug!("handling help command");

    CommandResult::read_only(format_help(bot_name))
}
