//! Command action handlers.
//!
//! Individual handler functions for each bot command. Each handler receives a
//! [`CommandContext`](crate::commands::CommandContext) or the action log,
//! processes the command, and returns a [`CommandResult`](crate::commands::CommandResult).
//!
//! # Handler Pattern
//!
//! Handlers follow a consistent pattern:
//! 1. Validate the arguments (required username, rank)
//! 2. Read what the command needs from the group API
//! 3. Perform at most one mutation
//! 4. Return a reply and the audit entry describing the mutation
//!
//! # Available Handlers
//!
//! - [`handle_help`] - Display help information
//! - [`handle_promote`] / [`handle_demote`] - Move a member one rank up or down
//! - [`handle_kick`] - Remove a member from the group
//! - [`handle_set_rank`] - Assign a resolved rank to a member
//! - [`handle_rank_info`] - List the rank catalog
//! - [`handle_rank_history`] - Recent actions on a member
//! - [`handle_audit_log`] - Recent actions in the group
//!
//! # State Changes
//!
//! Handlers never write to the action log. A mutating handler returns the entry
//! in [`CommandResult::entry`](crate::commands::CommandResult) and the dispatcher
//! records it.

mod audit_log;
mod help;
mod kick;
mod rank_history;
mod rank_info;
mod rank_step;
mod set_rank;

pub use crate::commands::actions::{
    audit_log::handle_audit_log, help::handle_help, kick::handle_kick,
    rank_history::handle_rank_history, rank_info::handle_rank_info,
    rank_step::{handle_demote, handle_promote},
    set_rank::handle_set_rank,
};
use crate::commands::CommandError;

/// Number of entries shown by `rankhistory` and `auditlog`.
pub const RECENT_ACTIONS_LIMIT: usize = 6;

/// Returns the trimmed username, or `MissingParameter` when it is absent or blank.
fn require_username(username: Option<&str>) -> Result<&str, CommandError> {
    username
        .map(str::trim)
        .filter(|username| !username.is_empty())
        .ok_or(CommandError::MissingParameter("username"))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_username() {
        assert_eq!(require_username(Some("alice")).unwrap(), "alice");
        assert_eq!(require_username(Some("  bob ")).unwrap(), "bob");
    }

    #[test]
    fn test_require_username_missing_or_blank() {
        assert!(matches!(
            require_username(None),
            Err(CommandError::MissingParameter("username"))
        ));
        assert!(matches!(
            require_username(Some("   ")),
            Err(CommandError::MissingParameter(_))
        ));
    }
}
