//! Rank history command handler.

use log::debug;

use crate::{
    audit::ActionLog,
    commands::{
        CommandError, CommandResult,
        actions::{RECENT_ACTIONS_LIMIT, require_username},
        reply::format_rank_history,
    },
};

/// Shows the most recent actions on one member, newest first.
///
/// Reads the action log only; the log is never modified.
pub fn handle_rank_history(
    action_log: &ActionLog,
    username: Option<&str>,
) -> Result<CommandResult, CommandError> {
    debug!("handling rankhistory command: {:?}", username);

    let username = require_username(username)?;
    let entries = action_log.recent_for_user(username, RECENT_ACTIONS_LIMIT);

    Ok(CommandResult::read_only(format_rank_history(
        username, &entries,
    )))
}
