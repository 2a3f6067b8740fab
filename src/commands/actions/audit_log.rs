//! Audit log command handler.

use log::debug;

use crate::{
    audit::ActionLog,
    commands::{
        CommandResult, actions::RECENT_ACTIONS_LIMIT, reply::format_audit_log,
    },
};

/// Shows the most recent actions in the group, newest first.
pub fn handle_audit_log(action_log: &ActionLog) -> CommandResult {
    debug!("handling auditlog command");

    let entries = action_log.recent_global(RECENT_ACTIONS_LIMIT);

    CommandResult::read_only(format_audit_log(&entries))
}
