//! Kick command handler.

use log::{debug, info};

use crate::{
    audit::ActionLogEntry,
    commands::{
        CommandContext, CommandError, CommandResult, actions::require_username,
        reply::format_kicked,
    },
    roblox::GroupApi,
};

/// Removes a member from the group.
///
/// The user lookup and the group information are fetched concurrently; a
/// lookup failure is reported before a group information failure.
pub async fn handle_kick<G: GroupApi>(
    context: &CommandContext<'_, G>,
    username: Option<&str>,
) -> Result<CommandResult, CommandError> {
    debug!("handling kick command: {:?}", username);

    let username = require_username(username)?;
    let (user_id, group) = futures::join!(
        context.group_api.lookup_user_id(username),
        context.group_api.get_group_info(context.group_id)
    );
    let user_id = user_id?;
    let group = group?;

    context.group_api.exile(context.group_id, user_id).await?;

    info!("kicked {} ({}) from {}", username, user_id, group.name);

    Ok(CommandResult {
        reply: format_kicked(username, &group.name),
        entry: Some(ActionLogEntry::kicked(username)),
    })
}
