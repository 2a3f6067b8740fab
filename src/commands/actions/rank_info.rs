//! Rank info command handler.

use log::debug;

use crate::{
    commands::{CommandContext, CommandError, CommandResult, reply::format_rank_list},
    roblox::GroupApi,
};

/// Lists the rank catalog of the group, sorted by ascending rank number.
///
/// This command is read-only.
pub async fn handle_rank_info<G: GroupApi>(
    context: &CommandContext<'_, G>,
) -> Result<CommandResult, CommandError> {
    debug!("handling rankinfo command");

    let mut ranks = context.group_api.list_roles(context.group_id).await?;
    ranks.sort_by_key(|rank| rank.rank);

    Ok(CommandResult::read_only(format_rank_list(&ranks)))
}
