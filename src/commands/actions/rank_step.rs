//! Promote and demote command handlers.
//!
//! Both move a member exactly one step on the group's rank ladder. The step
//! itself (current role lookup, ladder navigation, role assignment) is done by
//! the [`GroupApi`].

use log::{debug, info};

use crate::{
    audit::{Action, ActionLogEntry},
    commands::{
        CommandContext, CommandError, CommandResult,
        actions::require_username,
        reply::{format_demoted, format_promoted},
    },
    roblox::GroupApi,
};

/// Moves a member one rank up.
///
/// # Errors
///
/// - No username - [`CommandError::MissingParameter`], before any API call
/// - Unknown username - [`CommandError::UserNotFound`]
/// - Member already at the top of the ladder, or any API failure - [`CommandError::ExternalApiError`]
pub async fn handle_promote<G: GroupApi>(
    context: &CommandContext<'_, G>,
    username: Option<&str>,
) -> Result<CommandResult, CommandError> {
    debug!("handling promote command: {:?}", username);

    let username = require_username(username)?;
    let user_id = context.group_api.lookup_user_id(username).await?;
    let change = context.group_api.promote(context.group_id, user_id).await?;

    info!(
        "promoted {} from {} to {}",
        username, change.old_role, change.new_role
    );

    Ok(CommandResult {
        reply: format_promoted(username, &change.new_role),
        entry: Some(ActionLogEntry::ranked(
            username,
            Action::Promoted,
            &change.new_role,
        )),
    })
}

/// Moves a member one rank down.
///
/// Same errors as [`handle_promote`], at the bottom of the ladder instead of the top.
pub async fn handle_demote<G: GroupApi>(
    context: &CommandContext<'_, G>,
    username: Option<&str>,
) -> Result<CommandResult, CommandError> {
    debug!("handling demote command: {:?}", username);

    let username = require_username(username)?;
    let user_id = context.group_api.lookup_user_id(username).await?;
    let change = context.group_api.demote(context.group_id, user_id).await?;

    info!(
        "demoted {} from {} to {}",
        username, change.old_role, change.new_role
    );

    Ok(CommandResult {
        reply: format_demoted(username, &change.new_role),
        entry: Some(ActionLogEntry::ranked(
            username,
            Action::Demoted,
            &change.new_role,
        )),
    })
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::{
        commands::actions::test_utils::{GROUP_ID, rank},
        roblox::{GroupApiError, MockGroupApi, RoleChange},
    };

    #[tokio::test]
    async fn test_handle_promote() {
        let mut group_api = MockGroupApi::new();
        group_api
            .expect_lookup_user_id()
            .with(eq("alice"))
            .times(1)
            .returning(|_| Ok(77));
        group_api
            .expect_promote()
            .with(eq(GROUP_ID), eq(77))
            .times(1)
            .returning(|_, _| {
                Ok(RoleChange {
                    old_role: rank(1, "Member"),
                    new_role: rank(2, "Moderator"),
                })
            });
        let context = CommandContext {
            group_api: &group_api,
            group_id: GROUP_ID,
        };

        let result = handle_promote(&context, Some("alice")).await.unwrap();

        assert_eq!(result.reply.title.as_deref(), Some("🎉 Promoted!"));
        assert!(result.reply.description.contains("**Moderator**"));
        let entry = result.entry.unwrap();
        assert_eq!(entry.username, "alice");
        assert_eq!(entry.action, Action::Promoted);
        assert_eq!(entry.rank_name.as_deref(), Some("Moderator"));
        assert_eq!(entry.rank_number, Some(2));
    }

    #[tokio::test]
    async fn test_handle_promote_without_username() {
        // No expectation: any API call fails the test
        let group_api = MockGroupApi::new();
        let context = CommandContext {
            group_api: &group_api,
            group_id: GROUP_ID,
        };

        let result = handle_promote(&context, None).await;

        assert!(matches!(result, Err(CommandError::MissingParameter(_))));
    }

    #[tokio::test]
    async fn test_handle_promote_unknown_user() {
        let mut group_api = MockGroupApi::new();
        group_api
            .expect_lookup_user_id()
            .times(1)
            .returning(|name| Err(GroupApiError::UserNotFound(name.to_string())));
        group_api.expect_promote().times(0);
        let context = CommandContext {
            group_api: &group_api,
            group_id: GROUP_ID,
        };

        let result = handle_promote(&context, Some("ghost")).await;

        assert!(matches!(result, Err(CommandError::UserNotFound(name)) if name == "ghost"));
    }

    #[tokio::test]
    async fn test_handle_demote() {
        let mut group_api = MockGroupApi::new();
        group_api
            .expect_lookup_user_id()
            .with(eq("bob"))
            .returning(|_| Ok(12));
        group_api
            .expect_demote()
            .with(eq(GROUP_ID), eq(12))
            .times(1)
            .returning(|_, _| {
                Ok(RoleChange {
                    old_role: rank(3, "Admin"),
                    new_role: rank(2, "Moderator"),
                })
            });
        let context = CommandContext {
            group_api: &group_api,
            group_id: GROUP_ID,
        };

        let result = handle_demote(&context, Some("bob")).await.unwrap();

        assert_eq!(result.reply.title.as_deref(), Some("📉 Demoted!"));
        let entry = result.entry.unwrap();
        assert_eq!(entry.action, Action::Demoted);
        assert_eq!(entry.rank_number, Some(2));
    }

    #[tokio::test]
    async fn test_handle_demote_at_ladder_bottom() {
        let mut group_api = MockGroupApi::new();
        group_api.expect_lookup_user_id().returning(|_| Ok(12));
        group_api
            .expect_demote()
            .returning(|_, _| Err(GroupApiError::LadderEnd(1)));
        let context = CommandContext {
            group_api: &group_api,
            group_id: GROUP_ID,
        };

        let result = handle_demote(&context, Some("bob")).await;

        assert!(matches!(
            result,
            Err(CommandError::ExternalApiError(GroupApiError::LadderEnd(1)))
        ));
    }
}
