//! Set-rank command handler.
//!
//! Resolves the requested rank against a fresh catalog snapshot and assigns
//! it. See [`resolve`](crate::ranks::resolve) for the matching rules.

use log::{debug, info};

use crate::{
    audit::{Action, ActionLogEntry},
    commands::{
        CommandContext, CommandError, CommandResult, actions::require_username,
        reply::format_rank_set,
    },
    ranks::{RankSpec, resolve},
    roblox::GroupApi,
};

/// Assigns the rank described by `rank` to a member.
///
/// # Errors
///
/// - No username - [`CommandError::MissingParameter`], before any API call
/// - Unknown username - [`CommandError::UserNotFound`]
/// - Nothing in the catalog matches - [`CommandError::RankResolutionError`], before any mutation
/// - Any API failure - [`CommandError::ExternalApiError`]
pub async fn handle_set_rank<G: GroupApi>(
    context: &CommandContext<'_, G>,
    username: Option<&str>,
    rank: &RankSpec,
) -> Result<CommandResult, CommandError> {
    debug!("handling setrank command: {:?} {}", username, rank);

    let username = require_username(username)?;
    let (user_id, catalog) = futures::join!(
        context.group_api.lookup_user_id(username),
        context.group_api.list_roles(context.group_id)
    );
    let user_id = user_id?;
    let catalog = catalog?;

    let target = resolve(&catalog, rank)
        .ok_or_else(|| CommandError::RankResolutionError(rank.clone()))?;

    context
        .group_api
        .set_rank(context.group_id, user_id, target)
        .await?;

    info!("set rank of {} ({}) to {}", username, user_id, target);

    Ok(CommandResult {
        reply: format_rank_set(username, target),
        entry: Some(ActionLogEntry::ranked(username, Action::SetRank, target)),
    })
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::{
        commands::actions::test_utils::{GROUP_ID, catalog, rank},
        roblox::{GroupApiError, MockGroupApi},
    };

    fn by_name(name: &str) -> RankSpec {
        RankSpec {
            by_number: None,
            by_name: Some(name.to_string()),
        }
    }

    fn by_number(number: i64) -> RankSpec {
        RankSpec {
            by_number: Some(number),
            by_name: None,
        }
    }

    fn mock_reads(group_api: &mut MockGroupApi) {
        group_api
            .expect_lookup_user_id()
            .with(eq("alice"))
            .returning(|_| Ok(77));
        group_api
            .expect_list_roles()
            .with(eq(GROUP_ID))
            .returning(|_| Ok(catalog()));
    }

    #[tokio::test]
    async fn test_handle_set_rank_by_name() {
        let mut group_api = MockGroupApi::new();
        mock_reads(&mut group_api);
        group_api
            .expect_set_rank()
            .with(eq(GROUP_ID), eq(77), eq(rank(2, "Moderator")))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let context = CommandContext {
            group_api: &group_api,
            group_id: GROUP_ID,
        };

        let result = handle_set_rank(&context, Some("alice"), &by_name("MOD"))
            .await
            .unwrap();

        assert_eq!(
            result.reply.description,
            "**alice** has been set to **Moderator** (Rank: 2)."
        );
        let entry = result.entry.unwrap();
        assert_eq!(entry.action, Action::SetRank);
        assert_eq!(entry.rank_number, Some(2));
    }

    #[tokio::test]
    async fn test_handle_set_rank_guest_rank() {
        let mut group_api = MockGroupApi::new();
        mock_reads(&mut group_api);
        group_api
            .expect_set_rank()
            .with(eq(GROUP_ID), eq(77), eq(rank(0, "Guest")))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let context = CommandContext {
            group_api: &group_api,
            group_id: GROUP_ID,
        };

        let result = handle_set_rank(&context, Some("alice"), &by_number(0))
            .await
            .unwrap();

        assert_eq!(result.entry.unwrap().rank_name.as_deref(), Some("Guest"));
    }

    #[tokio::test]
    async fn test_handle_set_rank_unmatched_rank() {
        let mut group_api = MockGroupApi::new();
        mock_reads(&mut group_api);
        group_api.expect_set_rank().times(0);
        let context = CommandContext {
            group_api: &group_api,
            group_id: GROUP_ID,
        };

        let result = handle_set_rank(&context, Some("alice"), &by_name("zzz")).await;

        assert!(matches!(result, Err(CommandError::RankResolutionError(_))));
    }

    #[tokio::test]
    async fn test_handle_set_rank_without_rank() {
        let mut group_api = MockGroupApi::new();
        mock_reads(&mut group_api);
        group_api.expect_set_rank().times(0);
        let context = CommandContext {
            group_api: &group_api,
            group_id: GROUP_ID,
        };

        let result = handle_set_rank(&context, Some("alice"), &RankSpec::default()).await;

        assert!(matches!(result, Err(CommandError::RankResolutionError(_))));
    }

    #[tokio::test]
    async fn test_handle_set_rank_without_username() {
        let group_api = MockGroupApi::new();
        let context = CommandContext {
            group_api: &group_api,
            group_id: GROUP_ID,
        };

        let result = handle_set_rank(&context, Some(" "), &by_number(2)).await;

        assert!(matches!(result, Err(CommandError::MissingParameter(_))));
    }

    #[tokio::test]
    async fn test_handle_set_rank_catalog_failure() {
        let mut group_api = MockGroupApi::new();
        group_api.expect_lookup_user_id().returning(|_| Ok(77));
        group_api
            .expect_list_roles()
            .returning(|_| Err(GroupApiError::UnexpectedPayload("roles".to_string())));
        group_api.expect_set_rank().times(0);
        let context = CommandContext {
            group_api: &group_api,
            group_id: GROUP_ID,
        };

        let result = handle_set_rank(&context, Some("alice"), &by_number(2)).await;

        assert!(matches!(result, Err(CommandError::ExternalApiError(_))));
    }
}
