//! HTTP client for the Roblox users and groups APIs.
//!
//! This module provides the [`GroupApi`] trait consumed by the command
//! handlers and its [`RobloxRequester`] implementation.

use futures::join;
use log::{debug, info};
use mockall::automock;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header::COOKIE};
use tokio::sync::Mutex;

use crate::roblox::{
    GroupApiError,
    ladder::adjacent_role,
    response_structs::{
        GroupResponse, RolesResponse, SetRoleRequest, UserGroupRolesResponse, UserResponse,
        UsernamesRequest, UsernamesResponse,
    },
    structs::{AuthenticatedUser, GroupInfo, RankDescriptor, RoleChange, Step},
};

/// Header carrying the anti-forgery token required by mutating endpoints.
const CSRF_HEADER: &str = "x-csrf-token";

/// Operations on a Roblox group.
///
/// Read operations are free of side effects. `promote`, `demote`, `set_rank`
/// and `exile` each perform exactly one mutation of the group roster.
#[automock]
pub trait GroupApi {
    /// Resolves a username to its Roblox user id.
    async fn lookup_user_id(&self, username: &str) -> Result<u64, GroupApiError>;
    /// Fetches the rank catalog of a group, in the API's order.
    async fn list_roles(&self, group_id: u64) -> Result<Vec<RankDescriptor>, GroupApiError>;
    /// Fetches the name of a group.
    async fn get_group_info(&self, group_id: u64) -> Result<GroupInfo, GroupApiError>;
    /// Moves a member one step up the rank ladder.
    async fn promote(&self, group_id: u64, user_id: u64) -> Result<RoleChange, GroupApiError>;
    /// Moves a member one step down the rank ladder.
    async fn demote(&self, group_id: u64, user_id: u64) -> Result<RoleChange, GroupApiError>;
    /// Assigns a role to a member.
    async fn set_rank(
        &self,
        group_id: u64,
        user_id: u64,
        role: &RankDescriptor,
    ) -> Result<(), GroupApiError>;
    /// Removes a member from the group.
    async fn exile(&self, group_id: u64, user_id: u64) -> Result<(), GroupApiError>;
    /// Returns the account the requester is authenticated as.
    async fn authenticated_user(&self) -> Result<AuthenticatedUser, GroupApiError>;
}

/// HTTP client for the Roblox web API.
///
/// Mutations are authenticated with the `.ROBLOSECURITY` cookie and go through
/// the CSRF handshake: the first rejected request hands out a token which is
/// kept for the following ones.
///
/// # Examples
///
/// ```no_run
/// let requester = RobloxRequester::new("https://users.roblox.com", "https://groups.roblox.com", "cookie");
/// let user_id = requester.lookup_user_id("alice").await?;
/// ```
pub struct RobloxRequester {
    /// Base url of the users API
    users_url: String,
    /// Base url of the groups API
    groups_url: String,
    /// Value of the `.ROBLOSECURITY` cookie
    cookie: String,
    /// Last CSRF token handed out by the API
    csrf_token: Mutex<Option<String>>,
    /// HTTP client
    client: Client,
}

impl RobloxRequester {
    /// Create a new [RobloxRequester].
    ///
    /// # Arguments
    ///
    /// * `users_url` - Base URL of the users API, without trailing slash.
    /// * `groups_url` - Base URL of the groups API, without trailing slash.
    /// * `cookie` - The `.ROBLOSECURITY` cookie of the bot account.
    pub fn new(users_url: &str, groups_url: &str, cookie: &str) -> Self {
        RobloxRequester {
            users_url: users_url.trim_end_matches('/').to_string(),
            groups_url: groups_url.trim_end_matches('/').to_string(),
            cookie: cookie.to_string(),
            csrf_token: Mutex::new(None),
            client: Client::new(),
        }
    }

    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(COOKIE, format!(".ROBLOSECURITY={}", self.cookie))
    }

    /// Sends a mutating request, retrying once if the API hands out a new CSRF token.
    async fn send_mutation<F>(&self, build: F) -> Result<Response, GroupApiError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        for _ in 0..2 {
            let token = self.csrf_token.lock().await.clone();
            let mut request = self.authenticate(build(&self.client));
            if let Some(token) = token {
                request = request.header(CSRF_HEADER, token);
            }

            let response = request.send().await?;

            if response.status() == StatusCode::FORBIDDEN {
                let new_token = response
                    .headers()
                    .get(CSRF_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_owned);
                if let Some(new_token) = new_token {
                    debug!("csrf token refreshed, retrying request");
                    *self.csrf_token.lock().await = Some(new_token);
                    continue;
                }
            }

            return Ok(response.error_for_status()?);
        }

        Err(GroupApiError::Csrf)
    }

    /// Request `/v2/users/{userId}/groups/roles` and keep the role held in `group_id`.
    async fn get_member_role(
        &self,
        group_id: u64,
        user_id: u64,
    ) -> Result<RankDescriptor, GroupApiError> {
        let url = format!("{}/v2/users/{}/groups/roles", &self.groups_url, user_id);
        debug!("request {}", &url);

        let response: UserGroupRolesResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .data
            .into_iter()
            .find(|membership| membership.group.id == group_id)
            .map(|membership| membership.role.into())
            .ok_or(GroupApiError::NotInGroup(user_id))
    }

    /// Moves a member one step on the ladder with a single role assignment.
    async fn change_rank(
        &self,
        group_id: u64,
        user_id: u64,
        step: Step,
    ) -> Result<RoleChange, GroupApiError> {
        let (old_role, catalog) = join!(
            self.get_member_role(group_id, user_id),
            self.list_roles(group_id)
        );
        let old_role = old_role?;
        let catalog = catalog?;

        let new_role = adjacent_role(&catalog, old_role.rank, step)
            .cloned()
            .ok_or(GroupApiError::LadderEnd(old_role.rank))?;

        self.set_rank(group_id, user_id, &new_role).await?;

        Ok(RoleChange { old_role, new_role })
    }
}

impl GroupApi for RobloxRequester {
    /// Request `POST /v1/usernames/users` with a single username.
    ///
    /// The API answers with an empty `data` array for unknown usernames:
    /// ```
    /// { "data": [{ "requestedUsername": "alice", "id": 1234, "name": "Alice", "displayName": "Alice" }] }
    /// ```
    async fn lookup_user_id(&self, username: &str) -> Result<u64, GroupApiError> {
        let url = format!("{}/v1/usernames/users", &self.users_url);
        debug!("request {} for {}", &url, username);

        let response: UsernamesResponse = self
            .client
            .post(&url)
            .json(&UsernamesRequest {
                usernames: [username],
                exclude_banned_users: false,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("response from {} -> {:?}", &url, &response);

        response
            .data
            .first()
            .map(|user| user.id)
            .ok_or_else(|| GroupApiError::UserNotFound(username.to_string()))
    }

    /// Request `/v1/groups/{groupId}/roles`.
    async fn list_roles(&self, group_id: u64) -> Result<Vec<RankDescriptor>, GroupApiError> {
        let url = format!("{}/v1/groups/{}/roles", &self.groups_url, group_id);
        debug!("request {}", &url);

        let response: RolesResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.group_id != group_id {
            return Err(GroupApiError::UnexpectedPayload(format!(
                "roles of group {} returned for group {}",
                response.group_id, group_id
            )));
        }

        Ok(response.roles.into_iter().map(Into::into).collect())
    }

    /// Request `/v1/groups/{groupId}`.
    async fn get_group_info(&self, group_id: u64) -> Result<GroupInfo, GroupApiError> {
        let url = format!("{}/v1/groups/{}", &self.groups_url, group_id);
        debug!("request {}", &url);

        let group: GroupResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(group.into())
    }

    async fn promote(&self, group_id: u64, user_id: u64) -> Result<RoleChange, GroupApiError> {
        self.change_rank(group_id, user_id, Step::Up).await
    }

    async fn demote(&self, group_id: u64, user_id: u64) -> Result<RoleChange, GroupApiError> {
        self.change_rank(group_id, user_id, Step::Down).await
    }

    /// Request `PATCH /v1/groups/{groupId}/users/{userId}` with `{ "roleId": id }`.
    async fn set_rank(
        &self,
        group_id: u64,
        user_id: u64,
        role: &RankDescriptor,
    ) -> Result<(), GroupApiError> {
        let url = format!("{}/v1/groups/{}/users/{}", &self.groups_url, group_id, user_id);
        info!("set role {} for user {} in group {}", role, user_id, group_id);

        let body = SetRoleRequest { role_id: role.id };
        self.send_mutation(|client| client.patch(&url).json(&body))
            .await?;

        Ok(())
    }

    /// Request `DELETE /v1/groups/{groupId}/users/{userId}`.
    async fn exile(&self, group_id: u64, user_id: u64) -> Result<(), GroupApiError> {
        let url = format!("{}/v1/groups/{}/users/{}", &self.groups_url, group_id, user_id);
        info!("exile user {} from group {}", user_id, group_id);

        self.send_mutation(|client| client.delete(&url)).await?;

        Ok(())
    }

    /// Request `/v1/users/authenticated` with the account cookie.
    async fn authenticated_user(&self) -> Result<AuthenticatedUser, GroupApiError> {
        let url = format!("{}/v1/users/authenticated", &self.users_url);
        debug!("request {}", &url);

        let user: UserResponse = self
            .authenticate(self.client.get(&url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(user.into())
    }
}
