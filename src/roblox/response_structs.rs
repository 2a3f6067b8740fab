//! Response structures for the Roblox web API.
//!
//! These mirror the JSON payloads of the users and groups endpoints and are
//! converted into the public structures of [`crate::roblox`] by the requester.

use serde::{Deserialize, Serialize};

use crate::roblox::structs::{AuthenticatedUser, GroupInfo, RankDescriptor};

/// Body of `POST /v1/usernames/users`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UsernamesRequest<'a> {
    pub usernames: [&'a str; 1],
    pub exclude_banned_users: bool,
}

/// Response of `POST /v1/usernames/users`.
///
/// `data` is empty when the username does not exist.
#[derive(Deserialize, Debug)]
pub struct UsernamesResponse {
    pub data: Vec<UserResponse>,
}

/// A user entry from the users API.
#[derive(Deserialize, Debug)]
pub struct UserResponse {
    pub id: u64,
    pub name: String,
}

impl From<UserResponse> for AuthenticatedUser {
    fn from(user: UserResponse) -> Self {
        AuthenticatedUser {
            id: user.id,
            name: user.name,
        }
    }
}

/// Response of `GET /v1/groups/{groupId}/roles`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RolesResponse {
    pub group_id: u64,
    pub roles: Vec<RoleResponse>,
}

/// A role as returned by the groups API.
#[derive(Deserialize, Debug, Clone)]
pub struct RoleResponse {
    pub id: u64,
    pub name: String,
    pub rank: u8,
}

impl From<RoleResponse> for RankDescriptor {
    fn from(role: RoleResponse) -> Self {
        RankDescriptor {
            id: role.id,
            rank: role.rank,
            name: role.name,
        }
    }
}

/// Response of `GET /v1/groups/{groupId}`.
#[derive(Deserialize, Debug)]
pub struct GroupResponse {
    pub id: u64,
    pub name: String,
}

impl From<GroupResponse> for GroupInfo {
    fn from(group: GroupResponse) -> Self {
        GroupInfo {
            id: group.id,
            name: group.name,
        }
    }
}

/// Response of `GET /v2/users/{userId}/groups/roles`.
#[derive(Deserialize, Debug)]
pub struct UserGroupRolesResponse {
    pub data: Vec<UserGroupRole>,
}

/// Membership of a user in one group.
#[derive(Deserialize, Debug)]
pub struct UserGroupRole {
    pub group: GroupResponse,
    pub role: RoleResponse,
}

/// Body of `PATCH /v1/groups/{groupId}/users/{userId}`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SetRoleRequest {
    pub role_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_roles_response() {
        let body = r#"{"groupId": 7, "roles": [{"id": 1, "name": "Guest", "rank": 0, "memberCount": 0}, {"id": 2, "name": "Member", "rank": 1, "memberCount": 42}]}"#;
        let response: RolesResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.group_id, 7);
        assert_eq!(response.roles.len(), 2);
        let member: RankDescriptor = response.roles[1].clone().into();
        assert_eq!(
            member,
            RankDescriptor {
                id: 2,
                rank: 1,
                name: "Member".to_string()
            }
        );
    }

    #[test]
    fn test_serialize_usernames_request() {
        let request = UsernamesRequest {
            usernames: ["alice"],
            exclude_banned_users: false,
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"usernames":["alice"],"excludeBannedUsers":false}"#
        );
    }

    #[test]
    fn test_serialize_set_role_request() {
        let request = SetRoleRequest { role_id: 99 };
        assert_eq!(serde_json::to_string(&request).unwrap(), r#"{"roleId":99}"#);
    }

    #[test]
    fn test_deserialize_user_group_roles() {
        let body = r#"{"data": [{"group": {"id": 7, "name": "Test Group", "memberCount": 3}, "role": {"id": 3, "name": "Moderator", "rank": 2}}]}"#;
        let response: UserGroupRolesResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.data[0].group.id, 7);
        assert_eq!(response.data[0].role.rank, 2);
    }
}
