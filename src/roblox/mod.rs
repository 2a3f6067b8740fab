//! Roblox group management integration.
//!
//! This module wraps the Roblox users and groups web APIs behind the
//! [`GroupApi`] trait, so that command handlers can be tested against a mock.
//!
//! # Modules
//!
//! - `requester` - HTTP client and the [`GroupApi`] trait
//! - `response_structs` - Internal data structures for API payloads
//! - `structs` - Public data structures (ranks, role changes, groups)
//! - `ladder` - Navigation of the ordered rank ladder
//!
//! # Examples
//!
//! ```no_run
//! use ranker::roblox::{GroupApi, RobloxRequester};
//!
//! let requester = RobloxRequester::new(
//!     "https://users.roblox.com",
//!     "https://groups.roblox.com",
//!     "cookie",
//! );
//! let ranks = requester.list_roles(1234).await?;
//! ```

mod ladder;
mod requester;
mod response_structs;
mod structs;

use thiserror::Error;

pub use crate::roblox::requester::{GroupApi, RobloxRequester};
#[cfg(test)]
pub use crate::roblox::requester::MockGroupApi;
pub use crate::roblox::structs::{AuthenticatedUser, GroupInfo, RankDescriptor, RoleChange};

/// Errors returned by the group-management API.
#[derive(Debug, Error)]
pub enum GroupApiError {
    /// Network failure, non-success status or undecodable body.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The username does not exist.
    #[error("user '{0}' not found")]
    UserNotFound(String),
    /// The user is not a member of the managed group.
    #[error("user {0} is not a member of the group")]
    NotInGroup(u64),
    /// A promotion or demotion would leave the rank ladder.
    #[error("no rank beyond rank {0} on the ladder")]
    LadderEnd(u8),
    /// The API kept rejecting the CSRF token.
    #[error("csrf token rejected")]
    Csrf,
    /// The API answered with a payload that does not match the request.
    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),
}
