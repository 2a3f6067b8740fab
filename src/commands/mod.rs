//! Bot command parsing, dispatch and replies.
//!
//! This module provides the complete command processing pipeline of the bot,
//! letting group moderators change the rank of members from a Matrix room.
//!
//! # Overview
//!
//! 1. **Parsing** - Converting Matrix messages into structured [`Command`] enums
//! 2. **Validation** - Required usernames, rank resolution for `setrank`
//! 3. **Execution** - Exactly one group mutation per mutating command
//! 4. **Auditing** - Recording successful mutations in the [`ActionLog`](crate::audit::ActionLog)
//! 5. **Response** - Exactly one [`Reply`] per command, success or failure
//!
//! # Architecture
//!
//! ```text
//! Matrix Message
//!      │
//!      ▼
//! ┌─────────────┐
//! │ Dispatcher  │  ← Entry point: parse() + dispatch()
//! └─────────────┘
//!      │
//!      ├── parse() ──────────────► Command
//!      │
//!      └── dispatch() ──► handlers ──► CommandResult ──► record entry ──► Reply
//!                             │
//!                             └── Err(CommandError) ──────────────────► failure Reply
//! ```
//!
//! # Available Commands
//!
//! | Command | Arguments | Description |
//! |---------|-----------|-------------|
//! | `promote` | `<username>` | Move a member one rank up |
//! | `demote` | `<username>` | Move a member one rank down |
//! | `kick` | `<username>` | Remove a member from the group |
//! | `setrank` | `<username> [rankname=<name>] [ranknumber=<n>]` | Set the rank of a member |
//! | `rankinfo` | None | List the ranks of the group |
//! | `rankhistory` | `<username>` | Last 6 actions on a member |
//! | `auditlog` | None | Last 6 actions in the group |
//! | `help` | None | Display help information |
//!
//! # Error Handling
//!
//! - **Silent Errors** ([`CommandParseError::NotForBot`]): messages that are not
//!   commands or are for a different bot. No reply is sent.
//! - **User Errors** ([`CommandParseError::InvalidCommand`]): unknown command or
//!   invalid syntax, answered with a usage reply.
//! - **Command Errors** ([`CommandError`]): failures while executing a command,
//!   logged in full and answered with a short failure reply.

use chrono::{DateTime, Utc};
use thiserror::Error;

mod actions;
mod command;
mod dispatcher;
mod reply;

pub use crate::commands::command::Command;
pub use crate::commands::dispatcher::Dispatcher;
use crate::{
    audit::ActionLogEntry,
    ranks::RankSpec,
    roblox::{GroupApi, GroupApiError},
};

/// Runtime context for command execution.
///
/// Gives handlers access to the group-management API and the managed group.
pub struct CommandContext<'a, G: GroupApi> {
    /// Group-management API
    pub group_api: &'a G,
    /// Id of the managed Roblox group
    pub group_id: u64,
}

/// Structured reply to a command.
///
/// Rendering (Markdown, colors) is left to the chat client.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Optional heading
    pub title: Option<String>,
    /// Markdown body
    pub description: String,
    /// RGB color, e.g. `0x00ff00`
    pub color: u32,
    /// Whether the reply is meant for the invoker only
    pub ephemeral: bool,
    /// When the reply was produced
    pub timestamp: DateTime<Utc>,
}

impl Reply {
    /// A reply visible to everyone in the room.
    pub fn public(title: &str, description: String, color: u32) -> Self {
        Reply {
            title: Some(title.to_owned()),
            description,
            color,
            ephemeral: false,
            timestamp: Utc::now(),
        }
    }

    /// A reply meant for the invoker only.
    pub fn ephemeral(description: String, color: u32) -> Self {
        Reply {
            title: None,
            description,
            color,
            ephemeral: true,
            timestamp: Utc::now(),
        }
    }
}

/// Result of command execution.
///
/// Handlers don't write to the action log. A mutating handler returns the
/// entry describing what it did and the dispatcher records it.
#[derive(Debug)]
pub struct CommandResult {
    /// Reply to send to the room
    pub reply: Reply,
    /// Entry to record in the action log
    pub entry: Option<ActionLogEntry>,
}

impl CommandResult {
    /// Result of a command that changed nothing.
    pub fn read_only(reply: Reply) -> Self {
        CommandResult { reply, entry: None }
    }
}

/// Errors that can occur while executing a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A required parameter was not supplied.
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),
    /// The username does not resolve to a Roblox account.
    #[error("user '{0}' not found")]
    UserNotFound(String),
    /// Neither the rank number nor the rank name match the catalog.
    #[error("no rank matches {0}")]
    RankResolutionError(RankSpec),
    /// A read or a mutation of the group-management API failed.
    #[error("group API call failed: {0}")]
    ExternalApiError(#[source] GroupApiError),
}

impl From<GroupApiError> for CommandError {
    fn from(error: GroupApiError) -> Self {
        match error {
            GroupApiError::UserNotFound(username) => CommandError::UserNotFound(username),
            error => CommandError::ExternalApiError(error),
        }
    }
}

/// Errors that can occur during command parsing.
///
/// * `NotForBot` - Message is not a command or is for a different bot.
///   Should be handled silently without responding to the user.
/// * `InvalidCommand` - Command syntax or arguments are invalid.
///   Contains the usage reply to send.
#[derive(Debug)]
pub enum CommandParseError {
    /// Message is not for this bot (silent error)
    NotForBot,
    /// Invalid command syntax with the reply to send
    InvalidCommand(Reply),
}
