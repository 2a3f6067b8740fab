//! Command orchestration and execution.
//!
//! This module provides the [`Dispatcher`] struct, which serves as the main entry point
//! for processing bot commands. It parses messages, routes commands to their handler,
//! records successful mutations in the action log and turns every outcome into a reply.
//!
//! # Flow
//!
//! ```text
//! Matrix Message → parse() → Command → dispatch() → handler → Reply
//!                                                      │
//!                                                      └── entry → ActionLog
//! ```
//!
//! # Examples
//!
//! ```no_run
//! let requester = RobloxRequester::new(USERS_URL, GROUPS_URL, "cookie");
//! let dispatcher = Dispatcher::new("ranker", requester, 4242);
//!
//! let command = dispatcher.parse("!ranker promote alice")?;
//! let reply = dispatcher.dispatch(&command).await;
//! ```

use command_parser::Parser;
use log::{debug, error, info};
use tokio::sync::Mutex;

use crate::{
    audit::ActionLog,
    commands::{
        CommandContext, CommandError, CommandParseError, CommandResult, Reply,
        actions::{
            handle_audit_log, handle_demote, handle_help, handle_kick, handle_promote,
            handle_rank_history, handle_rank_info, handle_set_rank,
        },
        command::{Command, format_command_error},
        reply::format_command_failure,
    },
    roblox::GroupApi,
};

/// Command orchestrator for parsing and executing bot commands.
///
/// The Dispatcher owns the [`ActionLog`] for the whole process lifetime. The log
/// sits behind a mutex: several commands can be in flight at once, and each
/// `record` happens entirely under the lock.
///
/// # Command Prefix
///
/// All commands must start with `!<bot_name>`. Other messages are silently
/// ignored (returning [`CommandParseError::NotForBot`]).
pub struct Dispatcher<G: GroupApi> {
    /// Command parser for processing user commands
    parser: Parser,
    /// Command name the bot answers to
    bot_name: String,
    /// Group-management API
    group_api: G,
    /// Id of the managed Roblox group
    group_id: u64,
    /// Audit trail of successful mutations
    action_log: Mutex<ActionLog>,
}

impl<G: GroupApi> Dispatcher<G> {
    /// Creates a new Dispatcher with an empty action log.
    ///
    /// The parser is configured to recognize commands starting with `!` as the command
    /// prefix and `-` as the option prefix.
    pub fn new(bot_name: &str, group_api: G, group_id: u64) -> Self {
        Dispatcher {
            parser: Parser::new('!', '-'),
            bot_name: bot_name.to_owned(),
            group_api,
            group_id,
            action_log: Mutex::new(ActionLog::new()),
        }
    }

    /// Parses a Matrix message body into a structured command.
    ///
    /// # Returns
    ///
    /// * `Ok(Command)` - Successfully parsed and validated command
    /// * `Err(CommandParseError::NotForBot)` - Message is not a command or for a different bot
    /// * `Err(CommandParseError::InvalidCommand)` - Unknown command or invalid setrank syntax
    pub fn parse(&self, body: &str) -> Result<Command, CommandParseError> {
        Command::parse(&self.parser, &self.bot_name, body).map_err(|error| {
            match format_command_error(error, &self.bot_name) {
                Some(reply) => CommandParseError::InvalidCommand(reply),
                None => CommandParseError::NotForBot,
            }
        })
    }

    /// Executes a parsed command and returns its reply.
    ///
    /// Exactly one reply is produced for every command. The audit entry of a
    /// mutating command is recorded only when the mutation succeeded. Failures
    /// are logged in full and answered with a short failure reply.
    pub async fn dispatch(&self, command: &Command) -> Reply {
        debug!("dispatching command {:?}", command);

        match self.execute(command).await {
            Ok(CommandResult { reply, entry }) => {
                if let Some(entry) = entry {
                    info!("recording action {}", entry);
                    self.action_log.lock().await.record(entry);
                }
                reply
            }
            Err(err) => {
                error!(
                    "could not {} {}: {}",
                    command.name(),
                    command.username().unwrap_or_default(),
                    err
                );
                format_command_failure(command, &err)
            }
        }
    }

    async fn execute(&self, command: &Command) -> Result<CommandResult, CommandError> {
        let context = CommandContext {
            group_api: &self.group_api,
            group_id: self.group_id,
        };

        match command {
            Command::Help => Ok(handle_help(&self.bot_name)),
            Command::Promote { username } => handle_promote(&context, username.as_deref()).await,
            Command::Demote { username } => handle_demote(&context, username.as_deref()).await,
            Command::Kick { username } => handle_kick(&context, username.as_deref()).await,
            Command::SetRank { username, rank } => {
                handle_set_rank(&context, username.as_deref(), rank).await
            }
            Command::RankInfo => handle_rank_info(&context).await,
            Command::RankHistory { username } => {
                let action_log = self.action_log.lock().await;
                handle_rank_history(&action_log, username.as_deref())
            }
            Command::AuditLog => {
                let action_log = self.action_log.lock().await;
                Ok(handle_audit_log(&action_log))
            }
        }
    }

    #[cfg(test)]
    async fn action_log_len(&self) -> usize {
        self.action_log.lock().await.len()
    }
}
