//! Command parsing and handling.
//!
//! This module converts Matrix message text into structured [`Command`] enums
//! that the dispatcher routes to their handler.

use command_parser::{Command as ParserCommand, Parser};
use log::debug;

use crate::{
    commands::{
        Reply,
        reply::{format_invalid_set_rank, format_unknown_command},
    },
    ranks::RankSpec,
};

/// Represents a parsed bot command.
///
/// Usernames are optional at parse time: a missing username is reported by
/// the dispatcher as a failed command rather than as a syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Display help information
    Help,
    /// Move a member one rank up
    Promote { username: Option<String> },
    /// Move a member one rank down
    Demote { username: Option<String> },
    /// Remove a member from the group
    Kick { username: Option<String> },
    /// Assign a rank to a member
    SetRank {
        username: Option<String>,
        rank: RankSpec,
    },
    /// List the ranks of the group
    RankInfo,
    /// Recent actions on a member
    RankHistory { username: Option<String> },
    /// Recent actions in the group
    AuditLog,
}

/// Errors that can occur during command parsing.
#[derive(Debug)]
pub enum CommandParsingError {
    /// The message could not be parsed as a command
    UnableToParse,
    /// The command is for another bot
    NotForBot,
    /// The command is not recognized
    Unknown,
    /// The setrank command has an invalid or conflicting rank
    InvalidSetRank,
}

impl Command {
    /// Parses a message string into a Command.
    ///
    /// # Arguments
    ///
    /// * `parser` - The command parser instance
    /// * `bot_name` - Command name the bot answers to (`!<bot_name> ...`)
    /// * `body` - The message text to parse
    ///
    /// # Errors
    ///
    /// - The message is not a command - [`CommandParsingError::UnableToParse`]
    /// - The command is for a different bot - [`CommandParsingError::NotForBot`]
    /// - The command is not recognized - [`CommandParsingError::Unknown`]
    /// - The setrank rank is invalid or given twice - [`CommandParsingError::InvalidSetRank`]
    ///
    /// # Examples
    ///
    /// ```
    /// let parser = Parser::new('!', '-');
    /// let command = Command::parse(&parser, "ranker", "!ranker promote alice");
    /// assert!(command.is_ok());
    /// ```
    pub fn parse(parser: &Parser, bot_name: &str, body: &str) -> Result<Self, CommandParsingError> {
        // The parser drops the last word of the message, pad it with a dummy one
        let body = body.to_string() + " dummy";

        // Failing is expected for regular chat messages
        let command = match parser.parse(&body) {
            Ok(cmd) => cmd,
            Err(_) => return Err(CommandParsingError::UnableToParse),
        };

        if command.name != bot_name {
            return Err(CommandParsingError::NotForBot);
        }

        debug!("parsing command: {:?}", command);

        let Some(name) = command.arguments.first() else {
            return Ok(Command::Help);
        };

        match name.to_lowercase().as_str() {
            "help" => Ok(Command::Help),
            "promote" => Ok(Command::Promote {
                username: Self::parse_username(&command),
            }),
            "demote" => Ok(Command::Demote {
                username: Self::parse_username(&command),
            }),
            "kick" => Ok(Command::Kick {
                username: Self::parse_username(&command),
            }),
            "setrank" => Self::parse_set_rank(&command),
            "rankinfo" => Ok(Command::RankInfo),
            "rankhistory" => Ok(Command::RankHistory {
                username: Self::parse_username(&command),
            }),
            "auditlog" => Ok(Command::AuditLog),
            _ => Err(CommandParsingError::Unknown),
        }
    }

    /// Name of the command as typed by users.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Promote { .. } => "promote",
            Command::Demote { .. } => "demote",
            Command::Kick { .. } => "kick",
            Command::SetRank { .. } => "setrank",
            Command::RankInfo => "rankinfo",
            Command::RankHistory { .. } => "rankhistory",
            Command::AuditLog => "auditlog",
        }
    }

    /// Target username of the command, if any.
    pub fn username(&self) -> Option<&str> {
        match self {
            Command::Promote { username }
            | Command::Demote { username }
            | Command::Kick { username }
            | Command::SetRank { username, .. }
            | Command::RankHistory { username } => username.as_deref(),
            Command::Help | Command::RankInfo | Command::AuditLog => None,
        }
    }

    fn parse_username(command: &ParserCommand) -> Option<String> {
        command.arguments.get(1).cloned()
    }

    /// Parses `setrank <username> [rankname=<name>] [ranknumber=<n>] [rank words...]`.
    ///
    /// The first bare word is the username. Bare words following `rankname=`
    /// belong to the rank name, so `rankname=Senior Moderator` names one rank.
    /// Otherwise the remaining bare words are joined and used as the rank
    /// number if they form an integer, as the rank name if not. Words that
    /// would overwrite a rank given with `key=value` make the command invalid.
    fn parse_set_rank(command: &ParserCommand) -> Result<Command, CommandParsingError> {
        debug!("parsing setrank command: {:?}", command);

        let mut username = None;
        let mut rank = RankSpec::default();
        let mut rank_words: Vec<&str> = Vec::new();
        let mut in_rank_name = false;

        for argument in command.arguments.iter().skip(1) {
            match argument.split_once('=') {
                Some((key, value)) if key.eq_ignore_ascii_case("rankname") => {
                    rank.by_name = Some(value.to_string());
                    in_rank_name = true;
                }
                Some((key, value)) if key.eq_ignore_ascii_case("ranknumber") => {
                    let number = value
                        .parse::<i64>()
                        .map_err(|_| CommandParsingError::InvalidSetRank)?;
                    rank.by_number = Some(number);
                    in_rank_name = false;
                }
                _ if username.is_none() => username = Some(argument.clone()),
                _ => match rank.by_name.as_mut() {
                    Some(name) if in_rank_name => {
                        if !name.is_empty() {
                            name.push(' ');
                        }
                        name.push_str(argument);
                    }
                    _ => rank_words.push(argument.as_str()),
                },
            }
        }

        if !rank_words.is_empty() {
            let value = rank_words.join(" ");
            match value.parse::<i64>() {
                Ok(number) if rank.by_number.is_none() => rank.by_number = Some(number),
                Err(_) if rank.by_name.is_none() => rank.by_name = Some(value),
                _ => return Err(CommandParsingError::InvalidSetRank),
            }
        }

        debug!(
            "parsed setrank command - username: {:?}, rank: {}",
            username, rank
        );

        Ok(Command::SetRank { username, rank })
    }
}

/// Formats a parsing error into a reply.
///
/// `UnableToParse` and `NotForBot` return `None`: regular chat messages and
/// commands for other bots get no answer.
pub fn format_command_error(error: CommandParsingError, bot_name: &str) -> Option<Reply> {
    match error {
        CommandParsingError::Unknown => Some(format_unknown_command(bot_name)),
        CommandParsingError::InvalidSetRank => Some(format_invalid_set_rank(bot_name)),
        CommandParsingError::UnableToParse | CommandParsingError::NotForBot => None,
    }
}
