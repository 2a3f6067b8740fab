//! Reply formatters for bot commands.
//!
//! Every command produces exactly one [`Reply`], built by one of these
//! functions. Descriptions are Markdown and are rendered by the Matrix client.

use crate::{
    audit::ActionLogEntry,
    commands::{Command, CommandError, Reply},
    roblox::RankDescriptor,
};

/// Color of informational replies.
pub const COLOR_INFO: u32 = 0x00aaff;
/// Color of successful promotions.
pub const COLOR_PROMOTED: u32 = 0x00ff00;
/// Color of demotions, kicks and failures.
pub const COLOR_ALERT: u32 = 0xff0000;
/// Color of successful rank assignments.
pub const COLOR_RANK_SET: u32 = 0x00ff88;

/// Formats the help message showing available bot commands.
///
/// # Examples
///
/// ```
/// let help = format_help("ranker");
/// assert!(help.description.contains("promote"));
/// ```
pub fn format_help(bot_name: &str) -> Reply {
    let body = format!(
        "Commands:\n\
        - `!{bot_name} promote <username>`: move a member one rank up\n\
        - `!{bot_name} demote <username>`: move a member one rank down\n\
        - `!{bot_name} kick <username>`: remove a member from the group\n\
        - `!{bot_name} setrank <username> [rankname=<name>] [ranknumber=<number>]`: set the rank of a member\n\
        - `!{bot_name} rankinfo`: list the ranks of the group\n\
        - `!{bot_name} rankhistory <username>`: show the recent actions on a member\n\
        - `!{bot_name} auditlog`: show the recent actions in the group\n\
        - `!{bot_name} help`: show this help message\n\n\
        When both `ranknumber` and `rankname` are given, the number wins."
    );

    Reply::public("📖 Ranker Commands", body, COLOR_INFO)
}

/// Formats a response for an unknown command.
pub fn format_unknown_command(bot_name: &str) -> Reply {
    Reply::ephemeral(
        format!("Unknown command. Type `!{bot_name} help` for more information."),
        COLOR_ALERT,
    )
}

/// Formats a response for a `setrank` command with a non-integer or conflicting rank.
pub fn format_invalid_set_rank(bot_name: &str) -> Reply {
    Reply::ephemeral(
        format!(
            "Invalid setrank command: `ranknumber` must be an integer and the rank can only be given once. Usage: `!{bot_name} setrank <username> [rankname=<name>] [ranknumber=<number>]`"
        ),
        COLOR_ALERT,
    )
}

/// Formats the rank catalog of the group, one `**<rank>** - <name>` line per rank.
///
/// The ranks are listed in the order given.
pub fn format_rank_list(ranks: &[RankDescriptor]) -> Reply {
    if ranks.is_empty() {
        return Reply::public("📋 Group Rank List", "No ranks found.".to_owned(), COLOR_INFO);
    }

    let lines: Vec<String> = ranks
        .iter()
        .map(|rank| format!("**{}** - {}", rank.rank, rank.name))
        .collect();

    Reply::public("📋 Group Rank List", lines.join("\n"), COLOR_INFO)
}

pub fn format_promoted(username: &str, rank: &RankDescriptor) -> Reply {
    Reply::public(
        "🎉 Promoted!",
        format!("**{}** has been promoted to **{}**.", username, rank.name),
        COLOR_PROMOTED,
    )
}

pub fn format_demoted(username: &str, rank: &RankDescriptor) -> Reply {
    Reply::public(
        "📉 Demoted!",
        format!("**{}** has been demoted to **{}**.", username, rank.name),
        COLOR_ALERT,
    )
}

pub fn format_kicked(username: &str, group_name: &str) -> Reply {
    Reply::public(
        "👢 Kicked!",
        format!("Kicked **{}** from the **{}** group.", username, group_name),
        COLOR_ALERT,
    )
}

pub fn format_rank_set(username: &str, rank: &RankDescriptor) -> Reply {
    Reply::public(
        "✅ Rank Updated!",
        format!(
            "**{}** has been set to **{}** (Rank: {}).",
            username, rank.name, rank.rank
        ),
        COLOR_RANK_SET,
    )
}

/// Formats the recent actions on one user.
///
/// An empty history is answered with an ephemeral notice.
pub fn format_rank_history(username: &str, entries: &[ActionLogEntry]) -> Reply {
    if entries.is_empty() {
        return Reply::ephemeral(
            format!("No recent actions found for **{}**.", username),
            COLOR_INFO,
        );
    }

    let lines: Vec<String> = entries.iter().map(format_entry_action).collect();

    Reply::public(
        &format!("📜 Rank History: {}", username),
        lines.join("\n"),
        COLOR_INFO,
    )
}

/// Formats the recent actions in the group, one line per entry.
pub fn format_audit_log(entries: &[ActionLogEntry]) -> Reply {
    if entries.is_empty() {
        return Reply::ephemeral("No recent actions found.".to_owned(), COLOR_INFO);
    }

    let lines: Vec<String> = entries
        .iter()
        .map(|entry| format!("**{}** - {}", entry.username, format_entry_action(entry)))
        .collect();

    Reply::public("📜 Recent Group Actions", lines.join("\n"), COLOR_INFO)
}

/// Formats the reply of a failed command.
///
/// The reply stays short, the full error is logged by the dispatcher.
pub fn format_command_failure(command: &Command, error: &CommandError) -> Reply {
    let description = match error {
        CommandError::MissingParameter(_) => "❌ Please provide a username.".to_owned(),
        CommandError::RankResolutionError(_) => "❌ Could not find a matching rank.".to_owned(),
        CommandError::UserNotFound(_) | CommandError::ExternalApiError(_) => format!(
            "❌ Could not {} **{}**.",
            command.name(),
            command.username().unwrap_or_default()
        ),
    };

    Reply::ephemeral(description, COLOR_ALERT)
}

/// `**Promoted** - Moderator (Rank: 2)`, or `**Kicked**` for entries without rank.
fn format_entry_action(entry: &ActionLogEntry) -> String {
    match (&entry.rank_name, entry.rank_number) {
        (Some(name), Some(number)) => {
            format!("**{}** - {} (Rank: {})", entry.action, name, number)
        }
        _ => format!("**{}**", entry.action),
    }
}
