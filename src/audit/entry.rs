//! Audit entries.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::roblox::RankDescriptor;

/// A roster mutation performed through the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Promoted,
    Demoted,
    Kicked,
    SetRank,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            Action::Promoted => "Promoted",
            Action::Demoted => "Demoted",
            Action::Kicked => "Kicked",
            Action::SetRank => "SetRank",
        };
        write!(f, "{}", label)
    }
}

/// Historical record of one executed action.
///
/// Entries are created only after the mutation succeeded and are never
/// modified afterwards. The user is referenced by name, so an entry stays
/// meaningful after the user left the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLogEntry {
    /// Username as typed by the moderator.
    pub username: String,
    /// What was done.
    pub action: Action,
    /// Name of the rank held after the action, absent for kicks.
    pub rank_name: Option<String>,
    /// Number of the rank held after the action, absent for kicks.
    pub rank_number: Option<u8>,
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
}

impl ActionLogEntry {
    /// Creates an entry for an action that leaves the user with `rank`.
    pub fn ranked(username: &str, action: Action, rank: &RankDescriptor) -> Self {
        ActionLogEntry {
            username: username.to_string(),
            action,
            rank_name: Some(rank.name.clone()),
            rank_number: Some(rank.rank),
            timestamp: Utc::now(),
        }
    }

    /// Creates an entry for a user removed from the group.
    pub fn kicked(username: &str) -> Self {
        ActionLogEntry {
            username: username.to_string(),
            action: Action::Kicked,
            rank_name: None,
            rank_number: None,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for ActionLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.rank_name, self.rank_number) {
            (Some(name), Some(number)) => write!(
                f,
                "{} {} -> {} ({})",
                self.username, self.action, name, number
            ),
            _ => write!(f, "{} {}", self.username, self.action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_entry_keeps_rank() {
        let rank = RankDescriptor {
            id: 12,
            rank: 2,
            name: "Moderator".to_string(),
        };
        let entry = ActionLogEntry::ranked("alice", Action::Promoted, &rank);

        assert_eq!(entry.username, "alice");
        assert_eq!(entry.action, Action::Promoted);
        assert_eq!(entry.rank_name.as_deref(), Some("Moderator"));
        assert_eq!(entry.rank_number, Some(2));
        assert_eq!(entry.to_string(), "alice Promoted -> Moderator (2)");
    }

    #[test]
    fn test_kicked_entry_has_no_rank() {
        let entry = ActionLogEntry::kicked("bob");

        assert_eq!(entry.action, Action::Kicked);
        assert!(entry.rank_name.is_none());
        assert!(entry.rank_number.is_none());
        assert_eq!(entry.to_string(), "bob Kicked");
    }
}
