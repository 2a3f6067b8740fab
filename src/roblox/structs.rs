//! Public data structures for Roblox groups and their rank ladder.

use std::fmt;

/// One tier of a group's rank ladder.
///
/// A catalog of descriptors is fetched per request and never cached, since
/// ranks may be renamed or renumbered between two commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankDescriptor {
    /// Roblox role id, used when assigning the role to a member.
    pub id: u64,
    /// Rank number, unique within a catalog snapshot (0 is the guest rank).
    pub rank: u8,
    /// Display name of the rank.
    pub name: String,
}

impl fmt::Display for RankDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (rank {}, role {})", self.name, self.rank, self.id)
    }
}

/// Outcome of a promotion or demotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleChange {
    /// Role held before the change.
    pub old_role: RankDescriptor,
    /// Role held after the change.
    pub new_role: RankDescriptor,
}

/// Minimal group information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    pub id: u64,
    pub name: String,
}

/// The Roblox account the bot is authenticated as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: u64,
    pub name: String,
}

/// Direction of a single step on the rank ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Up,
    Down,
}
