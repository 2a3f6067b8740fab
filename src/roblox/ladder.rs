//! Rank ladder navigation.
//!
//! The ladder is the group's catalog ordered by ascending rank number, without
//! the guest rank (`0`) which cannot be assigned to a member.

use crate::roblox::structs::{RankDescriptor, Step};

/// Rank number of the guest role.
const GUEST_RANK: u8 = 0;

/// Returns the role adjacent to `current_rank` on the ladder built from `catalog`.
///
/// Returns `None` when the current rank is not on the ladder, or when the step
/// would leave the ladder (promoting the highest rank, demoting the lowest).
pub fn adjacent_role<'a>(
    catalog: &'a [RankDescriptor],
    current_rank: u8,
    step: Step,
) -> Option<&'a RankDescriptor> {
    let mut ladder: Vec<&RankDescriptor> = catalog
        .iter()
        .filter(|role| role.rank != GUEST_RANK)
        .collect();
    ladder.sort_by_key(|role| role.rank);

    let position = ladder.iter().position(|role| role.rank == current_rank)?;

    match step {
        Step::Up => ladder.get(position + 1).copied(),
        Step::Down => position.checked_sub(1).and_then(|p| ladder.get(p).copied()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: u64, rank: u8, name: &str) -> RankDescriptor {
        RankDescriptor {
            id,
            rank,
            name: name.to_string(),
        }
    }

    // Deliberately unsorted to check the ladder ordering
    fn catalog() -> Vec<RankDescriptor> {
        vec![
            role(40, 255, "Owner"),
            role(10, 0, "Guest"),
            role(30, 50, "Moderator"),
            role(20, 1, "Member"),
        ]
    }

    #[test]
    fn test_adjacent_role_up() {
        let catalog = catalog();
        assert_eq!(adjacent_role(&catalog, 1, Step::Up).unwrap().name, "Moderator");
        assert_eq!(adjacent_role(&catalog, 50, Step::Up).unwrap().name, "Owner");
    }

    #[test]
    fn test_adjacent_role_down() {
        let catalog = catalog();
        assert_eq!(adjacent_role(&catalog, 255, Step::Down).unwrap().name, "Moderator");
        assert_eq!(adjacent_role(&catalog, 50, Step::Down).unwrap().name, "Member");
    }

    #[test]
    fn test_adjacent_role_never_reaches_guest() {
        let catalog = catalog();
        assert!(adjacent_role(&catalog, 1, Step::Down).is_none());
    }

    #[test]
    fn test_adjacent_role_top_of_ladder() {
        let catalog = catalog();
        assert!(adjacent_role(&catalog, 255, Step::Up).is_none());
    }

    #[test]
    fn test_adjacent_role_unknown_rank() {
        let catalog = catalog();
        assert!(adjacent_role(&catalog, 7, Step::Up).is_none());
        assert!(adjacent_role(&[], 1, Step::Up).is_none());
    }
}
