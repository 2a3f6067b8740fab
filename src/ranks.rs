//! Rank resolution.
//!
//! Picks one [`RankDescriptor`] out of a catalog from what a moderator typed:
//! an explicit rank number, a fragment of a rank name, or both.

use std::fmt;

use crate::roblox::RankDescriptor;

/// What the caller asked for when targeting a rank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankSpec {
    /// Exact rank number. Takes precedence over `by_name`.
    pub by_number: Option<i64>,
    /// Case-insensitive fragment of a rank name.
    pub by_name: Option<String>,
}

impl fmt::Display for RankSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.by_number, &self.by_name) {
            (Some(number), _) => write!(f, "rank number {}", number),
            (None, Some(name)) => write!(f, "rank name '{}'", name),
            (None, None) => write!(f, "no rank"),
        }
    }
}

/// Resolves a rank from a catalog.
///
/// - When `by_number` is present, only the descriptor with exactly that rank
///   matches, even if a name is also given. A rank of `0` is a valid request.
/// - Otherwise the **first** descriptor, in catalog order, whose name contains
///   `by_name` ignoring case is returned. This is the first textual match, not
///   the closest one: `"mod"` matches `"Moderator"` and `"Senior Moderator"`
///   alike and the catalog order decides.
/// - A blank name is treated as absent.
///
/// Returns `None` when nothing matches.
///
/// # Examples
///
/// ```
/// let spec = RankSpec { by_number: None, by_name: Some("mod".to_string()) };
/// let rank = resolve(&catalog, &spec);
/// ```
pub fn resolve<'a>(catalog: &'a [RankDescriptor], spec: &RankSpec) -> Option<&'a RankDescriptor> {
    if let Some(number) = spec.by_number {
        let number = u8::try_from(number).ok()?;
        return catalog.iter().find(|rank| rank.rank == number);
    }

    let query = spec
        .by_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())?
        .to_lowercase();

    catalog
        .iter()
        .find(|rank| rank.name.to_lowercase().contains(&query))
}
