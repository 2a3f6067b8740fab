//! Audit trail of roster mutations.
//!
//! - [`ActionLogEntry`]: one executed action (who, what, resulting rank, when)
//! - [`ActionLog`]: bounded, newest-first, in-memory list of entries
//!
//! The trail only lives in memory: it is lost when the bot restarts.

mod action_log;
mod entry;

pub use crate::audit::action_log::ActionLog;
pub use crate::audit::entry::{Action, ActionLogEntry};
