//! Board domain model.
//!
//! # Responsibility
//! - Define the board, column and card records.
//! - Provide the pure mutation operations over one board snapshot.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - Deletion is a hard delete; cascading from column to its cards.

pub mod board;
pub mod card;
pub mod column;
pub mod command;

use std::time::{SystemTime, UNIX_EPOCH};

/// Trims a user-supplied title, returning `None` when nothing is left.
pub fn normalize_title(title: &str) -> Option<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}

#[cfg(test)]
mod tests {
    use super::normalize_title;

    #[test]
    fn normalize_title_rejects_whitespace_only() {
        assert_eq!(normalize_title(" \t\n"), None);
        assert_eq!(normalize_title(""), None);
        assert_eq!(normalize_title("  Done ").as_deref(), Some("Done"));
    }
}
