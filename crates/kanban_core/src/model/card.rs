//! Card domain model.
//!
//! # Responsibility
//! - Define the task item stored in the board card mapping.
//!
//! # Invariants
//! - `id` is stable and never reused for another card.
//! - `title` is non-empty after trimming.
//! - `created_at` never changes after creation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a card.
pub type CardId = Uuid;

/// A single task item with title and notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    /// Display text, stored trimmed.
    pub title: String,
    /// Free text, may be empty.
    #[serde(default)]
    pub notes: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Card {
    /// Creates a card with a generated ID and the current timestamp.
    ///
    /// Callers are responsible for rejecting blank titles; see
    /// [`normalize_title`](super::normalize_title).
    pub fn new(title: impl Into<String>, notes: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title, notes, super::now_epoch_ms())
    }

    /// Creates a card with caller-provided identity, used by storage and
    /// import paths.
    pub fn with_id(
        id: CardId,
        title: impl Into<String>,
        notes: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            notes: notes.into(),
            created_at,
        }
    }
}
