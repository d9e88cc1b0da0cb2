//! Column domain model.

use crate::model::card::CardId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a column.
pub type ColumnId = Uuid;

/// A named, ordered bucket of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    /// Display text, stored trimmed.
    pub title: String,
    /// Display order of the cards in this column.
    pub card_ids: Vec<CardId>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Column {
    /// Creates an empty column with a generated ID and the current timestamp.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title, super::now_epoch_ms())
    }

    /// Creates an empty column with caller-provided identity.
    pub fn with_id(id: ColumnId, title: impl Into<String>, created_at: i64) -> Self {
        Self {
            id,
            title: title.into(),
            card_ids: Vec::new(),
            created_at,
        }
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.card_ids.contains(&card_id)
    }

    /// Removes `card_id` from this column. Returns whether it was present.
    pub(crate) fn remove_card(&mut self, card_id: CardId) -> bool {
        let before = self.card_ids.len();
        self.card_ids.retain(|id| *id != card_id);
        self.card_ids.len() != before
    }

    /// Inserts `card_id` at `index`, clamped to the sequence bounds.
    pub(crate) fn insert_card(&mut self, card_id: CardId, index: usize) {
        let index = index.min(self.card_ids.len());
        self.card_ids.insert(index, card_id);
    }
}
