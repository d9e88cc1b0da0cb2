//! Board aggregate and its mutation operations.
//!
//! # Responsibility
//! - Own columns, the card mapping and the column display order.
//! - Provide atomic mutations that either apply fully or leave the board
//!   untouched.
//!
//! # Invariants
//! - Every card id referenced by a column exists in `cards`, and every card
//!   in `cards` is referenced by exactly one column.
//! - `column_order` and `columns` hold the same set of column ids.
//! - Titles are stored trimmed and are never empty.
//!
//! Mutations referencing unknown ids, or carrying a blank title, are
//! no-ops. Callers learn about rejected input from the return value.

use crate::model::card::{Card, CardId};
use crate::model::column::{Column, ColumnId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Column titles of a freshly created board.
pub const DEFAULT_COLUMN_TITLES: [&str; 3] = ["To Do", "In Progress", "Completed"];

/// Invariant violations reported by [`Board::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardValidationError {
    DuplicateColumnId(ColumnId),
    EmptyColumnTitle(ColumnId),
    EmptyCardTitle(CardId),
    /// Title carries leading or trailing whitespace.
    UntrimmedColumnTitle(ColumnId),
    UntrimmedCardTitle(CardId),
    /// Card stored under a key that differs from its own id.
    CardKeyMismatch { key: CardId, card_id: CardId },
    /// Column references a card missing from the card mapping.
    DanglingCardReference { column_id: ColumnId, card_id: CardId },
    /// Card id appears more than once across all columns.
    DuplicateCardReference(CardId),
    /// Card exists in the mapping but no column references it.
    UnreferencedCard(CardId),
    DuplicateColumnOrderEntry(ColumnId),
    UnknownColumnInOrder(ColumnId),
    ColumnMissingFromOrder(ColumnId),
}

impl Display for BoardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateColumnId(id) => write!(f, "duplicate column id: {id}"),
            Self::EmptyColumnTitle(id) => write!(f, "column {id} has an empty title"),
            Self::EmptyCardTitle(id) => write!(f, "card {id} has an empty title"),
            Self::UntrimmedColumnTitle(id) => {
                write!(f, "column {id} title has surrounding whitespace")
            }
            Self::UntrimmedCardTitle(id) => write!(f, "card {id} title has surrounding whitespace"),
            Self::CardKeyMismatch { key, card_id } => {
                write!(f, "card {card_id} is stored under key {key}")
            }
            Self::DanglingCardReference { column_id, card_id } => {
                write!(f, "column {column_id} references missing card {card_id}")
            }
            Self::DuplicateCardReference(id) => {
                write!(f, "card {id} is referenced more than once")
            }
            Self::UnreferencedCard(id) => write!(f, "card {id} is not in any column"),
            Self::DuplicateColumnOrderEntry(id) => {
                write!(f, "column {id} appears more than once in column order")
            }
            Self::UnknownColumnInOrder(id) => {
                write!(f, "column order references missing column {id}")
            }
            Self::ColumnMissingFromOrder(id) => {
                write!(f, "column {id} is missing from column order")
            }
        }
    }
}

impl Error for BoardValidationError {}

/// The full task-tracking state: columns, cards and column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub columns: Vec<Column>,
    pub cards: BTreeMap<CardId, Card>,
    pub column_order: Vec<ColumnId>,
}

impl Board {
    /// Creates an empty board with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the board used when storage holds nothing yet.
    pub fn default_board() -> Self {
        let mut board = Self::new();
        for title in DEFAULT_COLUMN_TITLES {
            board.create_column(title);
        }
        board
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, column_id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == column_id)
    }

    /// Finds the first column, in display order, with the given title.
    pub fn column_by_title(&self, title: &str) -> Option<&Column> {
        let title = title.trim();
        self.ordered_columns()
            .into_iter()
            .find(|column| column.title == title)
    }

    pub fn card(&self, card_id: CardId) -> Option<&Card> {
        self.cards.get(&card_id)
    }

    /// Returns the column currently holding `card_id`.
    pub fn column_of_card(&self, card_id: CardId) -> Option<&Column> {
        self.columns.iter().find(|column| column.contains(card_id))
    }

    /// Columns in display order.
    pub fn ordered_columns(&self) -> Vec<&Column> {
        self.column_order
            .iter()
            .filter_map(|id| self.column(*id))
            .collect()
    }

    /// Cards of one column in display order.
    pub fn cards_in(&self, column_id: ColumnId) -> Vec<&Card> {
        self.column(column_id)
            .map(|column| {
                column
                    .card_ids
                    .iter()
                    .filter_map(|id| self.cards.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Adds a card at the end of `column_id`.
    ///
    /// Returns `None` without touching the board when the title is blank or
    /// the column does not exist.
    pub fn create_card(&mut self, column_id: ColumnId, title: &str, notes: &str) -> Option<CardId> {
        let title = super::normalize_title(title)?;
        let column = find_column_mut(&mut self.columns, column_id)?;

        let card = Card::new(title, notes);
        let card_id = card.id;
        column.card_ids.push(card_id);
        self.cards.insert(card_id, card);
        Some(card_id)
    }

    /// Replaces title and notes of an existing card. Identity and creation
    /// timestamp are kept.
    pub fn update_card(&mut self, card_id: CardId, title: &str, notes: &str) -> bool {
        let Some(title) = super::normalize_title(title) else {
            return false;
        };
        let Some(card) = self.cards.get_mut(&card_id) else {
            return false;
        };
        card.title = title;
        card.notes = notes.to_string();
        true
    }

    /// Removes a card from the mapping and from whichever column holds it.
    pub fn delete_card(&mut self, card_id: CardId) -> bool {
        if self.cards.remove(&card_id).is_none() {
            return false;
        }
        for column in &mut self.columns {
            column.remove_card(card_id);
        }
        true
    }

    /// Appends a new empty column and its id to the column order.
    pub fn create_column(&mut self, title: &str) -> Option<ColumnId> {
        let title = super::normalize_title(title)?;
        let column = Column::new(title);
        let column_id = column.id;
        self.columns.push(column);
        self.column_order.push(column_id);
        Some(column_id)
    }

    pub fn update_column(&mut self, column_id: ColumnId, title: &str) -> bool {
        let Some(title) = super::normalize_title(title) else {
            return false;
        };
        let Some(column) = find_column_mut(&mut self.columns, column_id) else {
            return false;
        };
        column.title = title;
        true
    }

    /// Removes a column together with every card it holds.
    pub fn delete_column(&mut self, column_id: ColumnId) -> bool {
        let Some(position) = self.columns.iter().position(|c| c.id == column_id) else {
            return false;
        };
        let column = self.columns.remove(position);
        for card_id in &column.card_ids {
            self.cards.remove(card_id);
        }
        self.column_order.retain(|id| *id != column_id);
        true
    }

    /// Moves a card into `to_column_id` at `target_index`.
    ///
    /// The index is clamped to the destination sequence after the card has
    /// been taken out, so same-column moves (`from == to`) behave like a
    /// splice. When the card is not in `from_column_id` it is taken from
    /// whichever column actually holds it; the card always ends up in
    /// exactly one column.
    pub fn move_card(
        &mut self,
        card_id: CardId,
        from_column_id: ColumnId,
        to_column_id: ColumnId,
        target_index: usize,
    ) -> bool {
        if !self.cards.contains_key(&card_id) || self.column(to_column_id).is_none() {
            return false;
        }

        let removed = find_column_mut(&mut self.columns, from_column_id)
            .is_some_and(|column| column.remove_card(card_id));
        if !removed {
            for column in &mut self.columns {
                column.remove_card(card_id);
            }
        }

        if let Some(destination) = find_column_mut(&mut self.columns, to_column_id) {
            destination.insert_card(card_id, target_index);
        }
        true
    }

    /// Replaces the column display order.
    ///
    /// Ids not on the board are dropped and repeated ids keep their first
    /// position. Columns the caller left out are appended in their previous
    /// relative order so every column stays reachable.
    pub fn reorder_columns(&mut self, column_ids: &[ColumnId]) {
        let mut seen = HashSet::new();
        let mut order = Vec::with_capacity(self.column_order.len());
        for id in column_ids {
            if self.column(*id).is_some() && seen.insert(*id) {
                order.push(*id);
            }
        }
        for id in &self.column_order {
            if seen.insert(*id) {
                order.push(*id);
            }
        }

        self.columns.sort_by_key(|column| {
            order
                .iter()
                .position(|id| *id == column.id)
                .unwrap_or(usize::MAX)
        });
        self.column_order = order;
    }

    /// Checks every board invariant.
    ///
    /// Storage calls this on both read and write paths.
    pub fn validate(&self) -> Result<(), BoardValidationError> {
        let mut column_ids = HashSet::new();
        for column in &self.columns {
            if !column_ids.insert(column.id) {
                return Err(BoardValidationError::DuplicateColumnId(column.id));
            }
            let trimmed = column.title.trim();
            if trimmed.is_empty() {
                return Err(BoardValidationError::EmptyColumnTitle(column.id));
            }
            if trimmed.len() != column.title.len() {
                return Err(BoardValidationError::UntrimmedColumnTitle(column.id));
            }
        }

        let mut ordered = HashSet::new();
        for id in &self.column_order {
            if !column_ids.contains(id) {
                return Err(BoardValidationError::UnknownColumnInOrder(*id));
            }
            if !ordered.insert(*id) {
                return Err(BoardValidationError::DuplicateColumnOrderEntry(*id));
            }
        }
        if let Some(column) = self.columns.iter().find(|c| !ordered.contains(&c.id)) {
            return Err(BoardValidationError::ColumnMissingFromOrder(column.id));
        }

        for (key, card) in &self.cards {
            if *key != card.id {
                return Err(BoardValidationError::CardKeyMismatch {
                    key: *key,
                    card_id: card.id,
                });
            }
            let trimmed = card.title.trim();
            if trimmed.is_empty() {
                return Err(BoardValidationError::EmptyCardTitle(card.id));
            }
            if trimmed.len() != card.title.len() {
                return Err(BoardValidationError::UntrimmedCardTitle(card.id));
            }
        }

        let mut referenced = HashSet::new();
        for column in &self.columns {
            for card_id in &column.card_ids {
                if !self.cards.contains_key(card_id) {
                    return Err(BoardValidationError::DanglingCardReference {
                        column_id: column.id,
                        card_id: *card_id,
                    });
                }
                if !referenced.insert(*card_id) {
                    return Err(BoardValidationError::DuplicateCardReference(*card_id));
                }
            }
        }
        if let Some(card_id) = self.cards.keys().find(|id| !referenced.contains(*id)) {
            return Err(BoardValidationError::UnreferencedCard(*card_id));
        }

        Ok(())
    }
}

fn find_column_mut(columns: &mut [Column], column_id: ColumnId) -> Option<&mut Column> {
    columns.iter_mut().find(|column| column.id == column_id)
}

#[cfg(test)]
mod tests {
    use super::{Board, BoardValidationError, DEFAULT_COLUMN_TITLES};
    use uuid::Uuid;

    fn todo_id(board: &Board) -> Uuid {
        board.column_by_title("To Do").expect("default column").id
    }

    #[test]
    fn default_board_has_three_empty_columns_in_order() {
        let board = Board::default_board();
        let titles: Vec<_> = board
            .ordered_columns()
            .iter()
            .map(|column| column.title.as_str())
            .collect();
        assert_eq!(titles, DEFAULT_COLUMN_TITLES);
        assert!(board.columns.iter().all(|column| column.card_ids.is_empty()));
        assert_eq!(board.card_count(), 0);
        board.validate().unwrap();
    }

    #[test]
    fn create_card_trims_title_and_keeps_notes() {
        let mut board = Board::default_board();
        let todo = todo_id(&board);

        let id = board.create_card(todo, "  Buy milk ", " 2 litres").unwrap();
        let card = board.card(id).unwrap();
        assert_eq!(card.title, "Buy milk");
        assert_eq!(card.notes, " 2 litres");
        assert_eq!(board.column(todo).unwrap().card_ids, vec![id]);
    }

    #[test]
    fn create_card_in_unknown_column_is_rejected() {
        let mut board = Board::default_board();
        let before = board.clone();

        assert!(board.create_card(Uuid::new_v4(), "orphan", "").is_none());
        assert_eq!(board, before);
    }

    #[test]
    fn update_card_keeps_identity_and_timestamp() {
        let mut board = Board::default_board();
        let id = board.create_card(todo_id(&board), "draft", "").unwrap();
        let created_at = board.card(id).unwrap().created_at;

        assert!(board.update_card(id, "final", "details"));
        let card = board.card(id).unwrap();
        assert_eq!(card.id, id);
        assert_eq!(card.created_at, created_at);
        assert_eq!(card.title, "final");
        assert_eq!(card.notes, "details");

        assert!(!board.update_card(id, "   ", "ignored"));
        assert_eq!(board.card(id).unwrap().title, "final");
        assert!(!board.update_card(Uuid::new_v4(), "x", ""));
    }

    #[test]
    fn delete_card_strips_reference() {
        let mut board = Board::default_board();
        let todo = todo_id(&board);
        let keep = board.create_card(todo, "keep", "").unwrap();
        let drop = board.create_card(todo, "drop", "").unwrap();

        assert!(board.delete_card(drop));
        assert!(!board.delete_card(drop));
        assert_eq!(board.column(todo).unwrap().card_ids, vec![keep]);
        assert!(board.card(drop).is_none());
        board.validate().unwrap();
    }

    #[test]
    fn update_column_rejects_blank_title() {
        let mut board = Board::default_board();
        let todo = todo_id(&board);

        assert!(board.update_column(todo, "Backlog"));
        assert!(!board.update_column(todo, " "));
        assert_eq!(board.column(todo).unwrap().title, "Backlog");
    }

    #[test]
    fn same_column_move_splices_after_removal() {
        let mut board = Board::default_board();
        let todo = todo_id(&board);
        let a = board.create_card(todo, "a", "").unwrap();
        let b = board.create_card(todo, "b", "").unwrap();
        let c = board.create_card(todo, "c", "").unwrap();

        assert!(board.move_card(a, todo, todo, 1));
        assert_eq!(board.column(todo).unwrap().card_ids, vec![b, a, c]);

        assert!(board.move_card(b, todo, todo, 99));
        assert_eq!(board.column(todo).unwrap().card_ids, vec![a, c, b]);
    }

    #[test]
    fn move_with_stale_source_still_leaves_one_reference() {
        let mut board = Board::default_board();
        let ids: Vec<_> = board.column_order.clone();
        let card = board.create_card(ids[0], "task", "").unwrap();

        assert!(board.move_card(card, ids[1], ids[2], 0));
        assert!(board.column(ids[0]).unwrap().card_ids.is_empty());
        assert_eq!(board.column(ids[2]).unwrap().card_ids, vec![card]);
        board.validate().unwrap();
    }

    #[test]
    fn move_to_unknown_column_is_noop() {
        let mut board = Board::default_board();
        let todo = todo_id(&board);
        let card = board.create_card(todo, "task", "").unwrap();
        let before = board.clone();

        assert!(!board.move_card(card, todo, Uuid::new_v4(), 0));
        assert!(!board.move_card(Uuid::new_v4(), todo, todo, 0));
        assert_eq!(board, before);
    }

    #[test]
    fn reorder_drops_unknown_ids_and_keeps_omitted_columns() {
        let mut board = Board::default_board();
        let ids = board.column_order.clone();

        board.reorder_columns(&[ids[2], Uuid::new_v4(), ids[2], ids[0]]);
        assert_eq!(board.column_order, vec![ids[2], ids[0], ids[1]]);
        let listed: Vec<_> = board.columns.iter().map(|column| column.id).collect();
        assert_eq!(listed, board.column_order);
        board.validate().unwrap();
    }

    #[test]
    fn validate_reports_dangling_reference() {
        let mut board = Board::default_board();
        let todo = todo_id(&board);
        let ghost = Uuid::new_v4();
        board.columns[0].card_ids.push(ghost);

        assert_eq!(
            board.validate(),
            Err(BoardValidationError::DanglingCardReference {
                column_id: todo,
                card_id: ghost,
            })
        );
    }

    #[test]
    fn validate_reports_order_mismatch() {
        let mut board = Board::default_board();
        let removed = board.column_order.pop().unwrap();

        assert_eq!(
            board.validate(),
            Err(BoardValidationError::ColumnMissingFromOrder(removed))
        );
    }
}
