//! Board mutations as values.
//!
//! # Responsibility
//! - Describe every board mutation as one `BoardCommand`.
//! - Provide the pure snapshot transition `Board::apply`.
//!
//! # Invariants
//! - `Board::apply` never modifies the input snapshot.
//! - An ignored command yields a snapshot equal to the input.

use crate::model::board::Board;
use crate::model::card::CardId;
use crate::model::column::ColumnId;

/// One board mutation requested by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCommand {
    CreateCard {
        column_id: ColumnId,
        title: String,
        notes: String,
    },
    UpdateCard {
        card_id: CardId,
        title: String,
        notes: String,
    },
    DeleteCard {
        card_id: CardId,
    },
    CreateColumn {
        title: String,
    },
    UpdateColumn {
        column_id: ColumnId,
        title: String,
    },
    DeleteColumn {
        column_id: ColumnId,
    },
    MoveCard {
        card_id: CardId,
        from_column_id: ColumnId,
        to_column_id: ColumnId,
        target_index: usize,
    },
    ReorderColumns {
        column_ids: Vec<ColumnId>,
    },
}

impl BoardCommand {
    /// Stable operation name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateCard { .. } => "create_card",
            Self::UpdateCard { .. } => "update_card",
            Self::DeleteCard { .. } => "delete_card",
            Self::CreateColumn { .. } => "create_column",
            Self::UpdateColumn { .. } => "update_column",
            Self::DeleteColumn { .. } => "delete_column",
            Self::MoveCard { .. } => "move_card",
            Self::ReorderColumns { .. } => "reorder_columns",
        }
    }
}

/// Result of applying one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    CardCreated(CardId),
    ColumnCreated(ColumnId),
    Applied,
    /// Blank title or unknown id; the board is unchanged.
    Ignored,
}

impl CommandOutcome {
    pub fn is_ignored(self) -> bool {
        matches!(self, Self::Ignored)
    }
}

impl Board {
    /// Applies `command` to a copy of this board and returns the next
    /// snapshot together with the outcome.
    pub fn apply(&self, command: &BoardCommand) -> (Board, CommandOutcome) {
        let mut next = self.clone();
        let outcome = next.apply_in_place(command);
        (next, outcome)
    }

    /// Applies `command` to this board.
    pub fn apply_in_place(&mut self, command: &BoardCommand) -> CommandOutcome {
        let accepted = match command {
            BoardCommand::CreateCard {
                column_id,
                title,
                notes,
            } => {
                return self
                    .create_card(*column_id, title, notes)
                    .map_or(CommandOutcome::Ignored, CommandOutcome::CardCreated);
            }
            BoardCommand::CreateColumn { title } => {
                return self
                    .create_column(title)
                    .map_or(CommandOutcome::Ignored, CommandOutcome::ColumnCreated);
            }
            BoardCommand::UpdateCard {
                card_id,
                title,
                notes,
            } => self.update_card(*card_id, title, notes),
            BoardCommand::DeleteCard { card_id } => self.delete_card(*card_id),
            BoardCommand::UpdateColumn { column_id, title } => {
                self.update_column(*column_id, title)
            }
            BoardCommand::DeleteColumn { column_id } => self.delete_column(*column_id),
            BoardCommand::MoveCard {
                card_id,
                from_column_id,
                to_column_id,
                target_index,
            } => self.move_card(*card_id, *from_column_id, *to_column_id, *target_index),
            BoardCommand::ReorderColumns { column_ids } => {
                self.reorder_columns(column_ids);
                true
            }
        };

        if accepted {
            CommandOutcome::Applied
        } else {
            CommandOutcome::Ignored
        }
    }
}
