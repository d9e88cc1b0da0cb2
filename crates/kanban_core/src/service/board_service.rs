//! Board use-case service.
//!
//! # Responsibility
//! - Load the stored board or fall back to the default board.
//! - Save and import whole snapshots through the repository.
//!
//! # Invariants
//! - The service never bypasses repository validation.
//! - The service stays storage-agnostic.

use crate::model::board::{Board, BoardValidationError};
use crate::repo::board_repo::{BoardRepository, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Board returned by [`BoardService::load_or_default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedBoard {
    pub board: Board,
    /// `false` when storage was empty and the default board was built.
    pub from_storage: bool,
}

/// Errors from decoding a JSON board snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    Validation(BoardValidationError),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed board snapshot: {err}"),
            Self::Validation(err) => write!(f, "invalid board snapshot: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

/// Use-case service over a board repository.
pub struct BoardService<R: BoardRepository> {
    repo: R,
}

impl<R: BoardRepository> BoardService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the stored board, or builds the default three-column board.
    ///
    /// The default board is not persisted here; callers decide when to save.
    pub fn load_or_default(&self) -> RepoResult<LoadedBoard> {
        Ok(match self.repo.load_board()? {
            Some(board) => LoadedBoard {
                board,
                from_storage: true,
            },
            None => LoadedBoard {
                board: Board::default_board(),
                from_storage: false,
            },
        })
    }

    /// Replaces all stored board data with `board`.
    pub fn save(&self, board: &Board) -> RepoResult<()> {
        self.repo.save_board(board)
    }
}

/// Serializes a board to the `{columns, cards, columnOrder}` JSON shape.
pub fn board_to_json(board: &Board) -> serde_json::Result<String> {
    serde_json::to_string_pretty(board)
}

/// Parses and validates a JSON board snapshot.
pub fn board_from_json(json: &str) -> Result<Board, SnapshotError> {
    let board: Board = serde_json::from_str(json).map_err(SnapshotError::Json)?;
    board.validate().map_err(SnapshotError::Validation)?;
    Ok(board)
}
