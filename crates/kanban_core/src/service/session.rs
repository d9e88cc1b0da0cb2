//! Editing session over one board.
//!
//! # Responsibility
//! - Hold the authoritative in-memory board.
//! - Turn commands into new snapshots and hand them to the write-behind.
//! - Persist due snapshots on `tick`/`flush`.
//!
//! # Invariants
//! - A failed save never discards the in-memory board; the snapshot stays
//!   pending and is retried on a later `tick` or `flush`.
//! - Ignored commands do not schedule a save.

use crate::model::board::{Board, BoardValidationError};
use crate::model::command::{BoardCommand, CommandOutcome};
use crate::repo::board_repo::{BoardRepository, RepoError};
use crate::service::board_service::BoardService;
use crate::service::write_behind::WriteBehind;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

/// Session-level errors. Save failures are recoverable.
#[derive(Debug)]
pub enum SessionError {
    /// Initial load from storage failed.
    LoadFailed(RepoError),
    /// Saving a snapshot failed; the board is still usable in memory.
    SaveFailed(RepoError),
}

impl SessionError {
    /// Whether the session can keep running after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::SaveFailed(_))
    }
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoadFailed(err) => write!(f, "failed to load board: {err}"),
            Self::SaveFailed(err) => write!(f, "failed to save board: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::LoadFailed(err) | Self::SaveFailed(err) => Some(err),
        }
    }
}

/// Board plus its debounced persistence.
pub struct BoardSession<R: BoardRepository> {
    service: BoardService<R>,
    board: Board,
    write_behind: WriteBehind,
}

impl<R: BoardRepository> BoardSession<R> {
    /// Loads the stored board, or starts from the default board and
    /// schedules it for saving.
    pub fn open(
        service: BoardService<R>,
        debounce: Duration,
        now: Instant,
    ) -> Result<Self, SessionError> {
        let loaded = service
            .load_or_default()
            .map_err(SessionError::LoadFailed)?;

        let mut write_behind = WriteBehind::new(debounce);
        if loaded.from_storage {
            write_behind.mark_saved(loaded.board.clone());
        } else {
            write_behind.schedule(&loaded.board, now);
        }

        info!(
            "event=session_open module=service status=ok source={} columns={} cards={} debounce_ms={}",
            if loaded.from_storage { "storage" } else { "default" },
            loaded.board.columns.len(),
            loaded.board.card_count(),
            debounce.as_millis()
        );

        Ok(Self {
            service,
            board: loaded.board,
            write_behind,
        })
    }

    /// Current snapshot.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Applies one command and schedules the resulting snapshot.
    pub fn apply(&mut self, command: &BoardCommand, now: Instant) -> CommandOutcome {
        let (next, outcome) = self.board.apply(command);
        if outcome.is_ignored() {
            debug!(
                "event=board_mutation module=service op={} status=ignored",
                command.name()
            );
            return outcome;
        }

        self.board = next;
        self.write_behind.schedule(&self.board, now);
        debug!(
            "event=board_mutation module=service op={} status=ok",
            command.name()
        );
        outcome
    }

    /// Replaces the whole board, e.g. from an imported snapshot.
    pub fn replace_board(&mut self, board: Board, now: Instant) -> Result<(), BoardValidationError> {
        board.validate()?;
        self.board = board;
        self.write_behind.schedule(&self.board, now);
        Ok(())
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.write_behind.is_pending()
    }

    /// Deadline of the pending save, if any.
    pub fn next_save_at(&self) -> Option<Instant> {
        self.write_behind.deadline()
    }

    /// Saves the pending snapshot if its debounce window has elapsed.
    ///
    /// Returns `Ok(true)` when a save happened.
    pub fn tick(&mut self, now: Instant) -> Result<bool, SessionError> {
        match self.write_behind.take_due(now) {
            Some(board) => self.persist(board, now).map(|()| true),
            None => Ok(false),
        }
    }

    /// Saves the pending snapshot immediately.
    pub fn flush(&mut self, now: Instant) -> Result<bool, SessionError> {
        match self.write_behind.take_pending() {
            Some(board) => self.persist(board, now).map(|()| true),
            None => Ok(false),
        }
    }

    fn persist(&mut self, board: Board, now: Instant) -> Result<(), SessionError> {
        match self.service.save(&board) {
            Ok(()) => {
                self.write_behind.mark_saved(board);
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=board_save module=service status=error retry_in_ms={} error={}",
                    self.write_behind.debounce().as_millis(),
                    err
                );
                self.write_behind.retry_later(board, now);
                Err(SessionError::SaveFailed(err))
            }
        }
    }
}
