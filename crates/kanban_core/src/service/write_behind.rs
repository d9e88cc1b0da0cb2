//! Debounced write-behind cache for board snapshots.
//!
//! # Responsibility
//! - Hold the newest unsaved snapshot until its debounce deadline passes.
//! - Skip saves for snapshots equal to the last persisted one.
//!
//! # Invariants
//! - At most one snapshot is pending; a newer schedule replaces it and
//!   pushes the deadline (last write wins).
//! - A board without columns is scheduled like any other snapshot; storage
//!   treats it as empty and the next load starts from the default board.
//! - Time is supplied by the caller, so no timer thread is involved.
//!
//! Known limitation: saves replace all stored rows and carry no version
//! check, so two independent writers silently overwrite each other.

use crate::model::board::Board;
use std::time::{Duration, Instant};

/// Delay between the last mutation and the save.
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
struct Pending {
    board: Board,
    deadline: Instant,
}

/// Timer-gated write-behind state.
#[derive(Debug, Clone)]
pub struct WriteBehind {
    debounce: Duration,
    pending: Option<Pending>,
    last_saved: Option<Board>,
}

impl WriteBehind {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: None,
            last_saved: None,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Records `board` as the persisted state.
    pub fn mark_saved(&mut self, board: Board) {
        self.last_saved = Some(board);
    }

    /// Schedules `board` for saving at `now + debounce`.
    ///
    /// Returns `false` when nothing needs saving; any older pending snapshot
    /// is dropped in that case too.
    pub fn schedule(&mut self, board: &Board, now: Instant) -> bool {
        if self.last_saved.as_ref() == Some(board) {
            self.pending = None;
            return false;
        }
        self.pending = Some(Pending {
            board: board.clone(),
            deadline: now + self.debounce,
        });
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline().is_some_and(|deadline| now >= deadline)
    }

    /// Takes the pending snapshot if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<Board> {
        if !self.is_due(now) {
            return None;
        }
        self.take_pending()
    }

    /// Takes the pending snapshot regardless of its deadline.
    pub fn take_pending(&mut self) -> Option<Board> {
        self.pending.take().map(|pending| pending.board)
    }

    /// Puts back a snapshot whose save failed, retrying after another
    /// debounce window. A newer pending snapshot wins over `board`.
    pub fn retry_later(&mut self, board: Board, now: Instant) {
        if self.pending.is_none() {
            self.pending = Some(Pending {
                board,
                deadline: now + self.debounce,
            });
        }
    }
}

impl Default for WriteBehind {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DEBOUNCE)
    }
}
