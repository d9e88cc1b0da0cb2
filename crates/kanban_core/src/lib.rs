//! Core domain logic for the Kanban board.
//! This crate is the single source of truth for board invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, KanbanConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::board::{Board, BoardValidationError, DEFAULT_COLUMN_TITLES};
pub use model::card::{Card, CardId};
pub use model::column::{Column, ColumnId};
pub use model::command::{BoardCommand, CommandOutcome};
pub use model::normalize_title;
pub use repo::board_repo::{BoardRepository, RepoError, RepoResult, SqliteBoardRepository};
pub use service::board_service::{
    board_from_json, board_to_json, BoardService, LoadedBoard, SnapshotError,
};
pub use service::session::{BoardSession, SessionError};
pub use service::write_behind::{WriteBehind, DEFAULT_SAVE_DEBOUNCE};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
