//! Board repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Load the whole board snapshot from storage.
//! - Replace all stored board rows with a new snapshot.
//!
//! # Invariants
//! - `save_board` validates the snapshot, then deletes every row and
//!   inserts the snapshot inside one immediate transaction.
//! - `load_board` rejects corrupt persisted state instead of masking it.
//! - There is no optimistic concurrency check: the last full write wins.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::board::{Board, BoardValidationError};
use crate::model::card::Card;
use crate::model::column::{Column, ColumnId};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from board persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Snapshot breaks a board invariant.
    Validation(BoardValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// JSON encoding of an id list failed.
    Encode(serde_json::Error),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a board.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid board: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode board data: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "board repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "board repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "board repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted board data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<BoardValidationError> for RepoError {
    fn from(value: BoardValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for the single board.
pub trait BoardRepository {
    /// Loads the stored board, or `None` when storage holds no columns.
    fn load_board(&self) -> RepoResult<Option<Board>>;
    /// Replaces all stored board data with `board`.
    fn save_board(&self, board: &Board) -> RepoResult<()>;
}

impl<R: BoardRepository + ?Sized> BoardRepository for &R {
    fn load_board(&self) -> RepoResult<Option<Board>> {
        (**self).load_board()
    }

    fn save_board(&self, board: &Board) -> RepoResult<()> {
        (**self).save_board(board)
    }
}

/// SQLite-backed board repository.
pub struct SqliteBoardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBoardRepository<'conn> {
    /// Creates a repository over a migrated connection.
    ///
    /// # Errors
    /// - Rejects connections that were not opened through `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_board_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl BoardRepository for SqliteBoardRepository<'_> {
    fn load_board(&self) -> RepoResult<Option<Board>> {
        let started_at = Instant::now();

        let columns = load_columns(self.conn)?;
        if columns.is_empty() {
            info!(
                "event=board_load module=repo status=empty duration_ms={}",
                started_at.elapsed().as_millis()
            );
            return Ok(None);
        }

        let mut board = Board::new();
        for card in load_cards(self.conn)? {
            board.cards.insert(card.id, card);
        }
        board.column_order = match load_column_order(self.conn)? {
            Some(order) => order,
            None => {
                warn!("event=board_load module=repo status=degraded reason=missing_column_order");
                columns.iter().map(|column| column.id).collect()
            }
        };
        board.columns = columns;
        board.validate()?;

        info!(
            "event=board_load module=repo status=ok columns={} cards={} duration_ms={}",
            board.columns.len(),
            board.cards.len(),
            started_at.elapsed().as_millis()
        );
        Ok(Some(board))
    }

    fn save_board(&self, board: &Board) -> RepoResult<()> {
        let started_at = Instant::now();
        board.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute_batch(
            "DELETE FROM board_cards;
             DELETE FROM board_columns;
             DELETE FROM board_state;",
        )?;

        {
            let mut insert_column = tx.prepare(
                "INSERT INTO board_columns (id, title, card_ids, created_at, position)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
            )?;
            for (position, column) in board.columns.iter().enumerate() {
                let card_ids = serde_json::to_string(&column.card_ids).map_err(RepoError::Encode)?;
                insert_column.execute(params![
                    column.id.to_string(),
                    column.title.as_str(),
                    card_ids,
                    column.created_at,
                    position as i64,
                ])?;
            }

            let mut insert_card = tx.prepare(
                "INSERT INTO board_cards (id, title, notes, created_at)
                 VALUES (?1, ?2, ?3, ?4);",
            )?;
            for card in board.cards.values() {
                insert_card.execute(params![
                    card.id.to_string(),
                    card.title.as_str(),
                    card.notes.as_str(),
                    card.created_at,
                ])?;
            }
        }

        let column_order = serde_json::to_string(&board.column_order).map_err(RepoError::Encode)?;
        tx.execute(
            "INSERT INTO board_state (id, column_order) VALUES (1, ?1);",
            [column_order],
        )?;
        tx.commit()?;

        info!(
            "event=board_save module=repo status=ok columns={} cards={} duration_ms={}",
            board.columns.len(),
            board.cards.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn load_columns(conn: &Connection) -> RepoResult<Vec<Column>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, card_ids, created_at
         FROM board_columns
         ORDER BY position ASC, id ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(parse_column_row(row)?);
    }
    Ok(columns)
}

fn load_cards(conn: &Connection) -> RepoResult<Vec<Card>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, notes, created_at
         FROM board_cards
         ORDER BY id ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut cards = Vec::new();
    while let Some(row) = rows.next()? {
        let id_text: String = row.get("id")?;
        cards.push(Card::with_id(
            parse_uuid(&id_text, "board_cards.id")?,
            row.get::<_, String>("title")?,
            row.get::<_, Option<String>>("notes")?.unwrap_or_default(),
            row.get("created_at")?,
        ));
    }
    Ok(cards)
}

fn load_column_order(conn: &Connection) -> RepoResult<Option<Vec<ColumnId>>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT column_order FROM board_state WHERE id = 1;",
            [],
            |row| row.get(0),
        )
        .optional()?;
    raw.map(|value| parse_id_list(&value, "board_state.column_order"))
        .transpose()
}

fn parse_column_row(row: &Row<'_>) -> RepoResult<Column> {
    let id_text: String = row.get("id")?;
    let card_ids_text: String = row.get("card_ids")?;

    let mut column = Column::with_id(
        parse_uuid(&id_text, "board_columns.id")?,
        row.get::<_, String>("title")?,
        row.get("created_at")?,
    );
    column.card_ids = parse_id_list(&card_ids_text, "board_columns.card_ids")?;
    Ok(column)
}

fn parse_id_list(value: &str, column: &'static str) -> RepoResult<Vec<Uuid>> {
    serde_json::from_str(value)
        .map_err(|err| RepoError::InvalidData(format!("invalid id list in {column}: {err}")))
}

fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "board_columns",
        &["id", "title", "card_ids", "created_at", "position"],
    ),
    ("board_cards", &["id", "title", "notes", "created_at"]),
    ("board_state", &["id", "column_order"]),
];

fn ensure_board_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
