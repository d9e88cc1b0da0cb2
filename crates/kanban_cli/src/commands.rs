//! Subcommand execution against an open board session.

use anyhow::{anyhow, bail, Context, Result};
use clap::Subcommand;
use kanban_core::{
    board_from_json, board_to_json, Board, BoardCommand, BoardRepository, BoardSession, CardId,
    ColumnId, CommandOutcome,
};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print columns and cards in display order
    Show,
    /// Add a card at the end of a column
    AddCard {
        /// Column id or title
        column: String,
        title: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Change a card's title and notes
    EditCard {
        /// Card id or title
        card: String,
        title: String,
        /// Keeps the current notes when omitted
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a card
    RmCard { card: String },
    /// Append a new column
    AddColumn { title: String },
    /// Rename a column
    RenameColumn { column: String, title: String },
    /// Delete a column and every card in it
    RmColumn { column: String },
    /// Move a card to a column, at the end unless --index is given
    MoveCard {
        card: String,
        /// Destination column id or title
        to: String,
        #[arg(long)]
        index: Option<usize>,
    },
    /// Set the column display order
    Reorder {
        #[arg(required = true)]
        columns: Vec<String>,
    },
    /// Write the board as JSON to stdout or a file
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace the board with a JSON snapshot
    Import { file: PathBuf },
}

/// Runs one subcommand. Mutations are left pending in the session; the
/// caller flushes.
pub fn run<R: BoardRepository>(
    session: &mut BoardSession<R>,
    command: Commands,
    out: &mut impl Write,
) -> Result<()> {
    let now = Instant::now();
    let board = session.board();

    let board_command = match command {
        Commands::Show => return print_board(board, out),
        Commands::Export { out: None } => {
            writeln!(out, "{}", board_to_json(board)?)?;
            return Ok(());
        }
        Commands::Export { out: Some(path) } => {
            std::fs::write(&path, board_to_json(board)?)
                .with_context(|| format!("failed to write {}", path.display()))?;
            writeln!(out, "exported board to {}", path.display())?;
            return Ok(());
        }
        Commands::Import { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let imported = board_from_json(&json)?;
            session.replace_board(imported, now)?;
            writeln!(out, "imported board from {}", file.display())?;
            return Ok(());
        }
        Commands::AddCard {
            column,
            title,
            notes,
        } => BoardCommand::CreateCard {
            column_id: resolve_column(board, &column)?,
            title,
            notes,
        },
        Commands::EditCard { card, title, notes } => {
            let card_id = resolve_card(board, &card)?;
            let notes = match notes {
                Some(notes) => notes,
                None => board
                    .card(card_id)
                    .map(|card| card.notes.clone())
                    .unwrap_or_default(),
            };
            BoardCommand::UpdateCard {
                card_id,
                title,
                notes,
            }
        }
        Commands::RmCard { card } => BoardCommand::DeleteCard {
            card_id: resolve_card(board, &card)?,
        },
        Commands::AddColumn { title } => BoardCommand::CreateColumn { title },
        Commands::RenameColumn { column, title } => BoardCommand::UpdateColumn {
            column_id: resolve_column(board, &column)?,
            title,
        },
        Commands::RmColumn { column } => BoardCommand::DeleteColumn {
            column_id: resolve_column(board, &column)?,
        },
        Commands::MoveCard { card, to, index } => {
            let card_id = resolve_card(board, &card)?;
            let to_column_id = resolve_column(board, &to)?;
            let from_column_id = board
                .column_of_card(card_id)
                .map(|column| column.id)
                .ok_or_else(|| anyhow!("card {card_id} is not in any column"))?;
            BoardCommand::MoveCard {
                card_id,
                from_column_id,
                to_column_id,
                target_index: index.unwrap_or(usize::MAX),
            }
        }
        Commands::Reorder { columns } => BoardCommand::ReorderColumns {
            column_ids: columns
                .iter()
                .map(|column| resolve_column(board, column))
                .collect::<Result<_>>()?,
        },
    };

    match session.apply(&board_command, now) {
        CommandOutcome::CardCreated(id) => writeln!(out, "created card {id}")?,
        CommandOutcome::ColumnCreated(id) => writeln!(out, "created column {id}")?,
        CommandOutcome::Applied => writeln!(out, "ok")?,
        CommandOutcome::Ignored => writeln!(out, "ignored: no change applied")?,
    }
    Ok(())
}

fn print_board(board: &Board, out: &mut impl Write) -> Result<()> {
    for column in board.ordered_columns() {
        writeln!(
            out,
            "{} ({}) [{}]",
            column.title,
            column.card_ids.len(),
            column.id
        )?;
        for card in board.cards_in(column.id) {
            writeln!(out, "  - {} [{}]", card.title, card.id)?;
            if !card.notes.is_empty() {
                writeln!(out, "      {}", card.notes)?;
            }
        }
    }
    Ok(())
}

/// Accepts a column id or an exact (trimmed) title.
fn resolve_column(board: &Board, reference: &str) -> Result<ColumnId> {
    if let Ok(id) = Uuid::parse_str(reference.trim()) {
        if board.column(id).is_some() {
            return Ok(id);
        }
    }
    match board.column_by_title(reference) {
        Some(column) => Ok(column.id),
        None => bail!("no column matches `{reference}`"),
    }
}

/// Accepts a card id or an exact (trimmed) title; titles must be unique.
fn resolve_card(board: &Board, reference: &str) -> Result<CardId> {
    let reference = reference.trim();
    if let Ok(id) = Uuid::parse_str(reference) {
        if board.card(id).is_some() {
            return Ok(id);
        }
    }
    let matches: Vec<CardId> = board
        .cards
        .values()
        .filter(|card| card.title == reference)
        .map(|card| card.id)
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("no card matches `{reference}`"),
        _ => bail!("`{reference}` matches {} cards; use the card id", matches.len()),
    }
}
