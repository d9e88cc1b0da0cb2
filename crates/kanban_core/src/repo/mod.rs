//! Repository layer: persistence contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the board load/save contract.
//! - Keep SQL details out of the service layer.
//!
//! # Invariants
//! - Writes and reads both pass through `Board::validate()`.

pub mod board_repo;
