//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into board-level use cases.
//! - Own the debounced persistence of an editing session.

pub mod board_service;
pub mod session;
pub mod write_behind;
