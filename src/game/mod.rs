//! Table state and the logic that reads and writes it.
//!
//! This module provides:
//! - The mutable entities ([`entities::Table`], [`entities::Seat`]) that the
//!   reconciler updates and everything else reads
//! - Frame reconciliation, a tokenized, nested, positional mini-grammar
//! - The betting-constraint calculator deriving legal action bounds

/// Betting-constraint calculator.
pub mod betting;

/// Table, seat, and card entities.
pub mod entities;

/// Frame reconciliation and the table-state component grammar.
pub mod reconcile;
