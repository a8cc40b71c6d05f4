//! # Hold'em Client
//!
//! A client-side view of a multiplayer Texas Hold'em table, kept consistent
//! by consuming a `$`-delimited, diff-based text protocol over a persistent
//! TCP stream.
//!
//! The crate has no UI dependency at all: it exposes a pure state object
//! plus send/receive functions, and notifies an external collaborator when
//! the state changes so it can redraw.
//!
//! ## Architecture
//!
//! - **Codec**: encodes outbound actions into wire frames and reassembles
//!   inbound frames across arbitrary read chunk boundaries.
//! - **Session**: owns the connection and a single long-lived receive
//!   thread; frames are dispatched strictly one at a time.
//! - **Table state**: the [`game::entities::Table`] and its six fixed
//!   [`game::entities::Seat`] slots, mutated only by the receive thread.
//! - **Reconciler**: interprets each decoded frame and applies its diff to
//!   the table.
//! - **Betting bounds**: a pure function from table state to the legal
//!   action set and bet bounds for the acting seat.
//!
//! ## Core Modules
//!
//! - [`game`]: Table entities, frame reconciliation, and betting bounds
//! - [`net`]: Framing codec, protocol constants, and the session loop
//!
//! ## Example
//!
//! ```
//! use holdem_client::{Table, betting};
//!
//! let table = Table::new("alice");
//! let bounds = betting::action_bounds(&table, 0);
//! assert!(!bounds.can_bet);
//! ```

/// Networking components for talking to a table server.
pub mod net;
pub use net::{
    codec::{Frame, FrameAssembler},
    errors::{ProtocolError, SessionError},
    protocol::{ActionKind, EventCode, PlayerAction, ProtocolVersion},
    session::{Session, SessionConfig, TableObserver},
};

/// Table state, reconciliation, and betting logic.
pub mod game;
pub use game::{
    betting,
    entities::{Card, Chips, MAX_SEATS, Seat, SeatIndex, Suit, Table},
    reconcile::{self, Applied, ServerEvent, TableComponent},
};
