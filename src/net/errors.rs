//! Error types for the wire protocol and session.

use std::io;
use thiserror::Error;

/// A violation of the table wire protocol. Always fatal for the session.
///
/// Unknown component tags and unknown top-level codes are NOT violations;
/// they are ignored for forward compatibility. A field that is present but
/// malformed is a violation.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A completed frame was shorter than a protocol code.
    #[error("frame shorter than a protocol code: {0:?}")]
    FrameTooShort(String),

    /// A frame longer than a code was missing the separator at offset 2.
    #[error("missing separator in frame: {0:?}")]
    MissingSeparator(String),

    /// An outbound payload contained the reserved frame terminator.
    #[error("payload contains the frame terminator: {0:?}")]
    PayloadContainsTerminator(String),

    /// A frame held bytes that were not valid UTF-8.
    #[error("frame is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A numeric field failed to parse.
    #[error("malformed {field} field: {value:?}")]
    BadNumber { field: &'static str, value: String },

    /// A seat index outside the table's fixed slots.
    #[error("seat index {0} out of range")]
    SeatOutOfRange(usize),

    /// A card id outside the deck.
    #[error("card id {0} out of range")]
    CardOutOfRange(u8),

    /// A command or component was structurally malformed.
    #[error("malformed {what}: {value:?}")]
    Malformed { what: &'static str, value: String },

    /// More values arrived than the table has slots for.
    #[error("too many {what}: {count}")]
    TooMany { what: &'static str, count: usize },
}

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connection error: {0}")]
    Io(#[from] io::Error),

    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolError),

    /// The server ordered the client to disconnect.
    #[error("disconnected by the server")]
    ServerDisconnect,
}
