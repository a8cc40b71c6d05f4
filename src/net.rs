//! Networking layer for the table client.
//!
//! This module provides TCP-based networking for the text wire protocol:
//! `$`-terminated frames carrying a 2-character code and an optional
//! command. The session runs a blocking receive loop on its own thread.

/// Frame encoding and incremental frame assembly.
pub mod codec;

/// Error types for the wire protocol and session.
pub mod errors;

/// Protocol constants: wire codes, sentinels, and the action payloads.
pub mod protocol;

/// The persistent connection and its receive loop.
pub mod session;
