//! Frame encoding and incremental frame assembly.
//!
//! A frame on the wire is a 2-character code, optionally followed by a
//! single space and a command, and always closed by the `$` terminator.
//! Frames arrive over a byte stream with arbitrary chunk boundaries;
//! [`FrameAssembler`] buffers bytes until a terminator is seen. Codes and
//! digits are ASCII; command text is UTF-8.

use super::{
    errors::ProtocolError,
    protocol::{ActionKind, CODE_SEPARATOR, FRAME_TERMINATOR},
};

/// One complete, terminator-stripped protocol message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    /// The 2-character protocol code.
    pub code: String,
    /// The command following the code; empty when the frame was bare.
    pub command: String,
}

impl Frame {
    /// Split a raw frame into its code and command.
    ///
    /// A frame shorter than a code is rejected, as is a longer frame
    /// missing the separator at offset 2.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        if raw.len() < 2 {
            return Err(ProtocolError::FrameTooShort(raw.to_string()));
        }
        if !raw.is_char_boundary(2) {
            return Err(ProtocolError::Malformed {
                what: "protocol code",
                value: raw.to_string(),
            });
        }
        let (code, rest) = raw.split_at(2);
        let command = match rest.as_bytes().first() {
            None => String::new(),
            Some(&CODE_SEPARATOR) => rest[1..].to_string(),
            Some(_) => return Err(ProtocolError::MissingSeparator(raw.to_string())),
        };
        Ok(Self {
            code: code.to_string(),
            command,
        })
    }
}

/// Encode an outbound action and payload into a wire frame.
///
/// Fails if the payload contains the frame terminator, which is reserved
/// and never escaped.
pub fn encode(action: ActionKind, payload: &str) -> Result<Vec<u8>, ProtocolError> {
    if payload.as_bytes().contains(&FRAME_TERMINATOR) {
        return Err(ProtocolError::PayloadContainsTerminator(
            payload.to_string(),
        ));
    }
    let mut buf = Vec::with_capacity(payload.len() + 4);
    buf.extend_from_slice(action.wire_code().as_bytes());
    if !payload.is_empty() {
        buf.push(CODE_SEPARATOR);
        buf.extend_from_slice(payload.as_bytes());
    }
    buf.push(FRAME_TERMINATOR);
    Ok(buf)
}

/// Incremental frame assembly over arbitrary read chunk boundaries.
///
/// A partial frame is not an error; bytes simply accumulate until the
/// terminator arrives.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    buf: Vec<u8>,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes received from the transport.
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Pop the next complete frame, if one has fully arrived.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, ProtocolError> {
        let Some(end) = self.buf.iter().position(|&b| b == FRAME_TERMINATOR) else {
            return Ok(None);
        };
        let raw: Vec<u8> = self.buf.drain(..=end).take(end).collect();
        let raw = String::from_utf8(raw)?;
        Frame::parse(&raw).map(Some)
    }
}
