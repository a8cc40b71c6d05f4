//! Protocol constants for the table wire format.
//!
//! Action and event codes are fixed 2-character strings shared with the
//! server. They are protocol constants and must match exactly for
//! interoperability; do not renumber them.

use std::fmt;

use crate::game::entities::Chips;

/// Sentinel terminating every frame. Reserved; never appears inside a
/// payload.
pub const FRAME_TERMINATOR: u8 = b'$';

/// Separator between a frame's code and its command.
pub const CODE_SEPARATOR: u8 = b' ';

/// Wire protocol revision.
///
/// [`ProtocolVersion::V2`] is the canonical revision: it carries the `NR`
/// table-state component and the showdown event. V1 lacked both and is a
/// deprecated prior revision this client does not speak.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ProtocolVersion {
    V1,
    #[default]
    V2,
}

impl ProtocolVersion {
    pub fn current() -> Self {
        Self::V2
    }
}

/// Outbound actions a client may send.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ActionKind {
    /// Courtesy notice that the client is going away.
    Disconnect,
    /// First message after the TCP connect, carrying the chosen name.
    Connected,
    /// Game-master order to start a new hand.
    Start,
    /// Game-master order to set the blinds, as `small:big`.
    SetBlinds,
    /// An in-hand betting action; see [`PlayerAction`].
    Action,
    /// A chat line.
    Chat,
    /// Game-master order to adjust a seat's stack, as `seat delta`.
    Stack,
    /// Ask the server to resend the full table state.
    RequestState,
}

impl ActionKind {
    /// The fixed 2-character wire code.
    pub fn wire_code(self) -> &'static str {
        match self {
            Self::Disconnect => "-1",
            Self::Connected => "00",
            Self::Start => "01",
            Self::SetBlinds => "02",
            Self::Action => "03",
            Self::Chat => "04",
            Self::Stack => "05",
            Self::RequestState => "06",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Disconnect => "disconnect",
            Self::Connected => "connected",
            Self::Start => "start",
            Self::SetBlinds => "set-blinds",
            Self::Action => "action",
            Self::Chat => "chat",
            Self::Stack => "stack",
            Self::RequestState => "request-state",
        };
        write!(f, "{repr}")
    }
}

/// Inbound event codes the server may send.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EventCode {
    /// Order to tear down the session.
    Disconnect,
    /// The viewer's own hole cards.
    Hand,
    /// A space-separated list of tagged table-state components.
    TableState,
    /// A chat line.
    ChatMessage,
    /// The server renamed the viewer.
    NameCorrection,
    /// Revealed hands at contest resolution.
    Showdown,
    /// A winner announcement; freezes the display on the showdown.
    Announcement,
}

impl EventCode {
    /// The fixed 2-character wire code.
    pub fn wire_code(self) -> &'static str {
        match self {
            Self::Disconnect => "-1",
            Self::Hand => "00",
            Self::TableState => "01",
            Self::ChatMessage => "02",
            Self::NameCorrection => "03",
            Self::Showdown => "04",
            Self::Announcement => "05",
        }
    }

    /// Look up a received code. Unknown codes are `None` and treated as
    /// no-ops by the reconciler.
    pub fn from_wire(code: &str) -> Option<Self> {
        let code = match code {
            "-1" => Self::Disconnect,
            "00" => Self::Hand,
            "01" => Self::TableState,
            "02" => Self::ChatMessage,
            "03" => Self::NameCorrection,
            "04" => Self::Showdown,
            "05" => Self::Announcement,
            _ => return None,
        };
        Some(code)
    }
}

/// An in-hand betting action, carried as the payload of an
/// [`ActionKind::Action`] frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    AllIn,
    /// Bet or raise to a total spend for the round.
    Bet(Chips),
}

impl PlayerAction {
    /// Wire payload: an action digit and an amount, e.g. `5 120`. The
    /// amount is 0 for everything but a bet.
    pub fn wire_payload(self) -> String {
        match self {
            Self::Fold => "1 0".to_string(),
            Self::Check => "2 0".to_string(),
            Self::Call => "3 0".to_string(),
            Self::AllIn => "4 0".to_string(),
            Self::Bet(total) => format!("5 {total}"),
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Fold => "fold",
            Self::Check => "check",
            Self::Call => "call",
            Self::AllIn => "all-in",
            Self::Bet(total) => &format!("bet {total}"),
        };
        write!(f, "{repr}")
    }
}
